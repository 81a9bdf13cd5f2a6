use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tonecanvas_server::config::{AppConfig, CliConfig, FileConfig, ImageBackend};
use tonecanvas_server::providers::{
    HuggingFaceImageGenerator, ImageGenerator, ImageService, ReplicateImageGenerator,
    ReplicateTranscriber, Transcriber, TranscriptionService,
};
use tonecanvas_server::server::{self, run_server, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values there override CLI flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Maximum accepted upload size in megabytes.
    #[clap(long, default_value_t = 50)]
    pub max_upload_size_mb: u64,

    /// Replicate API key for transcription (falls back to REPLICATE_API_KEY).
    #[clap(long)]
    pub replicate_api_key: Option<String>,

    /// HuggingFace API key for image generation (falls back to HUGGINGFACE_API_KEY).
    #[clap(long)]
    pub huggingface_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        port: cli_args.port,
        metrics_port: cli_args.metrics_port,
        logging_level: cli_args.logging_level,
        max_upload_size_mb: cli_args.max_upload_size_mb,
        replicate_api_key: cli_args.replicate_api_key,
        huggingface_api_key: cli_args.huggingface_api_key,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Initializing metrics...");
    server::metrics::init_metrics();

    let remote_transcriber: Option<Box<dyn Transcriber>> = if config.transcription.enabled {
        config.transcription.replicate_api_key.as_ref().map(|key| {
            info!("Replicate transcription configured");
            Box::new(ReplicateTranscriber::new(key.clone())) as Box<dyn Transcriber>
        })
    } else {
        info!("Transcription disabled, simulating only");
        None
    };
    let transcription = TranscriptionService::new(remote_transcriber);

    let remote_generator: Option<Box<dyn ImageGenerator>> = match config.image_generator.backend {
        ImageBackend::Replicate => config.image_generator.api_key.as_ref().map(|key| {
            info!("Replicate image backend configured");
            Box::new(ReplicateImageGenerator::new(key.clone())) as Box<dyn ImageGenerator>
        }),
        ImageBackend::HuggingFace => config.image_generator.api_key.as_ref().map(|key| {
            info!("HuggingFace image backend configured");
            let generator = match &config.image_generator.model {
                Some(model) => HuggingFaceImageGenerator::with_model(key.clone(), model.clone()),
                None => HuggingFaceImageGenerator::new(key.clone()),
            };
            Box::new(generator) as Box<dyn ImageGenerator>
        }),
        ImageBackend::Placeholder => {
            info!("No image backend configured, rendering placeholders");
            None
        }
    };
    let images = ImageService::new(remote_generator);

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        max_upload_size_bytes: config.upload.max_upload_size_bytes(),
    };

    info!("Ready to serve at port {}!", config.port);
    info!("Metrics available at port {}!", config.metrics_port);
    run_server(server_config, config.metrics_port, transcription, images).await
}
