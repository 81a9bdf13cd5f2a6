mod file_config;

pub use file_config::{FileConfig, ImageGeneratorConfig, TranscriptionConfig, UploadConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub max_upload_size_mb: u64,
    pub replicate_api_key: Option<String>,
    pub huggingface_api_key: Option<String>,
}

/// Which image backend the service talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageBackend {
    Replicate,
    HuggingFace,
    /// Local deterministic rendering only, no network calls.
    #[default]
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,

    pub upload: UploadSettings,
    pub transcription: TranscriptionSettings,
    pub image_generator: ImageGeneratorSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present; API keys additionally
    /// fall back to the environment.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let upload_file = file.upload.unwrap_or_default();
        let upload_defaults = UploadSettings::default();
        let max_upload_size_mb = upload_file
            .max_upload_size_mb
            .unwrap_or(if cli.max_upload_size_mb > 0 {
                cli.max_upload_size_mb
            } else {
                upload_defaults.max_upload_size_mb
            });
        if max_upload_size_mb == 0 {
            bail!("max_upload_size_mb must be greater than zero");
        }
        let upload = UploadSettings { max_upload_size_mb };

        let transcription_file = file.transcription.unwrap_or_default();
        let replicate_api_key = transcription_file
            .replicate_api_key
            .or_else(|| cli.replicate_api_key.clone())
            .or_else(|| std::env::var("REPLICATE_API_KEY").ok())
            .filter(|k| !k.is_empty());
        let transcription = TranscriptionSettings {
            enabled: transcription_file.enabled.unwrap_or(true),
            replicate_api_key,
        };

        let image_file = file.image_generator.unwrap_or_default();
        let image_api_key = image_file
            .api_key
            .or_else(|| cli.huggingface_api_key.clone())
            .or_else(|| std::env::var("HUGGINGFACE_API_KEY").ok())
            .filter(|k| !k.is_empty());
        let backend = match image_file.backend.as_deref() {
            Some("replicate") => ImageBackend::Replicate,
            Some("huggingface") => ImageBackend::HuggingFace,
            Some("placeholder") | None => ImageBackend::Placeholder,
            Some(other) => bail!("Unknown image backend: {}", other),
        };
        let image_generator = ImageGeneratorSettings {
            backend,
            api_key: image_api_key,
            model: image_file.model,
        };

        // A remote backend without a credential cannot work; fail at startup
        // rather than on the first upload.
        if image_generator.backend != ImageBackend::Placeholder && image_generator.api_key.is_none()
        {
            bail!("Image backend requires an api_key");
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            upload,
            transcription,
            image_generator,
        })
    }
}

/// Settings for the upload surface.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_upload_size_mb: u64,
}

impl UploadSettings {
    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize) * 1024 * 1024
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 50,
        }
    }
}

/// Settings for the transcription collaborator.
#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    /// When disabled, the simulated transcriber is used unconditionally.
    pub enabled: bool,
    pub replicate_api_key: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            replicate_api_key: None,
        }
    }
}

/// Settings for the image generation collaborator.
#[derive(Debug, Clone, Default)]
pub struct ImageGeneratorSettings {
    pub backend: ImageBackend,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
