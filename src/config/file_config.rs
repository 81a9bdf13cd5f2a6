use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,

    // Feature configs
    pub upload: Option<UploadConfig>,
    pub transcription: Option<TranscriptionConfig>,
    pub image_generator: Option<ImageGeneratorConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub max_upload_size_mb: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub enabled: Option<bool>,
    pub replicate_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ImageGeneratorConfig {
    /// Backend to use: "replicate", "huggingface" or "placeholder"
    pub backend: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
