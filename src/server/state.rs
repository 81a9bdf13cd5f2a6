use axum::extract::FromRef;

use crate::providers::{ImageService, TranscriptionService};
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedTranscription = Arc<TranscriptionService>;
pub type GuardedImageService = Arc<ImageService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub transcription: GuardedTranscription,
    pub images: GuardedImageService,
    pub version: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        transcription: TranscriptionService,
        images: ImageService,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            transcription: Arc::new(transcription),
            images: Arc::new(images),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl FromRef<ServerState> for GuardedTranscription {
    fn from_ref(input: &ServerState) -> Self {
        input.transcription.clone()
    }
}

impl FromRef<ServerState> for GuardedImageService {
    fn from_ref(input: &ServerState) -> Self {
        input.images.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
