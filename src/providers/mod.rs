//! External collaborators: transcription and image generation.
//!
//! Both run over HTTP against third-party APIs and both degrade gracefully:
//! transcription falls back to a deterministic simulated transcript, image
//! generation falls back to a locally rendered placeholder.

pub mod image;
pub mod placeholder;
pub mod transcription;

use thiserror::Error;

pub use image::{HuggingFaceImageGenerator, ImageGenerator, ImageService, ReplicateImageGenerator};
pub use transcription::{ReplicateTranscriber, SimulatedTranscriber, Transcriber, TranscriptionService};

/// Errors from the remote transcription and image generation APIs.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Prediction polling exhausted after {0} attempts")]
    PollingExhausted(u32),

    #[error("Image encoding error: {0}")]
    Encoding(String),
}

impl ProviderError {
    /// Map a reqwest failure onto our error space the same way everywhere.
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Connection(e.to_string())
        }
    }
}
