//! Upload and analysis HTTP routes.
//!
//! Provides endpoints for:
//! - Uploading an audio file and getting generated artwork back
//! - Running the metadata analysis alone and getting the full breakdown

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::FileDescriptor;
use crate::pipeline::{self, AnalysisOutcome};
use crate::providers::SimulatedTranscriber;
use crate::server::metrics::{record_analysis, record_error, record_upload};
use crate::server::state::ServerState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request body for the analysis-only endpoint.
#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub file_name: String,
    pub file_size_bytes: u64,
    /// Optional transcript; when absent a simulated one is derived from the
    /// file metadata.
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub transcript: String,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

// =============================================================================
// Errors
// =============================================================================

enum UploadError {
    MissingFile(&'static str),
    InvalidName(String),
    TooLarge(usize),
    UnsupportedMediaType(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            UploadError::MissingFile(what) => (StatusCode::BAD_REQUEST, what.to_string()),
            UploadError::InvalidName(name) => {
                (StatusCode::BAD_REQUEST, format!("Invalid file name: {}", name))
            }
            UploadError::TooLarge(max) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File exceeds upload limit of {} bytes", max),
            ),
            UploadError::UnsupportedMediaType(mime) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Expected audio content, got {}", mime),
            ),
        };
        record_upload("rejected", 0);
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

struct UploadedFile {
    name: String,
    data: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile, UploadError> {
    let mut name: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name().unwrap_or("") != "file" {
            continue;
        }
        name = field.file_name().map(|s| s.to_string());
        match field.bytes().await {
            Ok(bytes) => data = Some(bytes.to_vec()),
            Err(e) => {
                warn!("Failed to read file data: {}", e);
                return Err(UploadError::MissingFile("Failed to read file"));
            }
        }
    }

    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return Err(UploadError::MissingFile("No filename provided")),
    };
    let data = match data {
        Some(d) if !d.is_empty() => d,
        _ => return Err(UploadError::MissingFile("No file data provided")),
    };

    Ok(UploadedFile { name, data })
}

/// Known non-audio content is rejected; unrecognized content passes with a
/// warning since many valid audio containers are not sniffable.
fn check_media_type(data: &[u8], name: &str) -> Result<(), UploadError> {
    match infer::get(data) {
        Some(kind) if kind.mime_type().starts_with("audio/") => Ok(()),
        Some(kind) if kind.mime_type().starts_with("video/") => {
            // m4a uploads are often sniffed as video/mp4 containers.
            debug!("Upload {} sniffed as {}, accepting container", name, kind.mime_type());
            Ok(())
        }
        Some(kind) => Err(UploadError::UnsupportedMediaType(
            kind.mime_type().to_string(),
        )),
        None => {
            warn!("Could not sniff media type of {}, continuing", name);
            Ok(())
        }
    }
}

/// POST /upload - full pipeline: transcribe, analyze, render an image.
async fn upload_audio(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return e.into_response(),
    };

    if upload.data.len() > state.config.max_upload_size_bytes {
        return UploadError::TooLarge(state.config.max_upload_size_bytes).into_response();
    }
    if let Err(e) = check_media_type(&upload.data, &upload.name) {
        return e.into_response();
    }

    let descriptor = match FileDescriptor::new(upload.name.clone(), upload.data.len() as u64) {
        Ok(d) => d,
        Err(_) => return UploadError::InvalidName(upload.name).into_response(),
    };

    let upload_id = Uuid::new_v4();
    debug!(
        "Processing upload {}: {} ({} bytes)",
        upload_id,
        descriptor.name(),
        descriptor.size_bytes()
    );

    let transcript = state.transcription.transcribe(&descriptor, &upload.data).await;

    let started = Instant::now();
    let outcome = pipeline::run(&descriptor, &transcript);
    record_analysis(started.elapsed());

    let image = match state.images.generate(&outcome.prompt).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Image generation failed without fallback: {}", e);
            record_error("image_generation", "/v1/upload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    record_upload("success", descriptor.size_bytes());
    info!(
        upload_id = %upload_id,
        file = %descriptor.name(),
        prompt_len = outcome.prompt.len(),
        image_bytes = image.len(),
        "Upload processed"
    );

    let content_type = infer::get(&image)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "image/png".to_string());

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(image.into())
    {
        Ok(response) => response,
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /analyze - run the metadata pipeline and return the breakdown as JSON.
async fn analyze_audio(
    State(state): State<ServerState>,
    Json(body): Json<AnalyzeBody>,
) -> Response {
    if body.file_size_bytes as usize > state.config.max_upload_size_bytes {
        return UploadError::TooLarge(state.config.max_upload_size_bytes).into_response();
    }

    let descriptor = match FileDescriptor::new(body.file_name.clone(), body.file_size_bytes) {
        Ok(d) => d,
        Err(_) => return UploadError::InvalidName(body.file_name).into_response(),
    };

    let transcript = body
        .transcript
        .unwrap_or_else(|| SimulatedTranscriber::simulate(&descriptor));

    let started = Instant::now();
    let outcome = pipeline::run(&descriptor, &transcript);
    record_analysis(started.elapsed());

    Json(AnalyzeResponse {
        transcript,
        outcome,
    })
    .into_response()
}

/// Build the upload routes with the body limit applied.
pub fn upload_routes(state: ServerState) -> Router {
    // The multipart framing adds overhead on top of the file itself; the
    // exact size check happens in the handler.
    let body_limit = state.config.max_upload_size_bytes + 1024 * 1024;
    Router::new()
        .route("/upload", post(upload_audio))
        .route("/analyze", post(analyze_audio))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
