use anyhow::Result;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{log_requests, metrics::metrics_handler, state::ServerState, ServerConfig};
use crate::providers::{ImageService, TranscriptionService};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    };
    Json(stats)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

pub fn make_app(
    config: ServerConfig,
    transcription: TranscriptionService,
    images: ImageService,
) -> Result<Router> {
    let state = ServerState::new(config, transcription, images);

    let upload_routes = super::upload_routes(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/v1", upload_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    metrics_port: u16,
    transcription: TranscriptionService,
    images: ImageService,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, transcription, images)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("127.0.0.1:{}", metrics_port)).await?;

    tracing::info!(port, metrics_port, "Server listening");

    let serve_app = async { axum::serve(listener, app).await };
    let serve_metrics = async { axum::serve(metrics_listener, make_metrics_app()).await };
    tokio::try_join!(serve_app, serve_metrics)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt; // for `oneshot`

    fn test_app(max_upload_size_bytes: usize) -> Router {
        let config = ServerConfig {
            max_upload_size_bytes,
            ..Default::default()
        };
        make_app(
            config,
            TranscriptionService::simulated_only(),
            ImageService::placeholder_only(),
        )
        .unwrap()
    }

    fn multipart_upload(uri: &str, file_name: &str, data: &[u8]) -> Request<Body> {
        let boundary = "AaB03x";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                boundary, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn responds_with_stats_on_home() {
        let app = test_app(1024 * 1024);
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["uptime"].is_string());
        assert!(value["version"].is_string());
    }

    #[tokio::test]
    async fn upload_returns_png_image() {
        let app = test_app(1024 * 1024);
        let request = multipart_upload("/v1/upload", "peaceful_piano.mp3", b"not real audio");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn upload_is_deterministic() {
        let app = test_app(1024 * 1024);
        let first = app
            .clone()
            .oneshot(multipart_upload("/v1/upload", "midnight_drive.mp3", b"xx"))
            .await
            .unwrap();
        let second = app
            .oneshot(multipart_upload("/v1/upload", "midnight_drive.mp3", b"xx"))
            .await
            .unwrap();
        let a = to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let b = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let app = test_app(1024 * 1024);
        let boundary = "AaB03x";
        let body = format!("--{}--\r\n", boundary);
        let request = Request::builder()
            .method("POST")
            .uri("/v1/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = test_app(16);
        let request = multipart_upload("/v1/upload", "big_track.wav", &[0u8; 100]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn non_audio_upload_is_rejected() {
        let app = test_app(1024 * 1024);
        // PNG magic sniffs as image/png.
        let png_header: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0, 0, 0];
        let request = multipart_upload("/v1/upload", "sneaky.mp3", png_header);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn analyze_returns_full_breakdown() {
        let app = test_app(16 * 1024 * 1024);
        let body = serde_json::json!({
            "file_name": "peaceful_piano.mp3",
            "file_size_bytes": 2_000_000,
            "transcript": "gentle keys over a quiet room",
        });
        let request = Request::builder()
            .method("POST")
            .uri("/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["features"]["mood"], "peaceful");
        assert_eq!(value["transcript"], "gentle keys over a quiet room");
        assert!(value["prompt"]
            .as_str()
            .unwrap()
            .contains("Audio content: 'gentle keys over a quiet room'"));
        assert!(!value["instruments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyze_simulates_transcript_when_absent() {
        let app = test_app(64 * 1024 * 1024);
        let body = serde_json::json!({
            "file_name": "jazz_quartet.flac",
            "file_size_bytes": 8_000_000,
        });
        let request = Request::builder()
            .method("POST")
            .uri("/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["transcript"].as_str().unwrap().contains("jazz"));
    }

    #[tokio::test]
    async fn metrics_endpoint_renders() {
        crate::server::metrics::init_metrics();
        let app = make_metrics_app();
        let request = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
