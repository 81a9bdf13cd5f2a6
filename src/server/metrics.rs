use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Tonecanvas metrics
const PREFIX: &str = "tonecanvas";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Upload Metrics
    pub static ref UPLOADS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_uploads_total"), "Total audio uploads"),
        &["status"]
    ).expect("Failed to create uploads_total metric");

    pub static ref UPLOAD_SIZE_BYTES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_upload_size_bytes"),
            "Uploaded file size in bytes"
        )
        .buckets(vec![100_000.0, 1_000_000.0, 5_000_000.0, 10_000_000.0, 50_000_000.0])
    ).expect("Failed to create upload_size_bytes metric");

    // Pipeline Metrics
    pub static ref ANALYSIS_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_analysis_duration_seconds"),
            "Feature analysis pipeline duration in seconds"
        )
        .buckets(vec![0.0001, 0.001, 0.01, 0.1, 1.0])
    ).expect("Failed to create analysis_duration_seconds metric");

    // Collaborator Metrics
    pub static ref TRANSCRIPTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_transcriptions_total"), "Transcription attempts by provider"),
        &["provider", "status"]
    ).expect("Failed to create transcriptions_total metric");

    pub static ref IMAGES_GENERATED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_images_generated_total"), "Image generation attempts by backend"),
        &["backend", "status"]
    ).expect("Failed to create images_generated_total metric");

    // Error Metrics
    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Total errors by type and endpoint"),
        &["error_type", "endpoint"]
    ).expect("Failed to create errors_total metric");

    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPLOADS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPLOAD_SIZE_BYTES.clone()));
    let _ = REGISTRY.register(Box::new(ANALYSIS_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(TRANSCRIPTIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(IMAGES_GENERATED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record an upload outcome
pub fn record_upload(status: &str, size_bytes: u64) {
    UPLOADS_TOTAL.with_label_values(&[status]).inc();
    UPLOAD_SIZE_BYTES.observe(size_bytes as f64);
}

/// Record a pipeline pass
pub fn record_analysis(duration: Duration) {
    ANALYSIS_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a transcription attempt
pub fn record_transcription(provider: &str, status: &str) {
    TRANSCRIPTIONS_TOTAL
        .with_label_values(&[provider, status])
        .inc();
}

/// Record an image generation attempt
pub fn record_image_generation(backend: &str, status: &str) {
    IMAGES_GENERATED_TOTAL
        .with_label_values(&[backend, status])
        .inc();
}

/// Record an error
pub fn record_error(error_type: &str, endpoint: &str) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, endpoint])
        .inc();
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // Parse the RSS (Resident Set Size) in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }

    // Fallback for non-Linux systems or if reading fails
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
