//! Image generation providers.
//!
//! Two remote backends share one trait: Replicate (create prediction, poll,
//! download the output URL) and HuggingFace inference (one POST, image bytes
//! in the response body). `ImageService` wraps either and falls back to a
//! locally rendered placeholder when no backend is configured or the call
//! fails.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::placeholder;
use super::ProviderError;
use crate::server::metrics::record_image_generation;

const REPLICATE_PREDICTIONS_URL: &str = "https://api.replicate.com/v1/predictions";
const SDXL_MODEL_VERSION: &str =
    "stability-ai/sdxl:39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

const HUGGINGFACE_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
const HUGGINGFACE_DEFAULT_MODEL: &str = "stabilityai/stable-diffusion-2-1";

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLL_ATTEMPTS: u32 = 30;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed prompt suffixes nudging the model toward saturated, detailed output.
/// Appended identically on every call so the full prompt stays a pure
/// function of the analysis.
const PROMPT_ENHANCERS: &[&str] = &[
    "vibrant colors",
    "rich color palette",
    "artistic",
    "high quality",
    "detailed",
    "professional digital art",
];

pub(crate) fn enhance_prompt(prompt: &str) -> String {
    let mut parts = Vec::with_capacity(1 + PROMPT_ENHANCERS.len());
    parts.push(prompt);
    parts.extend_from_slice(PROMPT_ENHANCERS);
    parts.join(", ")
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Render the prompt to encoded image bytes (PNG or JPEG as returned by
    /// the backend).
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;
}

/// SDXL on Replicate.
pub struct ReplicateImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ReplicateImageGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: REPLICATE_PREDICTIONS_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for ReplicateImageGenerator {
    fn name(&self) -> &str {
        "replicate_sdxl"
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let request = PredictionRequest {
            version: SDXL_MODEL_VERSION.to_string(),
            input: SdxlInput {
                prompt: enhance_prompt(prompt),
                width: 1024,
                height: 1024,
                num_outputs: 1,
                guidance_scale: 7.5,
                num_inference_steps: 50,
                scheduler: "K_EULER".to_string(),
            },
        };

        debug!(prompt_len = prompt.len(), "Creating image prediction");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let prediction: PredictionCreated = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse prediction: {}", e))
        })?;

        for attempt in 0..MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let status_response = self
                .client
                .get(format!("{}/{}", self.base_url, prediction.id))
                .header("Authorization", format!("Token {}", self.api_key))
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await
                .map_err(ProviderError::from_reqwest)?;

            let status = status_response.status();
            if !status.is_success() {
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message: "Status poll failed".to_string(),
                });
            }

            let state: PredictionStatus = status_response.json().await.map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse status: {}", e))
            })?;

            match state.status.as_str() {
                "succeeded" => {
                    let url = state
                        .output
                        .unwrap_or_default()
                        .into_iter()
                        .next()
                        .ok_or_else(|| {
                            ProviderError::InvalidResponse("Succeeded with no output".to_string())
                        })?;
                    return self.download(&url).await;
                }
                "failed" | "canceled" => {
                    return Err(ProviderError::InvalidResponse(
                        state.error.unwrap_or_else(|| "Prediction failed".to_string()),
                    ));
                }
                _ => {
                    debug!(attempt = attempt + 1, "Image still processing");
                }
            }
        }

        Err(ProviderError::PollingExhausted(MAX_POLL_ATTEMPTS))
    }
}

impl ReplicateImageGenerator {
    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: "Image download failed".to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(ProviderError::from_reqwest)?;
        info!(bytes = bytes.len(), "Image downloaded");
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct PredictionRequest {
    version: String,
    input: SdxlInput,
}

#[derive(Debug, Serialize)]
struct SdxlInput {
    prompt: String,
    width: u32,
    height: u32,
    num_outputs: u32,
    guidance_scale: f64,
    num_inference_steps: u32,
    scheduler: String,
}

#[derive(Debug, Deserialize)]
struct PredictionCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PredictionStatus {
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

/// HuggingFace hosted inference. One POST, image bytes back.
pub struct HuggingFaceImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl HuggingFaceImageGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: HUGGINGFACE_INFERENCE_URL.to_string(),
            model: HUGGINGFACE_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: HUGGINGFACE_INFERENCE_URL.to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceImageGenerator {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, self.model))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({ "inputs": enhance_prompt(prompt) }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await.map_err(ProviderError::from_reqwest)?;
        Ok(bytes.to_vec())
    }
}

/// Front-door image service. Remote first, placeholder on any failure.
pub struct ImageService {
    remote: Option<Box<dyn ImageGenerator>>,
}

impl ImageService {
    pub fn new(remote: Option<Box<dyn ImageGenerator>>) -> Self {
        Self { remote }
    }

    pub fn placeholder_only() -> Self {
        Self { remote: None }
    }

    /// Always yields PNG-or-JPEG bytes; failures downgrade to the
    /// deterministic placeholder rather than surfacing to the client.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        if let Some(remote) = &self.remote {
            match remote.generate(prompt).await {
                Ok(bytes) if !bytes.is_empty() => {
                    record_image_generation(remote.name(), "success");
                    return Ok(bytes);
                }
                Ok(_) => {
                    record_image_generation(remote.name(), "empty");
                    warn!(provider = remote.name(), "Empty image body, using placeholder");
                }
                Err(e) => {
                    record_image_generation(remote.name(), "error");
                    warn!(provider = remote.name(), error = %e, "Image generation failed, using placeholder");
                }
            }
        }
        record_image_generation("placeholder", "success");
        placeholder::render_png(prompt)
    }
}
