//! HTTP clients for the hosted caption and diffusion backends.
//!
//! Each client owns a connection pool with the backend's request budget
//! baked in. Payload shapes and sampling constants are fixed here and
//! are not caller-tunable.

use crate::config::BackendConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use service_core::error::AppError;
use std::time::Duration;

/// Request budget for caption generation.
const CAPTION_TIMEOUT: Duration = Duration::from_secs(30);
/// Request budget for image generation; diffusion runs are slower.
const DIFFUSION_TIMEOUT: Duration = Duration::from_secs(60);

const CAPTION_TOP_P: f64 = 0.8;
const CAPTION_TEMPERATURE: f64 = 0.95;

const IMAGE_WIDTH: u32 = 768;
const IMAGE_HEIGHT: u32 = 768;
const IMAGE_INFERENCE_STEPS: u32 = 50;
const IMAGE_GUIDANCE_SCALE: f64 = 7.5;

/// Artifact classes excluded from every diffusion run.
const NEGATIVE_PROMPT: &str =
    "blurry, low quality, disfigured, deformed hands, extra fingers, watermark, text overlay";

/// Client for the caption (text) backend.
#[derive(Clone)]
pub struct CaptionClient {
    client: Client,
    config: BackendConfig,
}

impl CaptionClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(CAPTION_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Relay a prompt to the caption backend and unwrap its response.
    pub async fn generate(&self, prompt: &str) -> Result<serde_json::Value, AppError> {
        let request = CaptionRequest {
            prompt,
            top_p: CAPTION_TOP_P,
            temperature: CAPTION_TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(self.config.token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Caption backend request failed");
                AppError::InternalError(anyhow::anyhow!("Caption backend request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read caption backend response");
            AppError::InternalError(anyhow::anyhow!(
                "Failed to read caption backend response: {}",
                e
            ))
        })?;

        tracing::debug!(status = %status, "Caption backend response");

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Caption backend returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let document: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Caption backend returned a non-JSON body: {}",
                e
            ))
        })?;

        Ok(unwrap_output(document))
    }
}

/// Client for the image (diffusion) backend.
#[derive(Clone)]
pub struct DiffusionClient {
    client: Client,
    config: BackendConfig,
}

impl DiffusionClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(DIFFUSION_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Relay a showcase request to the diffusion backend and return the
    /// raw image bytes it produced.
    pub async fn generate(
        &self,
        owner_image: &str,
        product_image: &str,
    ) -> Result<Vec<u8>, AppError> {
        let prompt = showcase_prompt(owner_image, product_image);
        let request = DiffusionRequest {
            prompt: &prompt,
            negative_prompt: NEGATIVE_PROMPT,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            num_inference_steps: IMAGE_INFERENCE_STEPS,
            guidance_scale: IMAGE_GUIDANCE_SCALE,
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(self.config.token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Image backend request failed");
                AppError::InternalError(anyhow::anyhow!("Image backend request failed: {}", e))
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to read image backend response");
                AppError::InternalError(anyhow::anyhow!(
                    "Failed to read image backend response: {}",
                    e
                ))
            })?;
            tracing::error!(status = %status, body = %body, "Image backend returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read image backend response");
            AppError::InternalError(anyhow::anyhow!(
                "Failed to read image backend response: {}",
                e
            ))
        })?;

        tracing::debug!(size = bytes.len(), "Image backend response");

        Ok(bytes.to_vec())
    }
}

/// Fixed prompt template for the product showcase image.
fn showcase_prompt(owner_image: &str, product_image: &str) -> String {
    format!(
        "A social media style photo of the business owner ({}) proudly holding their product ({}), bright natural lighting, sharp focus, high detail",
        owner_image, product_image
    )
}

/// Backends that wrap their result in an "output" field are unwrapped;
/// any other JSON body passes through whole.
fn unwrap_output(document: serde_json::Value) -> serde_json::Value {
    match document {
        serde_json::Value::Object(mut map) => match map.remove("output") {
            Some(output) => output,
            None => serde_json::Value::Object(map),
        },
        other => other,
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct CaptionRequest<'a> {
    prompt: &'a str,
    top_p: f64,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct DiffusionRequest<'a> {
    prompt: &'a str,
    negative_prompt: &'a str,
    width: u32,
    height: u32,
    num_inference_steps: u32,
    guidance_scale: f64,
}
