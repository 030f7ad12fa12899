pub mod captions;
pub mod health;
pub mod images;

pub use captions::generate_caption;
pub use health::{health_check, metrics, readiness_check, welcome};
pub use images::{generate_image, serve_tmp_image};

use axum::http::HeaderMap;
use service_core::error::AppError;

/// Extract a required, non-empty request header as text.
pub(crate) fn required_header<'a>(
    headers: &'a HeaderMap,
    name: &str,
) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Missing required header: {}", name)))
}
