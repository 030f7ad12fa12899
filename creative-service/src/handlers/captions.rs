use axum::{extract::State, http::HeaderMap, Json};
use service_core::error::AppError;

use crate::dtos::CaptionResponse;
use crate::services::record_generation;
use crate::startup::AppState;

use super::required_header;

/// Relay a caption brief to the text backend.
///
/// The brief arrives in the `prompt` header; the response carries the
/// backend's unwrapped output.
pub async fn generate_caption(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CaptionResponse>, AppError> {
    let prompt = required_header(&headers, "prompt")?;

    tracing::info!(prompt_len = prompt.len(), "Relaying caption request");

    match state.captions.generate(prompt).await {
        Ok(response) => {
            record_generation("caption", "success");
            Ok(Json(CaptionResponse { response }))
        }
        Err(e) => {
            record_generation("caption", "error");
            Err(e)
        }
    }
}
