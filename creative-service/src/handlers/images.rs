use axum::{
    extract::{Host, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::dtos::ImageGenerationResponse;
use crate::services::record_generation;
use crate::startup::AppState;

use super::required_header;

/// All stored artifacts are PNG; the backends return nothing else.
const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Generate a product showcase image and park it in ephemeral storage.
///
/// Callers pass `owner_image` and `product_image` references as headers.
/// The response carries a retrieval URL that stays valid until the host
/// clears the storage directory.
pub async fn generate_image(
    State(state): State<AppState>,
    Host(host): Host,
    headers: HeaderMap,
) -> Result<Json<ImageGenerationResponse>, AppError> {
    let owner_image = required_header(&headers, "owner_image")?;
    let product_image = required_header(&headers, "product_image")?;

    tracing::info!("Relaying image generation request");

    let bytes = match state.diffusion.generate(owner_image, product_image).await {
        Ok(bytes) => bytes,
        Err(e) => {
            record_generation("image", "error");
            return Err(e);
        }
    };

    let filename = state.images.save(&bytes).await?;
    record_generation("image", "success");

    let base_url = match &state.settings.public_base_url {
        Some(base) => base.clone(),
        None => format!("http://{}", host),
    };
    let image_url = format!("{}/get_tmp_image/{}", base_url, filename);

    tracing::info!(filename = %filename, size = bytes.len(), "Stored generated image");

    Ok(Json(ImageGenerationResponse {
        message: format!("Image generated successfully ({} bytes)", bytes.len()),
        image_url,
    }))
}

/// Serve a previously generated image back by its opaque filename.
///
/// Unauthenticated by contract: retrieval URLs are handed to parties
/// that never hold the relay secret.
pub async fn serve_tmp_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.images.load(&filename).await?;

    tracing::debug!(filename = %filename, size = data.len(), "Serving stored image");

    Ok((
        StatusCode::OK,
        [("content-type", IMAGE_CONTENT_TYPE)],
        data,
    ))
}
