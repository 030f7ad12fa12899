use axum::{extract::Request, middleware::Next, response::Response};
use service_core::error::AppError;

/// The fixed secret every authorized caller presents in the `auth` header.
pub const SHARED_SECRET: &str = "likha-2024";

/// Exact string equality against the fixed secret; absent values fail.
fn check_auth(supplied: Option<&str>) -> bool {
    supplied == Some(SHARED_SECRET)
}

/// Route-level guard for the generation endpoints.
///
/// Runs before the handler, so a rejected request triggers no backend
/// call and no file write.
pub async fn require_shared_secret(req: Request, next: Next) -> Result<Response, AppError> {
    let supplied = req
        .headers()
        .get("auth")
        .and_then(|value| value.to_str().ok());

    if !check_auth(supplied) {
        tracing::warn!("Rejected request with missing or invalid auth header");
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Missing or invalid auth header"
        )));
    }

    Ok(next.run(req).await)
}
