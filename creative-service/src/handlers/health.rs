use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::services::get_metrics;

/// Landing route with pointers to the generation endpoints.
pub async fn welcome() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the creative relay! POST /generate_caption or /generate_image to create content.",
        "service": "creative-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "creative-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// The relay holds no connections of its own; readiness equals liveness.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
