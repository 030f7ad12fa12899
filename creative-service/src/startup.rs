use crate::config::Settings;
use crate::handlers;
use crate::middleware::require_shared_secret;
use crate::services::{CaptionClient, DiffusionClient, ImageStore};
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub captions: CaptionClient,
    pub diffusion: DiffusionClient,
    pub images: ImageStore,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let images = ImageStore::new(&settings.image_dir).await.map_err(|e| {
            tracing::error!(
                "Failed to initialize image storage at {}: {}",
                settings.image_dir.display(),
                e
            );
            e
        })?;

        let captions = CaptionClient::new(settings.caption.clone());
        let diffusion = DiffusionClient::new(settings.image.clone());

        let state = AppState {
            settings: settings.clone(),
            captions,
            diffusion,
            images,
        };

        let app = Router::new()
            .route("/", get(handlers::welcome))
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics))
            .route(
                "/generate_caption",
                post(handlers::generate_caption).layer(from_fn(require_shared_secret)),
            )
            .route(
                "/generate_image",
                post(handlers::generate_image).layer(from_fn(require_shared_secret)),
            )
            .route("/get_tmp_image/:filename", get(handlers::serve_tmp_image))
            .layer(from_fn(metrics_middleware))
            .layer(from_fn(request_id_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], settings.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
