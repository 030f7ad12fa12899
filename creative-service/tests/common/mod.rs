use creative_service::config::Settings;
use creative_service::startup::Application;
use std::path::PathBuf;
use uuid::Uuid;
use wiremock::MockServer;

pub use creative_service::middleware::SHARED_SECRET;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub image_dir: PathBuf,
    pub caption_backend: MockServer,
    pub image_backend: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // Values shared by every test in the binary; backend URLs are
        // replaced with mock servers on the loaded struct below.
        std::env::set_var("CAPTION_API_URL", "caption.invalid");
        std::env::set_var("CAPTION_API_TOKEN", "caption-test-token");
        std::env::set_var("IMAGE_API_URL", "image.invalid");
        std::env::set_var("IMAGE_API_TOKEN", "image-test-token");

        let caption_backend = MockServer::start().await;
        let image_backend = MockServer::start().await;

        let image_dir = PathBuf::from(format!("target/test-images-{}", Uuid::new_v4()));

        let mut settings = Settings::load().expect("Failed to load configuration");
        settings.common.port = 0; // Random port for testing
        settings.caption.url = caption_backend.uri();
        settings.image.url = image_backend.uri();
        settings.image_dir = image_dir.clone();
        settings.public_base_url = None;

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            image_dir,
            caption_backend,
            image_backend,
        }
    }

    /// Cleanup test resources (stored images).
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.image_dir).await;
    }
}
