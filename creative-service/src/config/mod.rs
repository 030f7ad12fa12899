use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::config::get_env;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Immutable startup snapshot shared through router state.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub caption: BackendConfig,
    pub image: BackendConfig,
    /// Directory generated images are parked in until the host clears it.
    pub image_dir: PathBuf,
    /// Absolute base for retrieval URLs; falls back to the request host.
    pub public_base_url: Option<String>,
}

/// Endpoint and bearer token for one inference backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub token: Secret<String>,
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(Settings {
            common,
            caption: BackendConfig {
                url: normalize_endpoint(&get_env("CAPTION_API_URL", None, is_prod)?),
                token: Secret::new(get_env("CAPTION_API_TOKEN", None, is_prod)?),
            },
            image: BackendConfig {
                url: normalize_endpoint(&get_env("IMAGE_API_URL", None, is_prod)?),
                token: Secret::new(get_env("IMAGE_API_TOKEN", None, is_prod)?),
            },
            image_dir: env::var("TMP_IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join("tmp_images")),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }
}

/// Backends are configured as full URLs; a bare host is taken to be HTTPS.
fn normalize_endpoint(raw: &str) -> String {
    let endpoint = raw.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}
