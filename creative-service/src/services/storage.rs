use service_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// Flat ephemeral store for generated images.
///
/// Files are write-once under server-minted UUID names. Nothing here
/// deletes them; the host's temp-directory policy is the retention
/// scheme.
#[derive(Clone)]
pub struct ImageStore {
    base_dir: PathBuf,
}

impl ImageStore {
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_dir = base_dir.into();
        if !base_dir.exists() {
            fs::create_dir_all(&base_dir).await?;
        }
        Ok(Self { base_dir })
    }

    /// Persist image bytes under a fresh opaque name and return the name.
    ///
    /// The write completes before the name is handed out; a name is never
    /// advertised for a missing or partial file.
    pub async fn save(&self, data: &[u8]) -> Result<String, AppError> {
        fs::create_dir_all(&self.base_dir).await?;

        let filename = format!("{}.png", Uuid::new_v4());
        fs::write(self.base_dir.join(&filename), data).await?;

        Ok(filename)
    }

    /// Read an image back by the name `save` returned.
    ///
    /// Names are opaque leaves: anything path-like is rejected before the
    /// filesystem is touched.
    pub async fn load(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        if !is_opaque_leaf(filename) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid image name: {}",
                filename
            )));
        }

        let path = self.base_dir.join(filename);
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                anyhow::anyhow!("Image not found: {}", filename),
            )),
            Err(e) => Err(AppError::from(e)),
        }
    }
}

fn is_opaque_leaf(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}
