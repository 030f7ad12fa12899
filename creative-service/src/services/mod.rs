pub mod backends;
pub mod metrics;
pub mod storage;

pub use backends::{CaptionClient, DiffusionClient};
pub use metrics::{get_metrics, init_metrics, record_generation};
pub use storage::ImageStore;
