use serde::Serialize;

/// Relayed caption output.
///
/// `response` carries the backend's unwrapped "output" value, or the
/// backend's whole JSON body when that key is absent.
#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub response: serde_json::Value,
}

/// Result of an image generation round trip.
#[derive(Debug, Serialize)]
pub struct ImageGenerationResponse {
    /// Confirmation text reporting the byte count written.
    pub message: String,
    /// Where the stored image can be fetched from.
    pub image_url: String,
}
