use serde::{Deserialize, Serialize};

/// JSON variant of the upload body, used by the "换一道题" (regenerate) flow
/// which re-sends the image it already holds.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub original: String,
    pub generated: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
