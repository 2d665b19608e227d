use super::types::UploadRequest;
use crate::{Error, Result};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// The two accepted upload shapes, resolved once at the HTTP boundary. Both
/// normalize to a base64 payload before entering the pipeline.
#[derive(Debug)]
pub enum ImageSource {
    /// JSON body already carrying base64 image data.
    Base64Payload(String),
    /// Raw bytes of a multipart `image` file field.
    FileUpload(Bytes),
}

impl ImageSource {
    pub fn into_base64(self) -> String {
        match self {
            Self::Base64Payload(payload) => payload,
            Self::FileUpload(bytes) => STANDARD.encode(&bytes),
        }
    }
}

/// Resolves the request body into an [`ImageSource`]. A JSON content type
/// selects the base64 variant; anything else is treated as a multipart form
/// with an `image` file field, matching how the upload page submits.
pub async fn resolve(request: Request) -> Result<ImageSource> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if is_json {
        let body = axum::body::to_bytes(request.into_body(), usize::MAX).await?;
        let upload: UploadRequest =
            serde_json::from_slice(&body).map_err(|_| Error::MissingImageData)?;
        match upload.image_base64 {
            Some(payload) if !payload.is_empty() => Ok(ImageSource::Base64Payload(payload)),
            _ => Err(Error::MissingImageData),
        }
    } else {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| Error::MissingImageFile)?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| Error::MissingImageFile)?
        {
            if field.name() == Some("image") {
                let bytes = field.bytes().await.map_err(|_| Error::MissingImageFile)?;
                return Ok(ImageSource::FileUpload(bytes));
            }
        }

        Err(Error::MissingImageFile)
    }
}
