use super::ingest;
use super::types::{ErrorResponse, UploadResponse};
use crate::{Error, pipeline::Pipeline};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, Json},
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

pub async fn upload(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();

    let source = match ingest::resolve(request).await {
        Ok(source) => source,
        Err(e) => {
            error!("Rejected upload {}: {}", request_id, e);
            return Err(error_response(e));
        }
    };

    let image_base64 = source.into_base64();
    info!(
        "Received upload {} ({} base64 chars)",
        request_id,
        image_base64.len()
    );

    match state.pipeline.run(&image_base64).await {
        Ok(result) => {
            info!("Successfully processed upload {}", request_id);
            Ok(Json(UploadResponse {
                original: result.original,
                generated: result.generated,
            }))
        }
        Err(e) => {
            error!("Failed to process upload {}: {}", request_id, e);
            Err(error_response(e))
        }
    }
}

fn error_response(e: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
