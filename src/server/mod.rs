pub mod handlers;
pub mod ingest;
pub mod types;

use crate::{Result, config::Config, pipeline::Pipeline};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The pipeline is the only shared object: immutable, holds the
    // credential-bearing client, constructed once at startup.
    let pipeline = Pipeline::new(config.llm.clone());

    let app_state = handlers::AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
