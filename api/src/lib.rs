pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::{ApiConfig, AppState},
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        generate::generate_response_route::generate_response, health_route::health,
        indexing::index_db_route::index_db, models::list_models_route::list_models,
    },
};

/// All routes with the error-envelope middleware applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/list-models", get(list_models))
        .route("/api/index-db", post(index_db))
        .route("/api/generate-response", get(generate_response))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Binds `config.address` and serves until Ctrl+C.
pub async fn start(config: &ApiConfig, state: Arc<AppState>) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %config.address, documents = %config.documents_dir.display(), "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
