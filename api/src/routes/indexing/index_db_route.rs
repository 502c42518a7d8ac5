use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::{error, info};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

pub const INDEXING_STARTED: &str = "Indexing started successfully.";

#[derive(Debug, Serialize)]
pub struct IndexDbResponse {
    pub message: String,
}

/// Handler: POST /api/index-db
///
/// Starts indexing the documents directory in the background and returns
/// immediately. The outcome is only logged.
pub async fn index_db(State(state): State<Arc<AppState>>) -> Response {
    let indexer = state.indexer.clone();
    let dir = state.documents_dir.clone();

    tokio::spawn(async move {
        match indexer.index_all(&dir).await {
            Ok(report) => info!(
                indexed = report.indexed,
                files = ?report.files,
                "background indexing finished"
            ),
            Err(err) => error!(error = %err, dir = %dir.display(), "background indexing failed"),
        }
    });

    ApiResponse::success(IndexDbResponse {
        message: INDEXING_STARTED.into(),
    })
    .into_response_with_status(StatusCode::OK)
}
