//! GET /api/list-models: installed models of the runtime.

use std::sync::Arc;

use ai_llm_service::{ModelCatalog, ModelEntry};
use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct ListModelsResponse {
    /// One header → cell mapping per installed model.
    pub models: Vec<ModelEntry>,
}

/// Handler: GET /api/list-models
///
/// A successful listing also refreshes the cached model catalog.
///
/// # Example
/// ```bash
/// curl http://127.0.0.1:8000/api/list-models
/// ```
pub async fn list_models(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let models = state.gateway.list_available_models().await?;
    debug!(count = models.len(), "listing models");

    *state.catalog.write().await = ModelCatalog::Ready(models.clone());

    Ok(ApiResponse::success(ListModelsResponse { models }).into_response_with_status(StatusCode::OK))
}
