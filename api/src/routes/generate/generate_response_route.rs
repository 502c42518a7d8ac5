//! GET /api/generate-response: RAG answer for a prompt.

use std::sync::Arc;

use ai_llm_service::ModelName;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use tracing::{debug, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::generate::generate_request::{GenerateQuery, GenerateResponse},
};

/// Handler: GET /api/generate-response?prompt=...&model=...
///
/// The model name is validated against a freshly listed catalog before the
/// pipeline runs.
///
/// # Example
/// ```bash
/// curl 'http://127.0.0.1:8000/api/generate-response?prompt=What%20color%20is%20the%20sky%3F&model=llama3'
/// ```
#[instrument(skip_all, fields(model = %query.model))]
pub async fn generate_response(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenerateQuery>,
) -> AppResult<Response> {
    if query.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".into()));
    }

    let catalog = state.refresh_catalog().await;
    let model = ModelName::validate(&query.model, &catalog)?;
    debug!(degraded = catalog.is_degraded(), "model accepted");

    let response = state.contextor.answer(&query.prompt, model.as_str()).await?;

    Ok(ApiResponse::success(GenerateResponse { response }).into_response_with_status(StatusCode::OK))
}
