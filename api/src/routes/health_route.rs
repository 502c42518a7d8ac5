use std::sync::Arc;

use ai_llm_service::health_service::probe;
use axum::{extract::State, http::StatusCode, response::Response};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

/// Handler: GET /health
///
/// 200 when the embedding probe succeeds, 503 otherwise; the body always
/// carries the probe report.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let status = probe(&state.gateway).await;
    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    ApiResponse::success(status).into_response_with_status(code)
}
