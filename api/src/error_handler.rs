use ai_llm_service::{AiLlmError, ModelSelectionError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use rag_store::RagError;
use thiserror::Error;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
        details: Vec<ApiErrorDetail>,
    },
}

impl AppError {
    fn http(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        AppError::Http {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR, // startup-only
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        let details = match self {
            AppError::Http { details, .. } => details,
            _ => Vec::new(),
        };
        ApiResponse::<()>::error(code, message, details).into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        let (status, code) = match &err {
            AiLlmError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AiLlmError::ModelUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE")
            }
            AiLlmError::InvalidResponse(_) => (StatusCode::BAD_GATEWAY, "INVALID_RESPONSE"),
            AiLlmError::HttpStatus { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            AiLlmError::ListingFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LISTING_FAILED"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        AppError::http(status, code, err.to_string())
    }
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        let (status, code) = match err {
            RagError::Gateway(e) => return e.into(),
            RagError::Embedding {
                source: AiLlmError::ServiceUnavailable(_),
                ..
            } => (StatusCode::SERVICE_UNAVAILABLE, "EMBEDDING_FAILED"),
            RagError::Embedding { .. } => (StatusCode::BAD_GATEWAY, "EMBEDDING_FAILED"),
            RagError::NoDocuments { .. } => (StatusCode::NOT_FOUND, "NO_DOCUMENTS"),
            RagError::Document { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_READ_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "VECTOR_STORE_ERROR"),
        };
        AppError::http(status, code, err.to_string())
    }
}

impl From<ContextorError> for AppError {
    fn from(err: ContextorError) -> Self {
        match err {
            ContextorError::NoRelevantDocument => AppError::Http {
                status: StatusCode::NOT_FOUND,
                code: "NO_RELEVANT_DOCUMENT",
                message: err.to_string(),
                details: vec![ApiErrorDetail {
                    path: None,
                    hint: Some("Index documents first via POST /api/index-db.".into()),
                }],
            },
            ContextorError::ModelUnavailable { .. } => AppError::http(
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
                err.to_string(),
            ),
            ContextorError::Gateway(e) => e.into(),
            ContextorError::Rag(e) => e.into(),
        }
    }
}

impl From<ModelSelectionError> for AppError {
    fn from(err: ModelSelectionError) -> Self {
        match &err {
            ModelSelectionError::Empty => AppError::BadRequest(err.to_string()),
            ModelSelectionError::NotInstalled { available, .. } => AppError::Http {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "UNKNOWN_MODEL",
                message: err.to_string(),
                details: vec![ApiErrorDetail {
                    path: Some("model".into()),
                    hint: Some(if available.is_empty() {
                        "No models are installed; pull one with `ollama pull <model>`.".into()
                    } else {
                        format!("Installed models: {}", available.join(", "))
                    }),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_statuses() {
        let cases: Vec<(AppError, StatusCode, &str)> = vec![
            (
                AiLlmError::ServiceUnavailable("down".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
            (
                AiLlmError::InvalidResponse("no field".into()).into(),
                StatusCode::BAD_GATEWAY,
                "INVALID_RESPONSE",
            ),
            (
                ContextorError::NoRelevantDocument.into(),
                StatusCode::NOT_FOUND,
                "NO_RELEVANT_DOCUMENT",
            ),
            (
                ModelSelectionError::Empty.into(),
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
            ),
            (
                ModelSelectionError::NotInstalled {
                    requested: "x".into(),
                    available: vec!["llama3".into()],
                }
                .into(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_MODEL",
            ),
            (
                RagError::Qdrant("boom".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "VECTOR_STORE_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status, "{err}");
            assert_eq!(err.error_code(), code, "{err}");
        }
    }

    #[test]
    fn wrapped_gateway_errors_keep_their_status() {
        let err: AppError = ContextorError::Gateway(AiLlmError::ServiceUnavailable("x".into())).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
