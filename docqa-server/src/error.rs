//! API error type and its HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use docqa_core::{QaError, SoftError};

/// Result type alias for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A malformed or unprocessable request.
    #[error("{0}")]
    Validation(String),

    /// A document id that is not in the store.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A degraded pipeline outcome that still carries a displayable
    /// message for the caller.
    #[error("{}", .0.message)]
    Soft(#[from] SoftError),

    /// Anything that should not leak detail to the caller.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::Validation(msg) | QaError::Config(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            // Soft failures answer 200 with the displayable message in
            // the normal response shape: callers keep getting an answer
            // field even when a collaborator is down.
            ApiError::Soft(soft) => {
                let body = json!({
                    "response": soft.message,
                    "confidence": 0.0,
                    "has_answer": false,
                    "sources": [],
                });
                return (StatusCode::OK, Json(body)).into_response();
            }
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = json!({
            "error": error_type,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
