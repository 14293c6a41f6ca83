//! API error taxonomy.
//!
//! Stopping a name with nothing open and reading current with nothing open
//! are defined empty results, not errors; they never appear here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input missing or empty; the operation was not attempted.
    #[error("{0}")]
    Validation(String),

    /// Shared-secret check failed (missing or mismatched key).
    #[error("invalid or missing API key")]
    Unauthorized,

    /// The store could not be reached or a statement failed. Retryable; the
    /// single-statement operations leave no partial effect behind.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::Storage(e) => {
                tracing::error!(error = %e, "storage operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
