//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`; the invitation endpoint uses
//! [`NotifierError`] directly so its failures keep the `{"error": "..."}`
//! envelope its callers expect.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::NotifierError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Expense repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Repository(RepositoryError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(RepositoryError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Internal(_) | Self::Repository(RepositoryError::Unavailable)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Repository(RepositoryError::Unavailable) => {
                "Service temporarily unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        if matches!(self, Self::NotConfigured | Self::Template(_)) {
            sentry::capture_error(&self);
        }
        tracing::error!(error = %self, "Invitation request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
