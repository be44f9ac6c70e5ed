//! Database access for the StoreDesk backend.
//!
//! ## Tables
//!
//! - `store_expenses` - Expenses recorded against a store
//!
//! The repository talks to storage through the [`ExpenseStore`] trait so it
//! can run without a database (the connection is optional at startup) and be
//! exercised in tests with an in-memory store.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storedesk-cli -- migrate
//! ```

pub mod expenses;
pub mod store;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use expenses::ExpenseRepository;
pub use store::{ExpenseChanges, ExpenseRow, ExpenseStore, NewExpenseRow, PgExpenseStore};

/// Errors surfaced by the expense repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No storage backend is configured.
    #[error("database connection is not available")]
    Unavailable,

    /// The backend refused the operation. Carries the backend's own message.
    #[error("{0}")]
    Rejected(String),

    /// The input cannot be sent to storage.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<BackendError> for RepositoryError {
    fn from(err: BackendError) -> Self {
        if err.unreachable {
            Self::Unavailable
        } else {
            Self::Rejected(err.message)
        }
    }
}

/// Failure reported by an [`ExpenseStore`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    message: String,
    unreachable: bool,
}

impl BackendError {
    /// Create a backend error from the backend's message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unreachable: false,
        }
    }

    /// Create an error for a backend that could not be reached at all.
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unreachable: true,
        }
    }

    /// Returns true if the backend was never reached.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        self.unreachable
    }

    /// The backend's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Self::new(db_err.message()),
            // Connection-class failures say nothing about the request itself
            err @ (sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed) => Self::unreachable(err.to_string()),
            other => Self::new(other.to_string()),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_propagated_verbatim() {
        let err: RepositoryError =
            BackendError::new("duplicate key value violates unique constraint").into();
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err = BackendError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_unreachable());
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::Unavailable
        ));
    }

    #[test]
    fn test_io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = RepositoryError::from(BackendError::from(sqlx::Error::Io(io)));
        assert!(matches!(err, RepositoryError::Unavailable));
    }

    #[test]
    fn test_row_not_found_message() {
        let err = BackendError::from(sqlx::Error::RowNotFound);
        assert!(!err.message().is_empty());
    }
}
