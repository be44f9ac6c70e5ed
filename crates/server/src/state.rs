//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{ExpenseRepository, PgExpenseStore};
use crate::services::InviteNotifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: Option<PgPool>,
    expenses: ExpenseRepository,
    notifier: InviteNotifier,
}

impl AppState {
    /// Create the application state from configuration and an optional pool.
    ///
    /// Without a pool the expense repository runs unavailable; without a
    /// Resend key the notifier runs unconfigured.
    #[must_use]
    pub fn new(config: ServerConfig, pool: Option<PgPool>) -> Self {
        let expenses = pool.clone().map_or_else(ExpenseRepository::unavailable, |pool| {
            ExpenseRepository::new(Arc::new(PgExpenseStore::new(pool)))
        });
        let notifier = InviteNotifier::from_config(&config.email);

        Self::from_parts(config, pool, expenses, notifier)
    }

    /// Assemble state from already-built services.
    #[must_use]
    pub fn from_parts(
        config: ServerConfig,
        pool: Option<PgPool>,
        expenses: ExpenseRepository,
        notifier: InviteNotifier,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                expenses,
                notifier,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the database pool, if storage is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get the expense repository.
    #[must_use]
    pub fn expenses(&self) -> &ExpenseRepository {
        &self.inner.expenses
    }

    /// Get the invitation notifier.
    #[must_use]
    pub fn notifier(&self) -> &InviteNotifier {
        &self.inner.notifier
    }
}
