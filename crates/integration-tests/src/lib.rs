//! Integration test support for StoreDesk.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no external services)
//! cargo test -p storedesk-integration-tests
//!
//! # Include the PostgreSQL tests
//! DATABASE_URL=postgres://localhost/storedesk_test \
//!     cargo test -p storedesk-integration-tests -- --include-ignored
//! ```
//!
//! # Fixtures
//!
//! - [`MemoryExpenseStore`] - in-memory `ExpenseStore` with failure injection
//! - [`StubProvider`] - local HTTP server standing in for the Resend API
//! - [`test_app`] - the full router over the given services

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use chrono::Utc;
use serde_json::Value;

use storedesk_core::{ExpenseId, StoreId};
use storedesk_server::config::ServerConfig;
use storedesk_server::db::{
    BackendError, ExpenseChanges, ExpenseRepository, ExpenseRow, ExpenseStore, NewExpenseRow,
};
use storedesk_server::routes;
use storedesk_server::services::InviteNotifier;
use storedesk_server::state::AppState;

// =============================================================================
// Expense storage
// =============================================================================

/// In-memory [`ExpenseStore`].
///
/// Rows are listed newest date first, like the `PostgreSQL` store. Setting a
/// failure message makes every call fail with it.
#[derive(Debug, Default)]
pub struct MemoryExpenseStore {
    rows: Mutex<HashMap<ExpenseId, ExpenseRow>>,
    failure: Mutex<Option<String>>,
}

impl MemoryExpenseStore {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_owned());
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw row by id.
    #[must_use]
    pub fn row(&self, id: ExpenseId) -> Option<ExpenseRow> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    /// Insert a row as-is, bypassing the repository.
    pub fn seed(&self, row: ExpenseRow) {
        self.rows.lock().unwrap().insert(row.id, row);
    }

    fn check(&self) -> Result<(), BackendError> {
        match self.failure.lock().unwrap().as_deref() {
            Some(message) => Err(BackendError::new(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn select_by_store(&self, store_id: StoreId) -> Result<Vec<ExpenseRow>, BackendError> {
        self.check()?;
        let mut rows: Vec<ExpenseRow> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.store_id == store_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn insert(&self, row: NewExpenseRow) -> Result<ExpenseRow, BackendError> {
        self.check()?;
        let stored = ExpenseRow {
            id: ExpenseId::new(uuid::Uuid::new_v4()),
            store_id: row.store_id,
            description: row.description,
            amount: row.amount,
            date: row.date,
            category: row.category,
            paid: row.paid,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: ExpenseId,
        changes: ExpenseChanges,
    ) -> Result<ExpenseRow, BackendError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| BackendError::new(format!("expense {id} not found")))?;
        row.description = changes.description;
        row.amount = changes.amount;
        row.date = changes.date;
        row.category = changes.category;
        row.paid = changes.paid;
        Ok(row.clone())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), BackendError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BackendError::new(format!("expense {id} not found")))
    }
}

// =============================================================================
// Email provider
// =============================================================================

/// A request received by the [`StubProvider`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server that answers every POST with a fixed status and body.
#[derive(Debug)]
pub struct StubProvider {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubProvider {
    /// Start a stub on an ephemeral port.
    pub async fn start(status: StatusCode, reply: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            reply,
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/emails", post(record))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    /// Endpoint URL to configure as the provider API.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/emails", self.addr)
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { authorization, body });
    (state.status, Json(state.reply))
}

// =============================================================================
// Application
// =============================================================================

/// Configuration with nothing set: no database, no provider key.
#[must_use]
pub fn empty_config() -> ServerConfig {
    ServerConfig::from_map(&HashMap::new()).unwrap()
}

/// Configuration pointing the invitation notifier at a stub provider.
#[must_use]
pub fn config_with_provider(provider: &StubProvider, api_key: &str) -> ServerConfig {
    let vars = HashMap::from([
        ("RESEND_API_KEY".to_owned(), api_key.to_owned()),
        ("RESEND_API_URL".to_owned(), provider.url()),
    ]);
    ServerConfig::from_map(&vars).unwrap()
}

/// Full router over the given services.
#[must_use]
pub fn test_app(config: ServerConfig, expenses: ExpenseRepository) -> Router {
    let notifier = InviteNotifier::from_config(config.email());
    routes::app(AppState::from_parts(config, None, expenses, notifier))
}
