//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Health
//! GET    /health                           - Liveness
//! GET    /health/ready                     - Readiness (database reachable)
//!
//! # Expenses
//! GET    /api/stores/{store_id}/expenses   - List a store's expenses
//! POST   /api/stores/{store_id}/expenses   - Create an expense
//! PUT    /api/expenses/{id}                - Update an expense
//! DELETE /api/expenses/{id}                - Delete an expense
//!
//! # Plans
//! GET    /api/plans                        - All plan limits
//! GET    /api/plans/{plan}                 - One plan's limits
//!
//! # Functions
//! POST   /functions/v1/send-invite         - Email a team invitation
//! OPTIONS /functions/v1/send-invite        - CORS pre-flight
//! ```

pub mod expenses;
pub mod health;
pub mod invites;
pub mod plans;

use axum::Router;

use crate::state::AppState;

/// Build the application router with all routes and state attached.
///
/// Observability layers (tracing, Sentry) are added by the binary.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

/// All routes, without state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(expenses::router())
        .merge(plans::router())
        .merge(invites::router())
}
