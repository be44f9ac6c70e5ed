//! Plan limits API handlers.

use axum::{
    Json, Router,
    extract::Path,
    routing::get,
};
use serde_json::{Map, Value};

use storedesk_core::PlanType;

use crate::{error::AppError, state::AppState};

/// Build the plans router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plans", get(list_plans))
        .route("/api/plans/{plan}", get(get_plan))
}

/// All plans keyed by name.
///
/// # Errors
///
/// Returns an error if a plan fails to serialize.
pub async fn list_plans() -> Result<Json<Value>, AppError> {
    let mut plans = Map::new();
    for plan in PlanType::ALL {
        let limits = plan
            .limits()
            .to_json()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        plans.insert(plan.as_str().to_owned(), limits);
    }
    Ok(Json(Value::Object(plans)))
}

/// One plan's limits.
///
/// # Errors
///
/// Returns 404 for an unknown plan name.
pub async fn get_plan(Path(plan): Path<String>) -> Result<Json<Value>, AppError> {
    let plan: PlanType = plan.parse().map_err(AppError::NotFound)?;
    plan.limits()
        .to_json()
        .map(Json)
        .map_err(|e| AppError::Internal(e.to_string()))
}
