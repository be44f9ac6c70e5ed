//! Store expense API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use storedesk_core::{ExpenseId, StoreExpense, StoreId};

use crate::{error::AppError, state::AppState};

/// Build the expenses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/stores/{store_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route(
            "/api/expenses/{id}",
            put(update_expense).delete(delete_expense),
        )
}

/// Body for creating an expense. The store comes from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseRequest {
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub paid: bool,
}

/// Body for updating an expense.
///
/// Only the mutable fields are read; the store never changes on update. An
/// optional `storeId` is echoed back in the response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub paid: bool,
}

/// List a store's expenses, newest first.
///
/// Storage failures degrade to an empty list.
#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Json<Vec<StoreExpense>> {
    Json(state.expenses().list(store_id).await)
}

/// Create an expense for a store.
///
/// # Errors
///
/// Returns an error if storage is unavailable, the date is unreadable, or
/// the insert is rejected.
#[instrument(skip(state, body))]
pub async fn create_expense(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Json(body): Json<NewExpenseRequest>,
) -> Result<(StatusCode, Json<StoreExpense>), AppError> {
    let expense = StoreExpense {
        id: None,
        store_id,
        description: body.description,
        amount: body.amount,
        date: body.date,
        category: body.category,
        paid: body.paid,
        created_at: None,
        updated_at: None,
    };

    let created = state.expenses().create(expense).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an expense's mutable fields.
///
/// The expense is identified by the path id only.
///
/// # Errors
///
/// Returns an error if storage is unavailable, the date is unreadable, or
/// the update is rejected.
#[instrument(skip(state, body))]
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<ExpenseId>,
    Json(body): Json<UpdateExpenseRequest>,
) -> Result<Json<StoreExpense>, AppError> {
    let expense = StoreExpense {
        id: Some(id),
        store_id: body.store_id.unwrap_or_else(|| StoreId::new(Uuid::nil())),
        description: body.description,
        amount: body.amount,
        date: body.date,
        category: body.category,
        paid: body.paid,
        created_at: None,
        updated_at: None,
    };

    Ok(Json(state.expenses().update(expense).await?))
}

/// Delete an expense.
///
/// # Errors
///
/// Returns an error if storage is unavailable or the delete is rejected.
#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<ExpenseId>,
) -> Result<StatusCode, AppError> {
    state.expenses().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
