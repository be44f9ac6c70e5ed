//! Storage capability for expense rows and its `PostgreSQL` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storedesk_core::{ExpenseId, StoreId};

use super::BackendError;

/// One row of the `store_expenses` table.
///
/// `date` is the column rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub store_id: StoreId,
    pub description: String,
    pub amount: Decimal,
    pub date: String,
    pub category: String,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

/// Column values for an insert. Storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpenseRow {
    pub store_id: StoreId,
    pub description: String,
    pub amount: Decimal,
    pub date: String,
    pub category: String,
    pub paid: bool,
}

/// Column values for an update. `store_id` is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub description: String,
    pub amount: Decimal,
    pub date: String,
    pub category: String,
    pub paid: bool,
}

/// Row-level access to the expense table.
///
/// Each method is a single round trip. Implementations report failures with
/// the backend's own message.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// All rows belonging to a store.
    async fn select_by_store(&self, store_id: StoreId) -> Result<Vec<ExpenseRow>, BackendError>;

    /// Insert one row and return it as stored.
    async fn insert(&self, row: NewExpenseRow) -> Result<ExpenseRow, BackendError>;

    /// Update one row by id and return it as stored.
    async fn update(
        &self,
        id: ExpenseId,
        changes: ExpenseChanges,
    ) -> Result<ExpenseRow, BackendError>;

    /// Delete one row by id.
    async fn delete(&self, id: ExpenseId) -> Result<(), BackendError>;
}

/// [`ExpenseStore`] backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgExpenseStore {
    pool: PgPool,
}

impl PgExpenseStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: ExpenseId) -> BackendError {
    BackendError::new(format!("expense {id} not found"))
}

#[async_trait]
impl ExpenseStore for PgExpenseStore {
    async fn select_by_store(&self, store_id: StoreId) -> Result<Vec<ExpenseRow>, BackendError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r"
            SELECT id, store_id, description, amount,
                   store_expenses.date::text AS date,
                   category, paid, created_at
            FROM store_expenses
            WHERE store_id = $1
            ORDER BY store_expenses.date DESC, created_at DESC
            ",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, row: NewExpenseRow) -> Result<ExpenseRow, BackendError> {
        let inserted = sqlx::query_as::<_, ExpenseRow>(
            r"
            INSERT INTO store_expenses (store_id, description, amount, date, category, paid)
            VALUES ($1, $2, $3, $4::date, $5, $6)
            RETURNING id, store_id, description, amount,
                      store_expenses.date::text AS date,
                      category, paid, created_at
            ",
        )
        .bind(row.store_id)
        .bind(row.description)
        .bind(row.amount)
        .bind(row.date)
        .bind(row.category)
        .bind(row.paid)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update(
        &self,
        id: ExpenseId,
        changes: ExpenseChanges,
    ) -> Result<ExpenseRow, BackendError> {
        sqlx::query_as::<_, ExpenseRow>(
            r"
            UPDATE store_expenses
            SET description = $2, amount = $3, date = $4::date, category = $5, paid = $6
            WHERE id = $1
            RETURNING id, store_id, description, amount,
                      store_expenses.date::text AS date,
                      category, paid, created_at
            ",
        )
        .bind(id)
        .bind(changes.description)
        .bind(changes.amount)
        .bind(changes.date)
        .bind(changes.category)
        .bind(changes.paid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), BackendError> {
        let result = sqlx::query("DELETE FROM store_expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }
}
