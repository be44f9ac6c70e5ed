//! Store expense domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ExpenseId, StoreId};

/// An expense recorded against a store.
///
/// `id`, `created_at` and `updated_at` are assigned by storage and are absent
/// until the expense has been persisted. Both timestamps are filled from the
/// row's single `created_at` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreExpense {
    /// Storage-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExpenseId>,
    /// Owning store. Fixed at creation.
    pub store_id: StoreId,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Signed currency amount.
    pub amount: Decimal,
    /// Expense date. Canonical `YYYY-MM-DD` once read back from storage.
    pub date: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Whether the expense has been paid.
    #[serde(default)]
    pub paid: bool,
    /// When the row was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Mirrors `created_at`; storage keeps no separate update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoreExpense {
    /// Returns true once storage has assigned an identifier.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some_and(|id| !id.is_empty())
    }
}
