//! Expense repository.
//!
//! Maps [`StoreExpense`] values to `store_expenses` rows and back. Reads are
//! fail-open (any failure yields an empty list, logged at `warn`); writes
//! surface every failure to the caller.

use std::sync::Arc;

use storedesk_core::{ExpenseId, StoreExpense, StoreId, normalize_date};

use super::RepositoryError;
use super::store::{ExpenseChanges, ExpenseRow, ExpenseStore, NewExpenseRow};

impl From<ExpenseRow> for StoreExpense {
    fn from(row: ExpenseRow) -> Self {
        let date = normalize_date(&row.date).unwrap_or_else(|e| {
            tracing::warn!(expense_id = %row.id, error = %e, "Stored expense date is not normalizable");
            row.date.clone()
        });

        Self {
            id: Some(row.id),
            store_id: row.store_id,
            description: row.description,
            amount: row.amount,
            date,
            category: row.category,
            paid: row.paid,
            created_at: Some(row.created_at),
            updated_at: Some(row.created_at),
        }
    }
}

/// Repository for store expenses.
///
/// Holds an optional storage backend; without one, reads return nothing and
/// writes fail with [`RepositoryError::Unavailable`].
#[derive(Clone, Default)]
pub struct ExpenseRepository {
    store: Option<Arc<dyn ExpenseStore>>,
}

impl ExpenseRepository {
    /// Create a repository over a storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Create a repository with no storage backend.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { store: None }
    }

    /// Returns true if a storage backend is configured.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&dyn ExpenseStore, RepositoryError> {
        self.store.as_deref().ok_or(RepositoryError::Unavailable)
    }

    /// List all expenses of a store.
    ///
    /// Never fails: an empty store id, a missing backend or a failed query
    /// all produce an empty list.
    pub async fn list(&self, store_id: StoreId) -> Vec<StoreExpense> {
        if store_id.is_empty() {
            tracing::warn!("Expense list requested without a store id");
            return Vec::new();
        }

        let Ok(store) = self.store() else {
            tracing::warn!(%store_id, "Expense list requested but storage is unavailable");
            return Vec::new();
        };

        match store.select_by_store(store_id).await {
            Ok(rows) => rows.into_iter().map(StoreExpense::from).collect(),
            Err(e) => {
                tracing::warn!(%store_id, error = %e, "Failed to list expenses");
                Vec::new()
            }
        }
    }

    /// Persist a new expense.
    ///
    /// Returns the input with the storage-assigned id filled in. Other
    /// storage-assigned fields are not copied back.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Unavailable` if no backend is configured
    /// - `RepositoryError::Validation` for an empty store id or bad date
    /// - `RepositoryError::Rejected` with the backend message if the insert fails
    pub async fn create(&self, expense: StoreExpense) -> Result<StoreExpense, RepositoryError> {
        let store = self.store()?;

        if expense.store_id.is_empty() {
            return Err(RepositoryError::Validation(
                "store id is required".to_owned(),
            ));
        }
        let date = canonical_date(&expense.date)?;

        let row = store
            .insert(NewExpenseRow {
                store_id: expense.store_id,
                description: expense.description.clone(),
                amount: expense.amount,
                date,
                category: expense.category.clone(),
                paid: expense.paid,
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(store_id = %expense.store_id, error = %e, "Failed to create expense");
            })?;

        tracing::info!(expense_id = %row.id, store_id = %row.store_id, "Expense created");

        Ok(StoreExpense {
            id: Some(row.id),
            ..expense
        })
    }

    /// Update an existing expense.
    ///
    /// Sends description, amount, date, category and paid; the store id is
    /// never changed. Returns the input unchanged.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Validation` if the expense has no id (checked
    ///   before anything else) or the date is invalid
    /// - `RepositoryError::Unavailable` if no backend is configured
    /// - `RepositoryError::Rejected` with the backend message if the update fails
    pub async fn update(&self, expense: StoreExpense) -> Result<StoreExpense, RepositoryError> {
        let id = expense
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RepositoryError::Validation("expense id is required".to_owned()))?;

        let store = self.store()?;
        let date = canonical_date(&expense.date)?;

        store
            .update(
                id,
                ExpenseChanges {
                    description: expense.description.clone(),
                    amount: expense.amount,
                    date,
                    category: expense.category.clone(),
                    paid: expense.paid,
                },
            )
            .await
            .inspect_err(|e| {
                tracing::warn!(expense_id = %id, error = %e, "Failed to update expense");
            })?;

        tracing::info!(expense_id = %id, "Expense updated");
        Ok(expense)
    }

    /// Delete an expense by id.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Unavailable` if no backend is configured
    /// - `RepositoryError::Validation` for an empty id
    /// - `RepositoryError::Rejected` with the backend message if the delete fails
    pub async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let store = self.store()?;

        if id.is_empty() {
            return Err(RepositoryError::Validation(
                "expense id is required".to_owned(),
            ));
        }

        store.delete(id).await.inspect_err(|e| {
            tracing::warn!(expense_id = %id, error = %e, "Failed to delete expense");
        })?;

        tracing::info!(expense_id = %id, "Expense deleted");
        Ok(())
    }
}

impl std::fmt::Debug for ExpenseRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseRepository")
            .field("available", &self.is_available())
            .finish()
    }
}

fn canonical_date(raw: &str) -> Result<String, RepositoryError> {
    normalize_date(raw).map_err(|e| RepositoryError::Validation(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::db::BackendError;

    /// Records every call and either answers from memory or fails.
    #[derive(Default)]
    struct RecordingStore {
        calls: AtomicUsize,
        fail_with: Option<String>,
        inserted: Mutex<Vec<NewExpenseRow>>,
        updated: Mutex<Vec<(ExpenseId, ExpenseChanges)>>,
        rows: Mutex<Vec<ExpenseRow>>,
    }

    impl RecordingStore {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_owned()),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(BackendError::new(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ExpenseStore for RecordingStore {
        async fn select_by_store(
            &self,
            store_id: StoreId,
        ) -> Result<Vec<ExpenseRow>, BackendError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|row| row.store_id == store_id)
                .cloned()
                .collect())
        }

        async fn insert(&self, row: NewExpenseRow) -> Result<ExpenseRow, BackendError> {
            self.check()?;
            self.inserted.lock().unwrap().push(row.clone());
            Ok(ExpenseRow {
                id: ExpenseId::new(Uuid::new_v4()),
                store_id: row.store_id,
                description: row.description,
                amount: row.amount,
                date: row.date,
                category: row.category,
                paid: row.paid,
                created_at: Utc::now(),
            })
        }

        async fn update(
            &self,
            id: ExpenseId,
            changes: ExpenseChanges,
        ) -> Result<ExpenseRow, BackendError> {
            self.check()?;
            self.updated.lock().unwrap().push((id, changes.clone()));
            Ok(ExpenseRow {
                id,
                store_id: StoreId::new(Uuid::new_v4()),
                description: changes.description,
                amount: changes.amount,
                date: changes.date,
                category: changes.category,
                paid: changes.paid,
                created_at: Utc::now(),
            })
        }

        async fn delete(&self, _id: ExpenseId) -> Result<(), BackendError> {
            self.check()
        }
    }

    fn expense(store_id: StoreId) -> StoreExpense {
        StoreExpense {
            id: None,
            store_id,
            description: "Tyre rotation".to_owned(),
            amount: Decimal::from_str("89.90").unwrap(),
            date: "05/03/2024".to_owned(),
            category: "maintenance".to_owned(),
            paid: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn repo(store: &Arc<RecordingStore>) -> ExpenseRepository {
        ExpenseRepository::new(Arc::clone(store) as Arc<dyn ExpenseStore>)
    }

    #[tokio::test]
    async fn test_list_without_backend_is_empty() {
        let repo = ExpenseRepository::unavailable();
        assert!(repo.list(StoreId::new(Uuid::new_v4())).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_swallows_backend_failure() {
        let store = Arc::new(RecordingStore::failing("connection reset"));
        let expenses = repo(&store).list(StoreId::new(Uuid::new_v4())).await;
        assert!(expenses.is_empty());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_with_empty_store_id_skips_backend() {
        let store = Arc::new(RecordingStore::default());
        assert!(repo(&store).list(StoreId::new(Uuid::nil())).await.is_empty());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_maps_rows_and_mirrors_timestamps() {
        let store = Arc::new(RecordingStore::default());
        let store_id = StoreId::new(Uuid::new_v4());
        let created_at = Utc::now();
        store.rows.lock().unwrap().push(ExpenseRow {
            id: ExpenseId::new(Uuid::new_v4()),
            store_id,
            description: "Rent".to_owned(),
            amount: Decimal::from(1500),
            date: "2024/03/01".to_owned(),
            category: "fixed".to_owned(),
            paid: false,
            created_at,
        });

        let expenses = repo(&store).list(store_id).await;
        assert_eq!(expenses.len(), 1);
        let expense = expenses.first().unwrap();
        assert_eq!(expense.date, "2024-03-01");
        assert_eq!(expense.created_at, Some(created_at));
        assert_eq!(expense.updated_at, Some(created_at));
        assert!(expense.is_persisted());
    }

    #[tokio::test]
    async fn test_create_without_backend_is_unavailable() {
        let repo = ExpenseRepository::unavailable();
        let result = repo.create(expense(StoreId::new(Uuid::new_v4()))).await;
        assert!(matches!(result, Err(RepositoryError::Unavailable)));
    }

    #[tokio::test]
    async fn test_create_normalizes_date_and_returns_input_with_id() {
        let store = Arc::new(RecordingStore::default());
        let input = expense(StoreId::new(Uuid::new_v4()));

        let created = repo(&store).create(input.clone()).await.unwrap();

        assert!(created.is_persisted());
        assert_eq!(created.date, input.date);
        assert!(created.created_at.is_none());

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted.first().unwrap().date, "2024-03-05");
    }

    #[tokio::test]
    async fn test_create_requires_store_id() {
        let store = Arc::new(RecordingStore::default());
        let result = repo(&store).create(expense(StoreId::new(Uuid::nil()))).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_date() {
        let store = Arc::new(RecordingStore::default());
        let input = StoreExpense {
            date: "someday".to_owned(),
            ..expense(StoreId::new(Uuid::new_v4()))
        };
        let result = repo(&store).create(input).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_propagates_backend_message() {
        let store = Arc::new(RecordingStore::failing("amount out of range"));
        let result = repo(&store).create(expense(StoreId::new(Uuid::new_v4()))).await;
        match result {
            Err(RepositoryError::Rejected(message)) => assert_eq!(message, "amount out of range"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_without_id_makes_no_call() {
        let store = Arc::new(RecordingStore::default());
        let result = repo(&store).update(expense(StoreId::new(Uuid::new_v4()))).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_without_id_is_validation_even_without_backend() {
        let repo = ExpenseRepository::unavailable();
        let result = repo.update(expense(StoreId::new(Uuid::new_v4()))).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_sends_changes_and_returns_input() {
        let store = Arc::new(RecordingStore::default());
        let id = ExpenseId::new(Uuid::new_v4());
        let input = StoreExpense {
            id: Some(id),
            date: "2024-03-05T10:00:00-03:00".to_owned(),
            ..expense(StoreId::new(Uuid::new_v4()))
        };

        let updated = repo(&store).update(input.clone()).await.unwrap();
        assert_eq!(updated, input);

        let calls = store.updated.lock().unwrap();
        let (sent_id, changes) = calls.first().unwrap();
        assert_eq!(*sent_id, id);
        assert_eq!(changes.date, "2024-03-05");
        assert_eq!(changes.description, "Tyre rotation");
    }

    #[tokio::test]
    async fn test_delete_propagates_backend_message() {
        let store = Arc::new(RecordingStore::failing("expense not found"));
        let result = repo(&store).delete(ExpenseId::new(Uuid::new_v4())).await;
        assert!(matches!(result, Err(RepositoryError::Rejected(m)) if m == "expense not found"));
    }

    #[tokio::test]
    async fn test_delete_without_backend_is_unavailable() {
        let result = ExpenseRepository::unavailable()
            .delete(ExpenseId::new(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(RepositoryError::Unavailable)));
    }
}
