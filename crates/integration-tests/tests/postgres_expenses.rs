//! `PostgreSQL`-backed expense tests.
//!
//! Ignored by default. Run with a migrated database:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/storedesk_test \
//!     cargo test -p storedesk-integration-tests --test postgres_expenses -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;

use storedesk_core::{ExpenseId, StoreExpense, StoreId};
use storedesk_server::db::{ExpenseRepository, PgExpenseStore, RepositoryError, create_pool};

async fn repository() -> ExpenseRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&SecretString::from(url)).await.unwrap();
    ExpenseRepository::new(Arc::new(PgExpenseStore::new(pool)))
}

fn expense(store_id: StoreId, date: &str) -> StoreExpense {
    StoreExpense {
        id: None,
        store_id,
        description: "Alignment".to_owned(),
        amount: Decimal::from_str("-12.50").unwrap(),
        date: date.to_owned(),
        category: "service".to_owned(),
        paid: false,
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_round_trip_through_postgres() {
    let repo = repository().await;
    let store_id = StoreId::new(uuid::Uuid::new_v4());

    let created = repo.create(expense(store_id, "05/03/2024")).await.unwrap();
    let id = created.id.unwrap();

    let listed = repo.list(store_id).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, Some(id));
    assert_eq!(listed[0].date, "2024-03-05");
    assert_eq!(listed[0].amount, Decimal::from_str("-12.50").unwrap());
    assert!(listed[0].created_at.is_some());

    let paid = StoreExpense {
        paid: true,
        ..listed[0].clone()
    };
    repo.update(paid).await.unwrap();
    assert!(repo.list(store_id).await[0].paid);

    repo.delete(id).await.unwrap();
    assert!(repo.list(store_id).await.is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_missing_row_is_rejected() {
    let repo = repository().await;
    let result = repo.delete(ExpenseId::new(uuid::Uuid::new_v4())).await;
    assert!(matches!(result, Err(RepositoryError::Rejected(_))));
}
