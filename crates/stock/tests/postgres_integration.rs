//! PostgreSQL integration tests for the stock ledger.
//!
//! These tests need a local Docker daemon; they are ignored by default.
//! Run with:
//!
//! ```bash
//! cargo test -p stock --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use common::Sku;
use stock::{PostgresStockLedger, StockLedger};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_ledger() -> PostgresStockLedger {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    let ledger = PostgresStockLedger::new(pool);
    ledger.ensure_schema().await.unwrap();

    sqlx::query("TRUNCATE TABLE stock_levels")
        .execute(ledger.pool())
        .await
        .unwrap();

    ledger
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn conditional_reserve_and_release() {
    let ledger = get_test_ledger().await;
    let sku = Sku::new("RUG-12345");

    ledger.set_quantity(&sku, 18).await.unwrap();

    assert!(ledger.reserve(&sku, 3).await.unwrap());
    assert_eq!(ledger.available(&sku).await.unwrap(), Some(15));

    assert!(!ledger.reserve(&sku, 100).await.unwrap());
    assert_eq!(ledger.available(&sku).await.unwrap(), Some(15));

    assert!(ledger.release(&sku, 3).await.unwrap());
    assert_eq!(ledger.available(&sku).await.unwrap(), Some(18));
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn unknown_sku_behaviour() {
    let ledger = get_test_ledger().await;
    let sku = Sku::new("MISSING");

    assert!(!ledger.reserve(&sku, 1).await.unwrap());
    assert!(!ledger.release(&sku, 1).await.unwrap());
    assert_eq!(ledger.available(&sku).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn concurrent_reserves_never_oversell() {
    let ledger = get_test_ledger().await;
    let sku = Sku::new("RUG-LIMITED");

    ledger.set_quantity(&sku, 10).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let ledger = ledger.clone();
        let sku = sku.clone();
        tasks.push(tokio::spawn(
            async move { ledger.reserve(&sku, 1).await.unwrap() },
        ));
    }

    let mut succeeded = 0;
    for task in tasks {
        if task.await.unwrap() {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 10);
    assert_eq!(ledger.available(&sku).await.unwrap(), Some(0));
}
