//! PostgreSQL integration tests for the timeline store.
//!
//! These tests need a local Docker daemon; they are ignored by default.
//! Run with:
//!
//! ```bash
//! cargo test -p timeline --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use chrono::Duration;
use common::{OrderId, Sku};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use timeline::{EventKind, EventRecord, PostgresTimelineStore, ReservationRecord, TimelineStore};
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

async fn get_test_store() -> PostgresTimelineStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    let store = PostgresTimelineStore::new(pool);
    store.ensure_schema().await.unwrap();

    sqlx::query("TRUNCATE TABLE order_events, inventory_reservations")
        .execute(store.pool())
        .await
        .unwrap();

    store
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn events_scan_newest_first_with_limit() {
    let store = get_test_store().await;
    let order_id = OrderId::new("ORD-itest");

    for (offset, kind) in [
        (0, EventKind::OrderCreated),
        (1, EventKind::InventoryReserved),
        (2, EventKind::PaymentSucceeded),
    ] {
        let mut event = EventRecord::new(order_id.clone(), kind, serde_json::json!({}));
        event.ts += Duration::seconds(offset);
        store.append_event(event).await.unwrap();
    }

    let events = store.events_for_order(&order_id, 2).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::PaymentSucceeded);
    assert_eq!(events[1].kind, EventKind::InventoryReserved);
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn reservations_expire_and_purge() {
    let store = get_test_store().await;
    let order_id = OrderId::new("ORD-res");
    let sku = Sku::new("RUG-12345");

    store
        .record_reservation(ReservationRecord::new(
            order_id.clone(),
            sku.clone(),
            2,
            Duration::minutes(15),
        ))
        .await
        .unwrap();
    store
        .record_reservation(ReservationRecord::new(
            order_id.clone(),
            sku.clone(),
            1,
            Duration::minutes(-1),
        ))
        .await
        .unwrap();

    let live = store.reservations_for_order(&order_id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].qty, 2);

    let by_sku = store.reservations_for_sku(&sku).await.unwrap();
    assert_eq!(by_sku.len(), 1);

    let purged = store.purge_expired().await.unwrap();
    assert_eq!(purged, 1);
}
