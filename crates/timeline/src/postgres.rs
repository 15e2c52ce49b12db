use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, Sku};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Result, TimelineError,
    record::{EventKind, EventRecord, ReservationRecord},
    store::TimelineStore,
};

/// PostgreSQL-backed timeline store.
///
/// Row time-to-live is emulated with an `expires_at` column: reads filter
/// expired rows and `purge_expired` reclaims them.
#[derive(Clone)]
pub struct PostgresTimelineStore {
    pool: PgPool,
}

impl PostgresTimelineStore {
    /// Creates a new PostgreSQL timeline store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the timeline tables if they do not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS order_events (
                id BIGSERIAL PRIMARY KEY,
                order_id TEXT NOT NULL,
                ts TIMESTAMPTZ NOT NULL,
                event_type TEXT NOT NULL,
                payload JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS order_events_by_order
            ON order_events (order_id, ts DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_reservations (
                id BIGSERIAL PRIMARY KEY,
                order_id TEXT NOT NULL,
                sku TEXT NOT NULL,
                qty BIGINT NOT NULL,
                reserved_at TIMESTAMPTZ NOT NULL,
                expires_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS reservations_by_order
            ON inventory_reservations (order_id, reserved_at DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS reservations_by_sku
            ON inventory_reservations (sku, reserved_at DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes reservation rows whose time-to-live has elapsed.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM inventory_reservations WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn row_to_event(row: PgRow) -> Result<EventRecord> {
        let event_type: String = row.try_get("event_type")?;
        let kind =
            EventKind::parse(&event_type).ok_or(TimelineError::UnknownEventKind(event_type))?;

        Ok(EventRecord {
            order_id: OrderId::new(row.try_get::<String, _>("order_id")?),
            ts: row.try_get::<DateTime<Utc>, _>("ts")?,
            kind,
            payload: row.try_get("payload")?,
        })
    }

    fn row_to_reservation(row: PgRow) -> Result<ReservationRecord> {
        Ok(ReservationRecord {
            order_id: OrderId::new(row.try_get::<String, _>("order_id")?),
            sku: Sku::new(row.try_get::<String, _>("sku")?),
            qty: row.try_get::<i64, _>("qty")? as u32,
            reserved_at: row.try_get("reserved_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

#[async_trait]
impl TimelineStore for PostgresTimelineStore {
    async fn append_event(&self, event: EventRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO order_events (order_id, ts, event_type, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.order_id.as_str())
        .bind(event.ts)
        .bind(event.kind.as_str())
        .bind(&event.payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn events_for_order(&self, order_id: &OrderId, limit: usize) -> Result<Vec<EventRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, ts, event_type, payload
            FROM order_events
            WHERE order_id = $1
            ORDER BY ts DESC
            LIMIT $2
            "#,
        )
        .bind(order_id.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn record_reservation(&self, reservation: ReservationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory_reservations (order_id, sku, qty, reserved_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(reservation.order_id.as_str())
        .bind(reservation.sku.as_str())
        .bind(reservation.qty as i64)
        .bind(reservation.reserved_at)
        .bind(reservation.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reservations_for_order(&self, order_id: &OrderId) -> Result<Vec<ReservationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, sku, qty, reserved_at, expires_at
            FROM inventory_reservations
            WHERE order_id = $1 AND expires_at > now()
            ORDER BY reserved_at DESC
            "#,
        )
        .bind(order_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_reservation).collect()
    }

    async fn reservations_for_sku(&self, sku: &Sku) -> Result<Vec<ReservationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, sku, qty, reserved_at, expires_at
            FROM inventory_reservations
            WHERE sku = $1 AND expires_at > now()
            ORDER BY reserved_at DESC
            "#,
        )
        .bind(sku.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_reservation).collect()
    }
}
