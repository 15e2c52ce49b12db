use async_trait::async_trait;
use common::{OrderId, Sku};

use crate::{
    Result,
    record::{EventRecord, ReservationRecord},
};

/// Core trait for timeline store implementations.
///
/// An append-only wide-partition store: rows are inserted (reservations
/// with a time-to-live) and partitions are scanned by clustering timestamp
/// descending with a result-count limit. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Appends an event to an order's timeline.
    async fn append_event(&self, event: EventRecord) -> Result<()>;

    /// Returns up to `limit` events for an order, newest first.
    async fn events_for_order(&self, order_id: &OrderId, limit: usize) -> Result<Vec<EventRecord>>;

    /// Inserts an expiring reservation record.
    async fn record_reservation(&self, reservation: ReservationRecord) -> Result<()>;

    /// Returns the live (unexpired) reservation records for an order,
    /// newest first.
    async fn reservations_for_order(&self, order_id: &OrderId) -> Result<Vec<ReservationRecord>>;

    /// Returns the live (unexpired) reservation records for a sku,
    /// newest first.
    async fn reservations_for_sku(&self, sku: &Sku) -> Result<Vec<ReservationRecord>>;
}
