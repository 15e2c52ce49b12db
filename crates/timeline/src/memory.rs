use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, Sku};

use crate::{
    Result, TimelineError,
    record::{EventRecord, ReservationRecord},
    store::TimelineStore,
};

#[derive(Debug, Default)]
struct InMemoryTimelineState {
    events: Vec<EventRecord>,
    reservations: Vec<ReservationRecord>,
    fail_on_write: bool,
}

/// In-memory timeline store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimelineStore {
    state: Arc<RwLock<InMemoryTimelineState>>,
}

impl InMemoryTimelineStore {
    /// Creates a new empty in-memory timeline store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail all writes.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.state.write().unwrap().fail_on_write = fail;
    }

    /// Returns the total number of events stored.
    pub fn event_count(&self) -> usize {
        self.state.read().unwrap().events.len()
    }

    /// Returns the number of events of a given kind for an order.
    pub fn event_count_of_kind(&self, order_id: &OrderId, kind: crate::EventKind) -> usize {
        self.state
            .read()
            .unwrap()
            .events
            .iter()
            .filter(|e| &e.order_id == order_id && e.kind == kind)
            .count()
    }

    /// Returns the total number of reservation rows, expired ones included.
    pub fn reservation_count(&self) -> usize {
        self.state.read().unwrap().reservations.len()
    }

    fn check_available(state: &InMemoryTimelineState) -> Result<()> {
        if state.fail_on_write {
            return Err(TimelineError::Unavailable(
                "timeline store down".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TimelineStore for InMemoryTimelineStore {
    async fn append_event(&self, event: EventRecord) -> Result<()> {
        let mut state = self.state.write().unwrap();
        Self::check_available(&state)?;
        state.events.push(event);
        Ok(())
    }

    async fn events_for_order(&self, order_id: &OrderId, limit: usize) -> Result<Vec<EventRecord>> {
        let state = self.state.read().unwrap();
        let mut events: Vec<_> = state
            .events
            .iter()
            .filter(|e| &e.order_id == order_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.ts.cmp(&a.ts));
        events.truncate(limit);
        Ok(events)
    }

    async fn record_reservation(&self, reservation: ReservationRecord) -> Result<()> {
        let mut state = self.state.write().unwrap();
        Self::check_available(&state)?;
        state.reservations.push(reservation);
        Ok(())
    }

    async fn reservations_for_order(&self, order_id: &OrderId) -> Result<Vec<ReservationRecord>> {
        let now = Utc::now();
        let state = self.state.read().unwrap();
        let mut rows: Vec<_> = state
            .reservations
            .iter()
            .filter(|r| &r.order_id == order_id && !r.is_expired(now))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.reserved_at.cmp(&a.reserved_at));
        Ok(rows)
    }

    async fn reservations_for_sku(&self, sku: &Sku) -> Result<Vec<ReservationRecord>> {
        let now = Utc::now();
        let state = self.state.read().unwrap();
        let mut rows: Vec<_> = state
            .reservations
            .iter()
            .filter(|r| &r.sku == sku && !r.is_expired(now))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.reserved_at.cmp(&a.reserved_at));
        Ok(rows)
    }
}
