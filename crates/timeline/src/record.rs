use chrono::{DateTime, Duration, Utc};
use common::{OrderId, Sku};
use serde::{Deserialize, Serialize};

/// The kinds of domain events recorded on an order's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    OrderCreated,
    InventoryReserved,
    InventoryReleased,
    PaymentSucceeded,
    ShippingAddressUpdated,
}

impl EventKind {
    /// Returns the event type name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OrderCreated => "OrderCreated",
            EventKind::InventoryReserved => "InventoryReserved",
            EventKind::InventoryReleased => "InventoryReleased",
            EventKind::PaymentSucceeded => "PaymentSucceeded",
            EventKind::ShippingAddressUpdated => "ShippingAddressUpdated",
        }
    }

    /// Maps a stored event type name back to a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OrderCreated" => Some(EventKind::OrderCreated),
            "InventoryReserved" => Some(EventKind::InventoryReserved),
            "InventoryReleased" => Some(EventKind::InventoryReleased),
            "PaymentSucceeded" => Some(EventKind::PaymentSucceeded),
            "ShippingAddressUpdated" => Some(EventKind::ShippingAddressUpdated),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single row on an order's event timeline.
///
/// Rows are append-only and ordered by timestamp descending within an
/// order partition; they are never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// The order this event belongs to (partition key).
    pub order_id: OrderId,

    /// When the event occurred (clustering key, descending).
    pub ts: DateTime<Utc>,

    /// The event kind.
    pub kind: EventKind,

    /// Event payload as JSON.
    pub payload: serde_json::Value,
}

impl EventRecord {
    /// Creates an event record stamped with the current time.
    pub fn new(order_id: OrderId, kind: EventKind, payload: serde_json::Value) -> Self {
        Self {
            order_id,
            ts: Utc::now(),
            kind,
            payload,
        }
    }
}

/// A short-lived reservation fact, written once at order creation.
///
/// This is a side log for audit and debugging: it expires automatically,
/// and its absence must never be read as absence of the underlying stock
/// deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub order_id: OrderId,
    pub sku: Sku,
    pub qty: u32,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ReservationRecord {
    /// Creates a reservation record expiring `ttl` from now.
    pub fn new(order_id: OrderId, sku: Sku, qty: u32, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            order_id,
            sku,
            qty,
            reserved_at: now,
            expires_at: now + ttl,
        }
    }

    /// Returns true if the record has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_round_trips_through_str() {
        for kind in [
            EventKind::OrderCreated,
            EventKind::InventoryReserved,
            EventKind::InventoryReleased,
            EventKind::PaymentSucceeded,
            EventKind::ShippingAddressUpdated,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("OrderShipped"), None);
    }

    #[test]
    fn reservation_expiry() {
        let record = ReservationRecord::new(
            OrderId::new("ORD-1"),
            Sku::new("RUG-12345"),
            2,
            Duration::minutes(15),
        );

        assert!(!record.is_expired(Utc::now()));
        assert!(record.is_expired(Utc::now() + Duration::minutes(16)));
    }

    #[test]
    fn event_record_serialization() {
        let record = EventRecord::new(
            OrderId::new("ORD-1"),
            EventKind::InventoryReserved,
            serde_json::json!({"sku": "RUG-12345", "qty": 2}),
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, EventKind::InventoryReserved);
        assert_eq!(back.payload["qty"], 2);
    }
}
