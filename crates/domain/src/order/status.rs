//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Reserved ──► Paid ──► Refunded
///     │          │
///     └──────────┴──► Cancelled
/// ```
///
/// `Reserved` is the unique initial status. `Cancelled` and `Refunded` are
/// terminal; `Paid` only allows the cancel and refund edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Inventory is reserved, awaiting payment.
    #[default]
    Reserved,

    /// Payment has been captured.
    Paid,

    /// Order was cancelled; stock has been restocked.
    Cancelled,

    /// Payment was refunded (terminal state).
    Refunded,
}

impl OrderStatus {
    /// Returns true if the transition `self -> next` is legal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Reserved, Paid) | (Reserved, Cancelled) | (Paid, Cancelled) | (Paid, Refunded)
        )
    }

    /// Returns true if the order can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Reserved | OrderStatus::Paid)
    }

    /// Returns true if the shipping address can still be changed.
    pub fn can_update_address(&self) -> bool {
        matches!(self, OrderStatus::Reserved | OrderStatus::Paid)
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Returns the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Reserved => "RESERVED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_reserved() {
        assert_eq!(OrderStatus::default(), OrderStatus::Reserved);
    }

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;

        assert!(Reserved.can_transition_to(Paid));
        assert!(Reserved.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Refunded));

        assert!(!Reserved.can_transition_to(Refunded));
        assert!(!Cancelled.can_transition_to(Paid));
        assert!(!Cancelled.can_transition_to(Refunded));
        assert!(!Refunded.can_transition_to(Paid));
        assert!(!Refunded.can_transition_to(Cancelled));
        assert!(!Paid.can_transition_to(Reserved));
    }

    #[test]
    fn test_can_cancel() {
        assert!(OrderStatus::Reserved.can_cancel());
        assert!(OrderStatus::Paid.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
        assert!(!OrderStatus::Refunded.can_cancel());
    }

    #[test]
    fn test_can_update_address() {
        assert!(OrderStatus::Reserved.can_update_address());
        assert!(OrderStatus::Paid.can_update_address());
        assert!(!OrderStatus::Cancelled.can_update_address());
        assert!(!OrderStatus::Refunded.can_update_address());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Reserved.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Reserved).unwrap(),
            "\"RESERVED\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Refunded).unwrap(),
            "\"REFUNDED\""
        );
        let status: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderStatus::Reserved.to_string(), "RESERVED");
        assert_eq!(OrderStatus::Paid.to_string(), "PAID");
        assert_eq!(OrderStatus::Cancelled.to_string(), "CANCELLED");
        assert_eq!(OrderStatus::Refunded.to_string(), "REFUNDED");
    }
}
