//! Order entity.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use super::{Address, LineItem, Money, OrderError, OrderStatus};

/// The authoritative order record.
///
/// Created with status [`OrderStatus::Reserved`] once every line item's
/// stock has been reserved. The total amount is computed once at creation
/// and never recomputed; line items keep the caller-supplied order, which
/// compensation logic relies on. Orders are never deleted; cancellation
/// and refund are status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    customer_email: String,
    items: Vec<LineItem>,
    shipping_address: Option<Address>,
    total_amount: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order in `Reserved` status.
    ///
    /// The total amount is the sum of the line subtotals.
    pub fn new(order_id: OrderId, customer_email: impl Into<String>, items: Vec<LineItem>) -> Self {
        let total_amount = items
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.subtotal());
        let now = Utc::now();

        Self {
            order_id,
            customer_email: customer_email.into(),
            items,
            shipping_address: None,
            total_amount,
            status: OrderStatus::Reserved,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the business order id.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Returns the customer's email.
    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    /// Returns the line items in caller-supplied order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the shipping address, if one has been set.
    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    /// Returns the order total.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns when the order was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the order was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if the given email owns this order.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.customer_email == email
    }

    /// Moves the order to `next`, failing on transitions outside the table.
    pub fn transition(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                order_id: self.order_id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Replaces the shipping address.
    pub fn set_shipping_address(&mut self, address: Address) {
        self.shipping_address = Some(address);
        self.touch();
    }

    /// Stamps the updated-at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new("SKU-A", "Widget", 2, Money::from_cents(5000)),
            LineItem::new("SKU-B", "Gadget", 1, Money::from_cents(2500)),
        ]
    }

    #[test]
    fn test_new_order_totals_and_status() {
        let order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());

        assert_eq!(order.status(), OrderStatus::Reserved);
        assert_eq!(order.total_amount().cents(), 12500);
        assert_eq!(order.items().len(), 2);
        assert!(order.is_owned_by("buyer@example.com"));
        assert!(!order.is_owned_by("other@example.com"));
    }

    #[test]
    fn test_items_keep_caller_order() {
        let order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());
        assert_eq!(order.items()[0].sku.as_str(), "SKU-A");
        assert_eq!(order.items()[1].sku.as_str(), "SKU-B");
    }

    #[test]
    fn test_legal_transition_updates_status() {
        let mut order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());
        order.transition(OrderStatus::Paid).unwrap();
        assert_eq!(order.status(), OrderStatus::Paid);

        order.transition(OrderStatus::Refunded).unwrap();
        assert_eq!(order.status(), OrderStatus::Refunded);
    }

    #[test]
    fn test_illegal_transition_fails() {
        let mut order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());
        order.transition(OrderStatus::Cancelled).unwrap();

        let err = order.transition(OrderStatus::Paid).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Paid,
                ..
            }
        ));
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_transition_does_not_recompute_total() {
        let mut order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());
        let total = order.total_amount();
        order.transition(OrderStatus::Paid).unwrap();
        assert_eq!(order.total_amount(), total);
    }

    #[test]
    fn test_set_shipping_address() {
        let mut order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());
        assert!(order.shipping_address().is_none());

        order.set_shipping_address(Address::new("1 Main St", "Springfield", "62704", "US"));
        assert_eq!(order.shipping_address().unwrap().city, "Springfield");
    }

    #[test]
    fn test_empty_order_has_zero_total() {
        let order = Order::new(OrderId::generate(), "buyer@example.com", vec![]);
        assert_eq!(order.total_amount(), Money::zero());
        assert_eq!(order.status(), OrderStatus::Reserved);
    }

    #[test]
    fn test_serialization_round_trip() {
        let order = Order::new(OrderId::generate(), "buyer@example.com", sample_items());
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back.order_id(), order.order_id());
        assert_eq!(back.total_amount(), order.total_amount());
        assert_eq!(back.status(), order.status());
    }
}
