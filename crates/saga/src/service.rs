//! The order saga service.

use std::time::Instant;

use common::OrderId;
use domain::{Address, LineItem, Order, OrderStatus};
use stock::StockLedger;
use timeline::{EventKind, EventRecord, ReservationRecord, TimelineStore};

use crate::config::SagaConfig;
use crate::error::SagaError;
use crate::notify::{Notification, NotificationBus};
use crate::store::OrderStore;

/// Orchestrates the order lifecycle against the stock ledger, the order
/// store, the event timeline and the notification bus.
///
/// Stock is reserved line by line in the order the caller supplied; on the
/// first failure every already-reserved line is released again in that
/// same order. The order row is the primary write and must succeed;
/// timeline events, reservation records and bus notifications are
/// independent best-effort side effects.
pub struct OrderSaga<L, O, T, B>
where
    L: StockLedger,
    O: OrderStore,
    T: TimelineStore,
    B: NotificationBus,
{
    stock: L,
    orders: O,
    timeline: T,
    bus: B,
    config: SagaConfig,
}

impl<L, O, T, B> OrderSaga<L, O, T, B>
where
    L: StockLedger,
    O: OrderStore,
    T: TimelineStore,
    B: NotificationBus,
{
    /// Creates a saga with the default configuration.
    pub fn new(stock: L, orders: O, timeline: T, bus: B) -> Self {
        Self::with_config(stock, orders, timeline, bus, SagaConfig::default())
    }

    /// Creates a saga with an explicit configuration.
    pub fn with_config(stock: L, orders: O, timeline: T, bus: B, config: SagaConfig) -> Self {
        Self {
            stock,
            orders,
            timeline,
            bus,
            config,
        }
    }

    /// Creates an order: reserves stock for every line item, persists the
    /// order in `Reserved` status and emits the side-channel writes.
    ///
    /// If any line cannot be reserved, previously reserved lines are
    /// released (best-effort, in original order) and the whole call fails
    /// with [`SagaError::InsufficientStock`]; no order is persisted.
    #[tracing::instrument(skip(self, items), fields(customer = customer_email))]
    pub async fn create_order(
        &self,
        customer_email: &str,
        items: Vec<LineItem>,
    ) -> Result<Order, SagaError> {
        metrics::counter!("orders_create_attempts_total").increment(1);
        let start = Instant::now();

        for (idx, line) in items.iter().enumerate() {
            let reserved = match self.stock.reserve(&line.sku, line.quantity).await {
                Ok(reserved) => reserved,
                Err(e) => {
                    self.rollback_reserved(&items[..idx]).await;
                    return Err(e.into());
                }
            };

            if !reserved {
                self.rollback_reserved(&items[..idx]).await;
                let available = self.stock.available(&line.sku).await.unwrap_or(None);
                metrics::counter!("orders_insufficient_stock_total").increment(1);
                tracing::warn!(
                    sku = %line.sku,
                    requested = line.quantity,
                    available,
                    "stock reservation failed"
                );
                return Err(SagaError::InsufficientStock {
                    sku: line.sku.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        let order = Order::new(OrderId::generate(), customer_email, items);
        self.orders.upsert(&order).await?;

        self.append_event(
            order.order_id(),
            EventKind::OrderCreated,
            serde_json::json!({"email": order.customer_email()}),
        )
        .await;

        for line in order.items() {
            self.append_event(
                order.order_id(),
                EventKind::InventoryReserved,
                serde_json::json!({"sku": line.sku.as_str(), "qty": line.quantity}),
            )
            .await;

            let reservation = ReservationRecord::new(
                order.order_id().clone(),
                line.sku.clone(),
                line.quantity,
                self.config.reservation_ttl,
            );
            if let Err(e) = self.timeline.record_reservation(reservation).await {
                tracing::warn!(
                    order_id = %order.order_id(),
                    sku = %line.sku,
                    error = %e,
                    "reservation record write failed; continuing"
                );
            }

            self.publish(Notification::InventoryReserved {
                order_id: order.order_id().clone(),
                sku: line.sku.clone(),
                quantity: line.quantity,
            })
            .await;
        }

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("order_create_duration_seconds").record(start.elapsed().as_secs_f64());
        tracing::info!(
            order_id = %order.order_id(),
            total = %order.total_amount(),
            "order created"
        );
        Ok(order)
    }

    /// Loads an order by business id.
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, SagaError> {
        self.orders
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| SagaError::OrderNotFound(order_id.clone()))
    }

    /// Cancels an order: restocks every line item and transitions to
    /// `Cancelled`.
    ///
    /// A no-op returning the order unchanged when the status is neither
    /// `Reserved` nor `Paid`, so repeated cancellation is harmless. A
    /// restock failure is a real stock-accounting bug but never fails the
    /// request; it is logged.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<Order, SagaError> {
        let mut order = self.get_order(order_id).await?;

        if !order.status().can_cancel() {
            tracing::info!(%order_id, status = %order.status(), "cancel is a no-op in this status");
            return Ok(order);
        }

        for line in order.items() {
            match self.stock.release(&line.sku, line.quantity).await {
                Ok(true) => {}
                Ok(false) => tracing::error!(
                    %order_id,
                    sku = %line.sku,
                    "restock hit unknown sku; stock accounting is now inconsistent"
                ),
                Err(e) => tracing::error!(
                    %order_id,
                    sku = %line.sku,
                    qty = line.quantity,
                    error = %e,
                    "restock failed; stock accounting is now inconsistent"
                ),
            }
        }

        self.append_event(order_id, EventKind::InventoryReleased, serde_json::json!({}))
            .await;

        for line in order.items() {
            self.publish(Notification::InventoryReleased {
                order_id: order_id.clone(),
                sku: line.sku.clone(),
                quantity: line.quantity,
            })
            .await;
        }

        order.transition(OrderStatus::Cancelled)?;
        self.orders.upsert(&order).await?;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(%order_id, "order cancelled");
        Ok(order)
    }

    /// Transitions an order to `Paid`.
    ///
    /// Idempotent: an already-`Paid` order is returned unchanged with no
    /// error and no repeated side effects, because the payment flow may
    /// invoke this twice: once synchronously and once via the
    /// at-least-once notification bus.
    #[tracing::instrument(skip(self))]
    pub async fn mark_paid(&self, order_id: &OrderId) -> Result<Order, SagaError> {
        let mut order = self.get_order(order_id).await?;

        if order.status() == OrderStatus::Paid {
            tracing::info!(%order_id, "order already PAID, skipping duplicate transition");
            return Ok(order);
        }

        if order.status() != OrderStatus::Reserved {
            return Err(SagaError::InvalidOrderState {
                order_id: order_id.clone(),
                actual: order.status(),
                expected: "RESERVED",
            });
        }

        order.transition(OrderStatus::Paid)?;
        self.append_event(order_id, EventKind::PaymentSucceeded, serde_json::json!({}))
            .await;
        self.orders.upsert(&order).await?;

        metrics::counter!("orders_paid_total").increment(1);
        tracing::info!(%order_id, "order marked paid");
        Ok(order)
    }

    /// Updates the shipping address on behalf of the order's owner.
    #[tracing::instrument(skip(self, address))]
    pub async fn update_shipping_address(
        &self,
        order_id: &OrderId,
        requester_email: &str,
        address: Address,
    ) -> Result<Order, SagaError> {
        let mut order = self.get_order(order_id).await?;

        if !order.is_owned_by(requester_email) {
            return Err(SagaError::Unauthorized {
                requester: requester_email.to_string(),
                resource: format!("order {}", order_id),
            });
        }

        if !order.status().can_update_address() {
            return Err(SagaError::InvalidOrderState {
                order_id: order_id.clone(),
                actual: order.status(),
                expected: "RESERVED or PAID",
            });
        }

        let payload = serde_json::json!({
            "line1": address.line1,
            "city": address.city,
            "country": address.country,
        });
        order.set_shipping_address(address);
        self.append_event(order_id, EventKind::ShippingAddressUpdated, payload)
            .await;
        self.orders.upsert(&order).await?;

        tracing::info!(%order_id, requester = requester_email, "shipping address updated");
        Ok(order)
    }

    /// Escape hatch for collaborating services (notably the payment
    /// processor) to persist a status change they computed themselves.
    /// Always stamps the updated-at timestamp.
    pub async fn save_direct(&self, mut order: Order) -> Result<Order, SagaError> {
        order.touch();
        self.orders.upsert(&order).await?;
        Ok(order)
    }

    /// Returns one page of a customer's orders, newest first. The page
    /// size is clamped to the configured limit.
    pub async fn order_history(
        &self,
        customer_email: &str,
        page: usize,
        size: usize,
    ) -> Result<Vec<Order>, SagaError> {
        let size = size.clamp(1, self.config.history_page_limit);
        self.orders
            .find_by_customer(customer_email, page, size)
            .await
    }

    /// Returns up to `limit` timeline events for an order, newest first.
    pub async fn order_events(
        &self,
        order_id: &OrderId,
        limit: usize,
    ) -> Result<Vec<EventRecord>, SagaError> {
        Ok(self.timeline.events_for_order(order_id, limit).await?)
    }

    /// Releases already-reserved lines after a failed reservation, walking
    /// the same lines in the same order. Release failures are logged and
    /// swallowed so they never mask the original failure.
    async fn rollback_reserved(&self, lines: &[LineItem]) {
        for line in lines {
            match self.stock.release(&line.sku, line.quantity).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(sku = %line.sku, "rollback release hit unknown sku")
                }
                Err(e) => tracing::warn!(
                    sku = %line.sku,
                    qty = line.quantity,
                    error = %e,
                    "rollback release failed"
                ),
            }
        }
    }

    async fn append_event(&self, order_id: &OrderId, kind: EventKind, payload: serde_json::Value) {
        let event = EventRecord::new(order_id.clone(), kind, payload);
        if let Err(e) = self.timeline.append_event(event).await {
            tracing::warn!(%order_id, kind = %kind, error = %e, "event append failed; continuing");
        }
    }

    async fn publish(&self, notification: Notification) {
        if let Err(e) = self.bus.publish(&notification).await {
            tracing::warn!(
                topic = notification.topic(),
                key = %notification.order_id(),
                error = %e,
                "notification publish failed; continuing"
            );
        }
    }
}
