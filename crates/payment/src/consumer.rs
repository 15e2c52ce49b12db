//! Asynchronous `payment.succeeded` consumer.
//!
//! In a deployment where payment capture and order management run as
//! separate processes, the order side learns about settled payments from
//! the notification bus instead of a synchronous call. Delivery is
//! at-least-once, so this handler leans on the saga's idempotent
//! `mark_paid` and swallows every failure with a log line.

use saga::{Notification, NotificationBus, OrderSaga, OrderStore};
use stock::StockLedger;
use timeline::TimelineStore;

/// Handles `payment.succeeded` deliveries from the notification bus.
pub struct PaymentEventConsumer<L, O, T, B>
where
    L: StockLedger,
    O: OrderStore,
    T: TimelineStore,
    B: NotificationBus,
{
    saga: OrderSaga<L, O, T, B>,
}

impl<L, O, T, B> PaymentEventConsumer<L, O, T, B>
where
    L: StockLedger,
    O: OrderStore,
    T: TimelineStore,
    B: NotificationBus,
{
    /// Creates a consumer over the given saga.
    pub fn new(saga: OrderSaga<L, O, T, B>) -> Self {
        Self { saga }
    }

    /// Processes one delivered payload.
    ///
    /// Never returns an error: unparseable payloads, unexpected
    /// notification types and failed transitions are logged and dropped,
    /// leaving redelivery to the bus.
    pub async fn handle_payment_succeeded(&self, payload: &serde_json::Value) {
        match serde_json::from_value::<Notification>(payload.clone()) {
            Ok(Notification::PaymentSucceeded { order_id, .. }) => {
                match self.saga.mark_paid(&order_id).await {
                    Ok(_) => {
                        tracing::info!(%order_id, "order marked PAID via async consumer");
                    }
                    Err(e) => {
                        tracing::warn!(
                            %order_id,
                            error = %e,
                            "could not mark order paid from bus delivery"
                        );
                    }
                }
            }
            Ok(other) => {
                tracing::warn!(
                    topic = other.topic(),
                    "unexpected notification type on payment.succeeded"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "unparseable payment.succeeded payload");
            }
        }
    }
}
