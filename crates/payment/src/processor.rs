//! The payment processor service.

use common::OrderId;
use domain::{LedgerEntry, Money, OrderStatus, PaymentMethod, PaymentRecord, PaymentStatus};
use saga::{Notification, NotificationBus, OrderSaga, OrderStore};
use stock::StockLedger;
use timeline::TimelineStore;

use crate::error::PaymentError;
use crate::store::{LedgerStore, PaymentStore};

/// Captures and refunds payments and drives the order saga's status
/// transitions.
///
/// The payment record and ledger writes are primary-path and propagate
/// failures; the `payment.succeeded` bus publish is best-effort. No stock
/// movement happens here; restocking is tied to cancellation, not refund.
pub struct PaymentProcessor<L, O, T, B, P, G>
where
    L: StockLedger,
    O: OrderStore,
    T: TimelineStore,
    B: NotificationBus,
    P: PaymentStore,
    G: LedgerStore,
{
    saga: OrderSaga<L, O, T, B>,
    payments: P,
    ledger: G,
    bus: B,
}

impl<L, O, T, B, P, G> PaymentProcessor<L, O, T, B, P, G>
where
    L: StockLedger,
    O: OrderStore,
    T: TimelineStore,
    B: NotificationBus,
    P: PaymentStore,
    G: LedgerStore,
{
    /// Creates a new payment processor.
    pub fn new(saga: OrderSaga<L, O, T, B>, payments: P, ledger: G, bus: B) -> Self {
        Self {
            saga,
            payments,
            ledger,
            bus,
        }
    }

    /// Submits a payment for an order.
    ///
    /// A `Pending` record is always persisted first. Instant instruments
    /// (card) settle synchronously: the record moves to `Success`, the
    /// order is marked paid, a `payment.succeeded` notification goes out
    /// and an immutable ledger entry is appended. Other methods return the
    /// `Pending` record untouched; a later [`update_payment`] completes
    /// the flow.
    ///
    /// [`update_payment`]: PaymentProcessor::update_payment
    #[tracing::instrument(skip(self))]
    pub async fn submit_payment(
        &self,
        order_id: &OrderId,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<PaymentRecord, PaymentError> {
        metrics::counter!("payments_submitted_total").increment(1);

        let mut record = PaymentRecord::pending(order_id.clone(), amount, method);
        self.payments.save(&record).await?;

        if method.is_instant() {
            record.complete(PaymentStatus::Success);
            self.payments.save(&record).await?;
            self.complete_capture(&record).await?;
        }

        Ok(record)
    }

    /// Refunds a captured payment.
    ///
    /// Requires the order's latest payment record to be `Success`. Writes
    /// a new record with the negated amount, transitions the order to
    /// `Refunded` via the saga's direct-save escape hatch, and appends a
    /// negated ledger entry.
    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(
        &self,
        order_id: &OrderId,
        reason: &str,
    ) -> Result<PaymentRecord, PaymentError> {
        let current = self
            .payments
            .find_latest_by_order(order_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(order_id.clone()))?;

        if current.status != PaymentStatus::Success {
            return Err(PaymentError::InvalidState {
                order_id: order_id.clone(),
                actual: current.status,
                expected: PaymentStatus::Success,
            });
        }

        let refund = current.refund_of();
        self.payments.save(&refund).await?;

        let mut order = self.saga.get_order(order_id).await?;
        order.transition(OrderStatus::Refunded)?;
        self.saga.save_direct(order).await?;

        self.ledger
            .append(&LedgerEntry::new(
                order_id.clone(),
                refund.amount,
                refund.method,
                PaymentStatus::RefundSuccess,
            ))
            .await?;

        metrics::counter!("payments_refunded_total").increment(1);
        tracing::info!(%order_id, reason, amount = %refund.amount, "payment refunded");
        Ok(refund)
    }

    /// Partially updates the latest payment record for an order.
    ///
    /// A status change to `Success` runs the same completion side effects
    /// as a synchronous capture; a change to `Failed` only stamps the
    /// completion time.
    #[tracing::instrument(skip(self))]
    pub async fn update_payment(
        &self,
        order_id: &OrderId,
        new_status: Option<PaymentStatus>,
        new_method: Option<PaymentMethod>,
        new_amount: Option<Money>,
    ) -> Result<PaymentRecord, PaymentError> {
        let mut record = self
            .payments
            .find_latest_by_order(order_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(order_id.clone()))?;

        if let Some(method) = new_method {
            record.method = method;
        }
        if let Some(amount) = new_amount {
            record.amount = amount;
        }

        match new_status {
            Some(PaymentStatus::Success) if record.status != PaymentStatus::Success => {
                record.complete(PaymentStatus::Success);
                self.payments.save(&record).await?;
                self.complete_capture(&record).await?;
            }
            Some(PaymentStatus::Failed) => {
                record.complete(PaymentStatus::Failed);
                self.payments.save(&record).await?;
            }
            Some(status) => {
                record.status = status;
                self.payments.save(&record).await?;
            }
            None => {
                self.payments.save(&record).await?;
            }
        }

        Ok(record)
    }

    /// Returns the latest payment record for an order.
    pub async fn get_payment_status(
        &self,
        order_id: &OrderId,
    ) -> Result<PaymentRecord, PaymentError> {
        self.payments
            .find_latest_by_order(order_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(order_id.clone()))
    }

    /// Completion side effects shared by submit and update: mark the order
    /// paid, notify, append the ledger row.
    async fn complete_capture(&self, record: &PaymentRecord) -> Result<(), PaymentError> {
        self.saga.mark_paid(&record.order_id).await?;

        self.publish_payment_succeeded(&record.order_id, record.amount)
            .await;

        self.ledger
            .append(&LedgerEntry::new(
                record.order_id.clone(),
                record.amount,
                record.method,
                PaymentStatus::Success,
            ))
            .await?;

        metrics::counter!("payments_captured_total").increment(1);
        Ok(())
    }

    async fn publish_payment_succeeded(&self, order_id: &OrderId, amount: Money) {
        let notification = Notification::PaymentSucceeded {
            order_id: order_id.clone(),
            amount,
        };
        if let Err(e) = self.bus.publish(&notification).await {
            tracing::warn!(%order_id, error = %e, "payment notification publish failed; continuing");
        }
    }
}
