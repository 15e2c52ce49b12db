//! Payment records and the immutable financial ledger.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::order::Money;

/// Storage identifier for a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random payment id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a payment is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Mobile,
    AlipayQr,
    WechatQr,
}

impl PaymentMethod {
    /// Returns true for instruments that settle synchronously at submit
    /// time. QR-based methods stay `Pending` until an update arrives.
    pub fn is_instant(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }

    /// Returns the method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Mobile => "MOBILE",
            PaymentMethod::AlipayQr => "ALIPAY_QR",
            PaymentMethod::WechatQr => "WECHAT_QR",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Created, awaiting settlement.
    #[default]
    Pending,

    /// Captured successfully.
    Success,

    /// Capture failed.
    Failed,

    /// A completed refund (records created with negated amounts).
    RefundSuccess,
}

impl PaymentStatus {
    /// Returns the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::RefundSuccess => "REFUND_SUCCESS",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment record.
///
/// One logical "current" record per order for capture; each refund is a
/// separate record with the negated amount, so lookup is latest-by-order
/// while history stays append-style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// Creates a new `Pending` record for an order.
    pub fn pending(order_id: OrderId, amount: Money, method: PaymentMethod) -> Self {
        Self {
            payment_id: PaymentId::new(),
            order_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Moves the record to a terminal status and stamps the completion time.
    pub fn complete(&mut self, status: PaymentStatus) {
        self.status = status;
        self.completed_at = Some(Utc::now());
    }

    /// Builds the refund record for this capture: a new record with the
    /// negated amount and `RefundSuccess` status.
    pub fn refund_of(&self) -> Self {
        let now = Utc::now();
        Self {
            payment_id: PaymentId::new(),
            order_id: self.order_id.clone(),
            amount: -self.amount,
            method: self.method,
            status: PaymentStatus::RefundSuccess,
            created_at: now,
            completed_at: Some(now),
        }
    }
}

/// An immutable financial ledger entry.
///
/// One row per monetary event (capture or refund); never updated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a ledger entry stamped with the current time.
    pub fn new(
        order_id: OrderId,
        amount: Money,
        method: PaymentMethod,
        status: PaymentStatus,
    ) -> Self {
        Self {
            order_id,
            amount,
            method,
            status,
            recorded_at: Utc::now(),
        }
    }
}
