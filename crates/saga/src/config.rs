//! Saga configuration loaded from environment variables.

use chrono::Duration;

/// Saga tuning knobs with sensible defaults.
///
/// Reads from environment variables:
/// - `RESERVATION_TTL_MINUTES`: lifetime of reservation audit records
///   (default: `15`)
/// - `ORDER_HISTORY_PAGE_LIMIT`: upper bound on history page size
///   (default: `100`)
#[derive(Debug, Clone)]
pub struct SagaConfig {
    pub reservation_ttl: Duration,
    pub history_page_limit: usize,
}

impl SagaConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let ttl_minutes = std::env::var("RESERVATION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        let history_page_limit = std::env::var("ORDER_HISTORY_PAGE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        Self {
            reservation_ttl: Duration::minutes(ttl_minutes),
            history_page_limit,
        }
    }
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            reservation_ttl: Duration::minutes(15),
            history_page_limit: 100,
        }
    }
}
