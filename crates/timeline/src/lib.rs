//! Append-only order event timeline and reservation recorder.
//!
//! Both components share one wide-partition store contract: rows are
//! inserted (optionally expiring) and partitions are range-scanned by a
//! clustering timestamp, descending. Writes here are observational side
//! logs; callers treat failures as best-effort and never let them roll
//! back a primary transition.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use error::{Result, TimelineError};
pub use memory::InMemoryTimelineStore;
pub use postgres::PostgresTimelineStore;
pub use record::{EventKind, EventRecord, ReservationRecord};
pub use store::TimelineStore;
