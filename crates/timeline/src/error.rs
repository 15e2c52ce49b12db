use thiserror::Error;

/// Errors that can occur when interacting with the timeline store.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored event type could not be mapped back to a known kind.
    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),

    /// The backing store is unavailable (test doubles use this).
    #[error("Timeline store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;
