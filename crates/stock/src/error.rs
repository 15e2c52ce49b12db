use thiserror::Error;

/// Errors that can occur when interacting with the stock ledger.
#[derive(Debug, Error)]
pub enum StockError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store is unavailable (test doubles use this).
    #[error("Stock store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for stock ledger operations.
pub type Result<T> = std::result::Result<T, StockError>;
