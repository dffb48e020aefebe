use thiserror::Error;

/// Errors that can occur while reading from the record store.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (creating the database directory).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The blocking task running a query panicked or was cancelled.
    #[error("query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Query was rejected by a guardrail.
    #[error("query rejected: {0}")]
    QueryRejected(String),

    /// Query execution timed out.
    #[error("query timed out after {timeout_ms}ms")]
    QueryTimeout { timeout_ms: u64 },

    /// A timestamp could not be rendered as text.
    #[error("timestamp formatting failed: {0}")]
    Format(#[from] time::error::Format),

    /// A stored row could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
