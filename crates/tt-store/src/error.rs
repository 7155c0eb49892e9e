//! Store error type.

/// Error from entry/credential store operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// I/O error reading or writing the backing store.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Entry to be saved does not exist in the store.
    #[error("entry {0} not found")]
    EntryNotFound(u64),

    /// Backend-specific failure.
    #[error("store error: {0}")]
    Backend(String),
}
