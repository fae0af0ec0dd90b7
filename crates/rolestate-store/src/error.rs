/// Errors from state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Empty values are not storable (the host treats them as deletes).
    #[error("cannot store empty value for key {key:?}")]
    EmptyValue { key: Vec<u8> },

    /// The range bounds are inverted.
    #[error("invalid range: start {start:?} is after end {end:?}")]
    InvalidRange { start: Vec<u8>, end: Vec<u8> },

    /// Serialization or deserialization failure of a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Backend-specific failure reported verbatim.
    #[error("{0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
