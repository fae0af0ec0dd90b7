//! Error types for composite keys and index operations.

use rolestate_store::StoreError;
use thiserror::Error;

/// Errors that can occur while encoding keys or maintaining an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A namespace or component cannot be represented in a composite key.
    #[error("cannot encode composite key {part} {value:?}: {reason}")]
    Encoding {
        part: &'static str,
        value: String,
        reason: String,
    },

    /// A byte string is not a well-formed composite key.
    #[error("malformed composite key: {reason}")]
    Decoding { reason: String },

    /// A primary key collides with the composite-key space or is empty.
    #[error("invalid key {key:?}: {reason}")]
    InvalidSimpleKey { key: String, reason: String },

    /// The store failed while iterating an index range.
    #[error("index scan failed: {0}")]
    Scan(StoreError),

    /// The store failed on a point operation.
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;
