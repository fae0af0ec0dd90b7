use rolestate_index::IndexError;
use rolestate_store::StoreError;

use crate::operation::Operation;

/// Errors produced by contract operations.
///
/// Every error ends the operation that raised it; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// Missing, surplus or malformed caller arguments.
    #[error("{0}")]
    Validation(String),

    /// A value cannot be placed in a composite key.
    #[error("{0}")]
    Encoding(String),

    /// A stored composite key cannot be decoded.
    #[error("{0}")]
    Decoding(String),

    /// The state store failed; the message is the store's own.
    #[error("{0}")]
    Storage(String),

    /// The state store failed while iterating an index range.
    #[error("{0}")]
    IndexScan(String),

    /// The requested function is not in the dispatch table.
    #[error(
        "unknown action, must be one of {}; got {function:?}",
        Operation::expected_names()
    )]
    UnknownOperation { function: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience type alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

impl From<StoreError> for ContractError {
    fn from(e: StoreError) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<IndexError> for ContractError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::Encoding { .. } => Self::Encoding(e.to_string()),
            IndexError::Decoding { .. } => Self::Decoding(e.to_string()),
            IndexError::InvalidSimpleKey { .. } => Self::Validation(e.to_string()),
            IndexError::Scan(inner) => Self::IndexScan(inner.to_string()),
            IndexError::Store(inner) => Self::Storage(inner.to_string()),
        }
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_messages_pass_through_verbatim() {
        let err = ContractError::from(StoreError::Backend("disk quota exceeded".into()));
        assert_eq!(err, ContractError::Storage("disk quota exceeded".into()));
        assert_eq!(err.to_string(), "disk quota exceeded");
    }

    #[test]
    fn index_errors_map_to_taxonomy() {
        let scan = IndexError::Scan(StoreError::Backend("closed".into()));
        assert_eq!(ContractError::from(scan), ContractError::IndexScan("closed".into()));

        let key = IndexError::InvalidSimpleKey {
            key: String::new(),
            reason: "key must not be empty".into(),
        };
        assert!(matches!(ContractError::from(key), ContractError::Validation(_)));

        let decoding = IndexError::Decoding {
            reason: "empty namespace".into(),
        };
        assert!(matches!(ContractError::from(decoding), ContractError::Decoding(_)));
    }

    #[test]
    fn unknown_operation_names_function() {
        let err = ContractError::UnknownOperation {
            function: "DeleteUserRole".into(),
        };
        let message = err.to_string();
        assert!(message.contains("\"DeleteUserRole\""));
        assert!(message.contains("'GetUserByRoleName'"));
    }
}
