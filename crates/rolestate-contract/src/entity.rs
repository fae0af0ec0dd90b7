use serde::{Deserialize, Serialize};

use crate::error::ContractResult;

/// A user role, the record stored at its own `id`.
///
/// The canonical encoding is compact JSON with fields in declaration
/// order: `{"id":"u1","name":"admin"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Primary key. Immutable once created.
    pub id: String,
    /// Role name; indexed.
    pub name: String,
}

impl UserRole {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Serialize to the canonical stored form.
    pub fn to_bytes(&self) -> ContractResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a stored record.
    pub fn from_bytes(bytes: &[u8]) -> ContractResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
