use serde::{Deserialize, Serialize};

/// Namespace of the name index.
pub const ROLE_NAME_INDEX: &str = "roleIdNameIndex";

/// Contract configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Composite-key namespace for the `(name, id)` index.
    pub index_name: String,
    /// Value written at each index key. Must not be empty.
    pub sentinel: Vec<u8>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            index_name: ROLE_NAME_INDEX.to_string(),
            sentinel: vec![0x00],
        }
    }
}
