use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rolestate_contract::ContractConfig;
use serde::{Deserialize, Serialize};

/// Default snapshot file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "rolestate.db";

/// CLI configuration, usually read from a TOML file.
///
/// ```toml
/// store_path = "/var/lib/rolestate/state.db"
///
/// [contract]
/// index_name = "roleIdNameIndex"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub store_path: PathBuf,
    pub contract: ContractConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            contract: ContractConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&source).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, then apply the `--store` override.
    pub fn resolve(path: Option<&Path>, store: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(store) = store {
            config.store_path = store.to_path_buf();
        }
        Ok(config)
    }
}
