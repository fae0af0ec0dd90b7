//! CRUD layer for user roles.
//!
//! [`UserRoleStore`] borrows a state store for the length of one operation
//! and keeps the primary records and the name index in step.

use rolestate_index::{simple_key_range, validate_simple_key, SecondaryIndex};
use rolestate_store::KeyValueStore;
use tracing::{debug, info, warn};

use crate::assembler::assemble;
use crate::entity::UserRole;
use crate::error::{ContractError, ContractResult};

/// User-role operations against one store session.
pub struct UserRoleStore<'a, K: KeyValueStore + ?Sized> {
    store: &'a K,
    index: &'a SecondaryIndex,
}

impl<'a, K: KeyValueStore + ?Sized> UserRoleStore<'a, K> {
    pub fn new(store: &'a K, index: &'a SecondaryIndex) -> Self {
        Self { store, index }
    }

    /// Store a role at `id` and index it under `(name, id)`.
    ///
    /// Both writes go to the store as one ordered batch, primary record
    /// first. Whether the pair lands atomically is up to the store's
    /// [`KeyValueStore::write_batch`]; with the default per-key batch a
    /// failure on the index write leaves the primary record unindexed.
    pub fn create(&self, id: &str, name: &str) -> ContractResult<()> {
        require("id", id)?;
        require("name", name)?;
        validate_simple_key(id)?;

        let role = UserRole::new(id, name);
        let record = role.to_bytes()?;
        // Encode the index key before writing anything.
        let index_write = self.index.entry_write(&[name, id])?;
        info!(id, name, "creating user role");

        let writes = [(id.as_bytes().to_vec(), record), index_write];
        if let Err(e) = self.store.write_batch(&writes) {
            warn!(
                id,
                error = %e,
                "user role write failed; the primary record may exist without its index entry"
            );
            return Err(e.into());
        }
        Ok(())
    }

    /// Raw stored bytes for `id`; empty if no role is stored there.
    pub fn get_by_id(&self, id: &str) -> ContractResult<Vec<u8>> {
        match self.find_raw(id)? {
            Some(bytes) => {
                let record = String::from_utf8_lossy(&bytes);
                debug!(response = %format!("{{\"User Role\":\"{record}\"}}"), "query response");
                Ok(bytes)
            }
            None => {
                debug!(id, "no user role stored; returning empty value");
                Ok(Vec::new())
            }
        }
    }

    /// Raw stored bytes for `id`, with absence made explicit.
    ///
    /// An id that `create` would reject (empty, or inside the composite key
    /// space) can never be stored, so it reads as absent without touching
    /// the store.
    pub fn find_raw(&self, id: &str) -> ContractResult<Option<Vec<u8>>> {
        if let Err(e) = validate_simple_key(id) {
            debug!(id, reason = %e, "id cannot name a user role; treating as absent");
            return Ok(None);
        }
        Ok(self.store.get(id.as_bytes())?)
    }

    /// The decoded role at `id`, if any.
    pub fn find(&self, id: &str) -> ContractResult<Option<UserRole>> {
        self.find_raw(id)?
            .map(|bytes| UserRole::from_bytes(&bytes))
            .transpose()
    }

    /// JSON array of the roles named `name`, ordered by id.
    ///
    /// Each index entry is resolved through [`Self::find_raw`]. Entries
    /// whose primary record is missing are skipped with a warning instead of
    /// contributing an empty element, which deliberately departs from a
    /// plain per-entry `get_by_id` so the result stays a valid JSON array.
    /// Any failure aborts the whole result.
    pub fn get_by_indexed_name(&self, name: &str) -> ContractResult<Vec<u8>> {
        let scan = self.index.scan_by_prefix(self.store, name)?;
        let records = scan.filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ContractError::from(e))),
            };
            let Some((found_name, id)) = entry.pair() else {
                return Some(Err(ContractError::Decoding(format!(
                    "index entry has {} components, expected (name, id)",
                    entry.components.len()
                ))));
            };
            debug!(index = %entry.namespace, name = found_name, id, "found index entry");
            match self.find_raw(id) {
                Ok(Some(bytes)) => Some(Ok(bytes)),
                Ok(None) => {
                    warn!(id, "index entry points at a missing user role");
                    None
                }
                Err(e) => Some(Err(e)),
            }
        });
        assemble(records)
    }

    /// JSON array of every stored role, in key order.
    pub fn get_all(&self) -> ContractResult<Vec<u8>> {
        let (start, end) = simple_key_range("", "");
        let scan = self.store.range(&start, &end)?;
        assemble(scan.map(|pair| pair.map(|(_, value)| value).map_err(ContractError::from)))
    }
}

fn require(parameter: &str, value: &str) -> ContractResult<()> {
    if value.is_empty() {
        return Err(ContractError::Validation(format!(
            "missing required argument: {parameter}"
        )));
    }
    Ok(())
}
