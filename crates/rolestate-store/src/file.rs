//! File-backed state store.
//!
//! On-disk format: a single bincode-serialized `BTreeMap<Vec<u8>, Vec<u8>>`.
//! Every write produces a complete new snapshot in a temporary file next to
//! the target and renames it into place, so a reader never sees a torn file.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryStore;
use crate::traits::{check_value, KeyValueStore, KvPair, RangeIter};

/// An [`InMemoryStore`] persisted to a snapshot file after every write.
pub struct FileStore {
    path: PathBuf,
    inner: InMemoryStore,
    /// Serializes writers so snapshots are persisted in commit order.
    commit: Mutex<()>,
}

impl FileStore {
    /// Open the snapshot at `path`, or start empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let bytes = fs::read(&path)?;
            bincode::deserialize::<BTreeMap<Vec<u8>, Vec<u8>>>(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "opened file store");
        Ok(Self {
            path,
            inner: InMemoryStore::from_entries(entries),
            commit: Mutex::new(()),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Apply `writes` to a copy of the current state, persist it, then
    /// publish it in memory. A failed persist leaves both sides untouched.
    fn commit(&self, writes: &[KvPair]) -> StoreResult<()> {
        for (key, value) in writes {
            check_value(key, value)?;
        }
        let _guard = self
            .commit
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let mut next = self.inner.snapshot()?;
        for (key, value) in writes {
            next.insert(key.clone(), value.clone());
        }
        self.persist(&next)?;
        self.inner.replace(next)
    }

    fn persist(&self, entries: &BTreeMap<Vec<u8>, Vec<u8>>) -> StoreResult<()> {
        let bytes =
            bincode::serialize(entries).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot persisted");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.commit(&[(key.to_vec(), value.to_vec())])
    }

    fn range<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<RangeIter<'a>> {
        self.inner.range(start, end)
    }

    fn exists(&self, key: &[u8]) -> StoreResult<bool> {
        self.inner.exists(key)
    }

    /// Persists the whole batch as one snapshot.
    fn write_batch(&self, writes: &[KvPair]) -> StoreResult<()> {
        self.commit(writes)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("entry_count", &self.len())
            .finish()
    }
}
