use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_bounds, check_value, KeyValueStore, KvPair, RangeIter};

/// Number of pairs copied out of the map per lock acquisition during a scan.
pub const DEFAULT_SCAN_BATCH: usize = 64;

/// In-memory, `BTreeMap`-based state store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock`.
/// Range scans page through the map in batches and re-take the read lock
/// for every batch, so no lock is held while the caller consumes a scan.
/// A scan therefore observes concurrent writes made between batches.
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    open_scans: AtomicUsize,
    scan_batch: usize,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::from_entries(BTreeMap::new())
    }

    /// Create a store pre-populated with `entries`.
    pub fn from_entries(entries: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        Self {
            entries: RwLock::new(entries),
            open_scans: AtomicUsize::new(0),
            scan_batch: DEFAULT_SCAN_BATCH,
        }
    }

    /// Override the scan page size. Values below 1 are clamped to 1.
    pub fn with_scan_batch(mut self, scan_batch: usize) -> Self {
        self.scan_batch = scan_batch.max(1);
        self
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.read_entries().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of range scans that have been opened and not yet dropped.
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(Ordering::SeqCst)
    }

    /// Remove all entries from the store.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_entries()?.clear();
        Ok(())
    }

    /// Copy of every entry, in key order.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<Vec<u8>, Vec<u8>>> {
        Ok(self.read_entries()?.clone())
    }

    /// Replace the whole content of the store.
    pub(crate) fn replace(&self, entries: BTreeMap<Vec<u8>, Vec<u8>>) -> StoreResult<()> {
        *self.write_entries()? = entries;
        Ok(())
    }

    fn read_entries(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_entries(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        check_value(key, value)?;
        self.write_entries()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn range<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<RangeIter<'a>> {
        check_bounds(start, end)?;
        Ok(Box::new(MemoryScan::open(self, start, end)))
    }

    fn exists(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.read_entries()?.contains_key(key))
    }

    /// Applies the whole batch under a single write lock.
    fn write_batch(&self, writes: &[KvPair]) -> StoreResult<()> {
        for (key, value) in writes {
            check_value(key, value)?;
        }
        let mut map = self.write_entries()?;
        for (key, value) in writes {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entry_count", &self.len())
            .field("open_scans", &self.open_scans())
            .finish()
    }
}

/// Paging cursor over an [`InMemoryStore`].
struct MemoryScan<'a> {
    store: &'a InMemoryStore,
    next_start: Bound<Vec<u8>>,
    end: Bound<Vec<u8>>,
    buffer: VecDeque<KvPair>,
    exhausted: bool,
}

impl<'a> MemoryScan<'a> {
    fn open(store: &'a InMemoryStore, start: &[u8], end: &[u8]) -> Self {
        store.open_scans.fetch_add(1, Ordering::SeqCst);
        trace!(start = ?start, end = ?end, "range scan opened");
        let end = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_vec())
        };
        Self {
            store,
            next_start: Bound::Included(start.to_vec()),
            end,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn refill(&mut self) -> StoreResult<()> {
        let map = self.store.read_entries()?;
        let batch: Vec<KvPair> = map
            .range::<Vec<u8>, _>((self.next_start.clone(), self.end.clone()))
            .take(self.store.scan_batch)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        drop(map);

        if batch.len() < self.store.scan_batch {
            self.exhausted = true;
        }
        if let Some((last, _)) = batch.last() {
            self.next_start = Bound::Excluded(last.clone());
        }
        self.buffer.extend(batch);
        Ok(())
    }
}

impl Iterator for MemoryScan<'_> {
    type Item = StoreResult<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.refill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

impl Drop for MemoryScan<'_> {
    fn drop(&mut self) {
        self.store.open_scans.fetch_sub(1, Ordering::SeqCst);
        trace!("range scan released");
    }
}
