use crate::error::{StoreError, StoreResult};

/// A single key/value pair yielded by a range scan.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Lazy, forward-only range scan. Dropping it releases the scan.
pub type RangeIter<'a> = Box<dyn Iterator<Item = StoreResult<KvPair>> + Send + 'a>;

/// Ordered, byte-keyed state store.
///
/// All implementations must satisfy these invariants:
/// - Keys are ordered lexicographically by their bytes.
/// - `get` distinguishes an absent key (`Ok(None)`) from a stored value.
/// - Empty values are rejected with [`StoreError::EmptyValue`].
/// - Range scans yield pairs in ascending key order.
/// - All I/O errors are propagated, never silently ignored.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, overwriting any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Scan keys in `[start, end)` in ascending order.
    ///
    /// An empty `start` begins at the first key; an empty `end` is unbounded.
    fn range<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<RangeIter<'a>>;

    /// Check whether a key exists in the store.
    fn exists(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Write several pairs in order.
    ///
    /// The default implementation calls `put()` for each pair and is NOT
    /// atomic: a failure part-way leaves the earlier writes in place.
    /// Backends that can apply the whole batch at once should override it.
    fn write_batch(&self, writes: &[KvPair]) -> StoreResult<()> {
        for (key, value) in writes {
            self.put(key, value)?;
        }
        Ok(())
    }
}

/// Reject inverted bounds. Shared by the backends.
pub(crate) fn check_bounds(start: &[u8], end: &[u8]) -> StoreResult<()> {
    if !end.is_empty() && start > end {
        return Err(StoreError::InvalidRange {
            start: start.to_vec(),
            end: end.to_vec(),
        });
    }
    Ok(())
}

/// Reject empty values. Shared by the backends.
pub(crate) fn check_value(key: &[u8], value: &[u8]) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::EmptyValue { key: key.to_vec() });
    }
    Ok(())
}
