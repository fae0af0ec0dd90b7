//! Composite-key secondary index over a [`KeyValueStore`].

use rolestate_store::{KeyValueStore, KvPair, RangeIter};
use tracing::{debug, trace};

use crate::error::{IndexError, IndexResult};
use crate::key::{self, CompositeKey};

/// Value stored at every index key. Only its presence is meaningful;
/// it cannot be empty because the host treats empty values as deletes.
pub const SENTINEL: &[u8] = &[0x00];

/// One secondary index: a namespace of composite keys with sentinel values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecondaryIndex {
    namespace: String,
    sentinel: Vec<u8>,
}

impl SecondaryIndex {
    /// Create an index over `namespace` using the default [`SENTINEL`].
    pub fn new(namespace: impl Into<String>) -> IndexResult<Self> {
        let namespace = namespace.into();
        // Validates the namespace without any components.
        key::encode::<&str>(&namespace, &[])?;
        Ok(Self {
            namespace,
            sentinel: SENTINEL.to_vec(),
        })
    }

    /// Use a different (non-empty) sentinel value.
    pub fn with_sentinel(mut self, sentinel: impl Into<Vec<u8>>) -> IndexResult<Self> {
        let sentinel = sentinel.into();
        if sentinel.is_empty() {
            return Err(IndexError::Encoding {
                part: "sentinel",
                value: String::new(),
                reason: "sentinel value must not be empty".into(),
            });
        }
        self.sentinel = sentinel;
        Ok(self)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn sentinel(&self) -> &[u8] {
        &self.sentinel
    }

    /// Store key for an entry with the given attributes.
    pub fn entry_key<S: AsRef<str>>(&self, attributes: &[S]) -> IndexResult<Vec<u8>> {
        key::encode(&self.namespace, attributes)
    }

    /// The `(key, sentinel)` write for an entry, for use in a batch.
    pub fn entry_write<S: AsRef<str>>(&self, attributes: &[S]) -> IndexResult<KvPair> {
        Ok((self.entry_key(attributes)?, self.sentinel.clone()))
    }

    /// Record an entry. Inserting the same attributes twice is a no-op
    /// overwrite.
    pub fn insert<K, S>(&self, store: &K, attributes: &[S]) -> IndexResult<()>
    where
        K: KeyValueStore + ?Sized,
        S: AsRef<str>,
    {
        let (key, sentinel) = self.entry_write(attributes)?;
        store.put(&key, &sentinel)?;
        debug!(index = %self.namespace, attributes = attributes.len(), "index entry written");
        Ok(())
    }

    /// Record a `(name, id)` entry.
    pub fn insert_pair<K>(&self, store: &K, name: &str, id: &str) -> IndexResult<()>
    where
        K: KeyValueStore + ?Sized,
    {
        self.insert(store, &[name, id])
    }

    /// Scan every entry whose leading attributes equal `prefix`, in
    /// ascending key order.
    pub fn scan<'s, K, S>(&self, store: &'s K, prefix: &[S]) -> IndexResult<IndexScan<'s>>
    where
        K: KeyValueStore + ?Sized,
        S: AsRef<str>,
    {
        let start = key::encode(&self.namespace, prefix)?;
        let end = key::prefix_end(&start);
        let inner = store.range(&start, &end).map_err(IndexError::Scan)?;
        trace!(index = %self.namespace, depth = prefix.len(), "index scan opened");
        Ok(IndexScan {
            inner,
            namespace: self.namespace.clone(),
            done: false,
        })
    }

    /// Scan every `(name, id)` entry for `name`, ordered by id.
    pub fn scan_by_prefix<'s, K>(&self, store: &'s K, name: &str) -> IndexResult<IndexScan<'s>>
    where
        K: KeyValueStore + ?Sized,
    {
        self.scan(store, &[name])
    }
}

/// A decoded index entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub namespace: String,
    pub components: Vec<String>,
}

impl IndexEntry {
    /// The primary key the entry points at (its last component).
    pub fn primary_key(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// The entry as a `(name, id)` pair, if it has exactly two components.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match self.components.as_slice() {
            [name, id] => Some((name.as_str(), id.as_str())),
            _ => None,
        }
    }
}

impl From<CompositeKey> for IndexEntry {
    fn from(key: CompositeKey) -> Self {
        let (namespace, components) = key.into_parts();
        Self {
            namespace,
            components,
        }
    }
}

/// Lazy, forward-only iterator over index entries.
///
/// Stops after the first error. The underlying store scan is released
/// when this value is dropped.
pub struct IndexScan<'s> {
    inner: RangeIter<'s>,
    namespace: String,
    done: bool,
}

impl Iterator for IndexScan<'_> {
    type Item = IndexResult<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.inner.next()? {
            Ok((key, _)) => CompositeKey::from_bytes(&key).and_then(|decoded| {
                if decoded.namespace() == self.namespace {
                    Ok(IndexEntry::from(decoded))
                } else {
                    Err(IndexError::Decoding {
                        reason: format!(
                            "entry belongs to namespace {:?}, expected {:?}",
                            decoded.namespace(),
                            self.namespace
                        ),
                    })
                }
            }),
            Err(e) => Err(IndexError::Scan(e)),
        };
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

impl std::fmt::Debug for IndexScan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexScan")
            .field("namespace", &self.namespace)
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolestate_store::{InMemoryStore, StoreError, StoreResult};

    const NS: &str = "roleIdNameIndex";

    fn index() -> SecondaryIndex {
        SecondaryIndex::new(NS).unwrap()
    }

    fn ids(scan: IndexScan<'_>) -> Vec<String> {
        scan.map(|e| e.unwrap().primary_key().unwrap().to_string())
            .collect()
    }

    /// Store whose scans fail after yielding `good` items.
    struct FailingScanStore {
        inner: InMemoryStore,
        good: usize,
    }

    impl KeyValueStore for FailingScanStore {
        fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
            self.inner.put(key, value)
        }

        fn range<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<RangeIter<'a>> {
            let good = self.inner.range(start, end)?.take(self.good);
            let failure =
                std::iter::once(Err(StoreError::Backend("iterator closed by peer".into())));
            Ok(Box::new(good.chain(failure)))
        }
    }

    // -----------------------------------------------------------------------
    // Insert
    // -----------------------------------------------------------------------

    #[test]
    fn insert_writes_sentinel_at_composite_key() {
        let store = InMemoryStore::new();
        index().insert_pair(&store, "admin", "u1").unwrap();

        let key = key::encode(NS, &["admin", "u1"]).unwrap();
        assert_eq!(store.get(&key).unwrap().unwrap(), SENTINEL);
    }

    #[test]
    fn insert_is_idempotent() {
        let store = InMemoryStore::new();
        let idx = index();
        idx.insert_pair(&store, "admin", "u1").unwrap();
        idx.insert_pair(&store, "admin", "u1").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_rejects_reserved_characters() {
        let store = InMemoryStore::new();
        let err = index().insert_pair(&store, "ad\u{0}min", "u1").unwrap_err();
        assert!(matches!(err, IndexError::Encoding { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn new_rejects_empty_namespace() {
        assert!(SecondaryIndex::new("").is_err());
    }

    #[test]
    fn custom_sentinel() {
        let store = InMemoryStore::new();
        let idx = index().with_sentinel(b"x".to_vec()).unwrap();
        idx.insert_pair(&store, "admin", "u1").unwrap();
        let key = idx.entry_key(&["admin", "u1"]).unwrap();
        assert_eq!(store.get(&key).unwrap().unwrap(), b"x");
        assert!(index().with_sentinel(Vec::new()).is_err());
    }

    // -----------------------------------------------------------------------
    // Scan
    // -----------------------------------------------------------------------

    #[test]
    fn scan_orders_by_id() {
        let store = InMemoryStore::new();
        let idx = index();
        for id in ["b", "a", "c"] {
            idx.insert_pair(&store, "admin", id).unwrap();
        }
        assert_eq!(ids(idx.scan_by_prefix(&store, "admin").unwrap()), vec!["a", "b", "c"]);
    }

    #[test]
    fn scan_is_bounded_to_name() {
        let store = InMemoryStore::new();
        let idx = index();
        idx.insert_pair(&store, "admin", "u1").unwrap();
        idx.insert_pair(&store, "adminx", "u2").unwrap();
        idx.insert_pair(&store, "adm", "u3").unwrap();
        idx.insert_pair(&store, "viewer", "u4").unwrap();
        store.put(b"admin", b"primary record").unwrap();

        let entries: Vec<IndexEntry> = idx
            .scan_by_prefix(&store, "admin")
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pair(), Some(("admin", "u1")));
        assert_eq!(entries[0].namespace, NS);
    }

    #[test]
    fn scan_ignores_other_namespaces() {
        let store = InMemoryStore::new();
        index().insert_pair(&store, "admin", "u1").unwrap();
        SecondaryIndex::new("otherIndex")
            .unwrap()
            .insert_pair(&store, "admin", "u2")
            .unwrap();
        assert_eq!(ids(index().scan_by_prefix(&store, "admin").unwrap()), vec!["u1"]);
    }

    #[test]
    fn scan_of_unknown_name_is_empty() {
        let store = InMemoryStore::new();
        index().insert_pair(&store, "admin", "u1").unwrap();
        assert!(ids(index().scan_by_prefix(&store, "nobody").unwrap()).is_empty());
    }

    #[test]
    fn multi_attribute_prefix_scan() {
        let store = InMemoryStore::new();
        let idx = SecondaryIndex::new("orgRoleIndex").unwrap();
        idx.insert(&store, &["acme", "admin", "u1"]).unwrap();
        idx.insert(&store, &["acme", "viewer", "u2"]).unwrap();
        idx.insert(&store, &["globex", "admin", "u3"]).unwrap();

        assert_eq!(ids(idx.scan(&store, &["acme"]).unwrap()), vec!["u1", "u2"]);
        assert_eq!(ids(idx.scan(&store, &["acme", "admin"]).unwrap()), vec!["u1"]);
        assert_eq!(idx.scan::<_, &str>(&store, &[]).unwrap().count(), 3);
    }

    #[test]
    fn scan_releases_store_iterator() {
        let store = InMemoryStore::new();
        let idx = index();
        idx.insert_pair(&store, "admin", "u1").unwrap();
        idx.insert_pair(&store, "admin", "u2").unwrap();

        let mut scan = idx.scan_by_prefix(&store, "admin").unwrap();
        assert!(scan.next().is_some());
        assert_eq!(store.open_scans(), 1);
        drop(scan);
        assert_eq!(store.open_scans(), 0);
    }

    #[test]
    fn scan_failure_is_reported_once() {
        let inner = InMemoryStore::new();
        let idx = index();
        idx.insert_pair(&inner, "admin", "u1").unwrap();
        idx.insert_pair(&inner, "admin", "u2").unwrap();
        let store = FailingScanStore { inner, good: 1 };

        let results: Vec<_> = idx.scan_by_prefix(&store, "admin").unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(IndexError::Scan(_))));
    }

    #[test]
    fn entry_helpers() {
        let entry = IndexEntry {
            namespace: NS.into(),
            components: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(entry.primary_key(), Some("c"));
        assert_eq!(entry.pair(), None);
    }
}
