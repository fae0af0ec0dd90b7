//! Ordered key-value state storage for rolestate.
//!
//! Everything the contract layer persists (primary records and secondary
//! index entries) lives in one flat, byte-keyed, ordered key space. This
//! crate defines that key space's interface and ships two backends.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileStore`] -- in-memory store persisted to a single snapshot file
//!
//! # Design Rules
//!
//! 1. Keys are arbitrary bytes, ordered lexicographically.
//! 2. `get` reports absence explicitly (`Ok(None)`), never as an empty value.
//! 3. Empty values are rejected on write; they mean "delete" to the host.
//! 4. Range scans are lazy and ascending; dropping the iterator releases it.
//! 5. The store never interprets values.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::{KeyValueStore, KvPair, RangeIter};
