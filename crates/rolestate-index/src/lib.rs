//! Secondary indexes for the rolestate key space.
//!
//! A secondary index is a set of store entries whose keys are composite
//! keys `(namespace, attr_1, ..., attr_n)` and whose values are a fixed
//! sentinel. The existence of an entry is the fact it records. Scanning the
//! key range that shares a partial composite key recovers every entry with
//! the given leading attributes, in attribute order.
//!
//! # Modules
//!
//! - [`key`] — Composite-key codec and simple-key rules
//! - [`index`] — [`SecondaryIndex`] insertion and prefix scans
//! - [`error`] — Error types for index operations

pub mod error;
pub mod index;
pub mod key;

pub use error::{IndexError, IndexResult};
pub use index::{IndexEntry, IndexScan, SecondaryIndex, SENTINEL};
pub use key::{
    decode, encode, prefix_end, simple_key_range, validate_simple_key, CompositeKey,
    COMPOSITE_KEY_MARKER, DELIMITER, MAX_UNICODE_RUNE,
};
