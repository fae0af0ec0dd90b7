//! Composite-key codec.
//!
//! Layout of an encoded key:
//!
//! ```text
//! 0x00 namespace 0x00 component_1 0x00 ... component_n 0x00
//! ```
//!
//! The namespace and components are UTF-8 strings that must not contain
//! U+0000 (the delimiter) or U+10FFFF (reserved as an upper range bound).
//! Every part is terminated by the delimiter, so for a fixed namespace
//! byte order of encoded keys equals tuple order of the components, and an
//! encoding is a prefix of another only when its component list is a
//! prefix of the other's.
//!
//! Simple keys (primary records) never start with 0x00, which keeps the
//! two key spaces disjoint.

use crate::error::{IndexError, IndexResult};

/// First byte of every composite key.
pub const COMPOSITE_KEY_MARKER: u8 = 0x00;

/// Terminator written after the namespace and each component.
pub const DELIMITER: char = '\u{0}';

/// Reserved code point, rejected in namespaces and components.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Lowest simple key. An empty range start is replaced with this.
const MIN_SIMPLE_KEY: &[u8] = &[0x01];

/// A decoded composite key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    namespace: String,
    components: Vec<String>,
}

impl CompositeKey {
    /// Build a composite key, validating every part.
    pub fn new<S: AsRef<str>>(namespace: &str, components: &[S]) -> IndexResult<Self> {
        validate_namespace(namespace)?;
        for component in components {
            validate_part("component", component.as_ref())?;
        }
        Ok(Self {
            namespace: namespace.to_string(),
            components: components.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    /// The index namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The ordered attribute values.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Split into `(namespace, components)`.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.namespace, self.components)
    }

    /// Encode into store key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = 2
            + self.namespace.len()
            + self.components.iter().map(|c| c.len() + 1).sum::<usize>();
        let mut key = Vec::with_capacity(len);
        key.push(COMPOSITE_KEY_MARKER);
        key.extend_from_slice(self.namespace.as_bytes());
        key.push(COMPOSITE_KEY_MARKER);
        for component in &self.components {
            key.extend_from_slice(component.as_bytes());
            key.push(COMPOSITE_KEY_MARKER);
        }
        key
    }

    /// Decode store key bytes.
    pub fn from_bytes(key: &[u8]) -> IndexResult<Self> {
        let (namespace, components) = decode(key)?;
        Ok(Self {
            namespace,
            components,
        })
    }
}

/// Encode `(namespace, components)` into a composite key.
///
/// Encoding a leading subset of an entry's components gives the partial
/// key that prefixes every entry starting with those components.
///
/// # Examples
///
/// ```
/// use rolestate_index::key::{decode, encode};
///
/// let key = encode("roleIdNameIndex", &["admin", "u1"]).unwrap();
/// assert_eq!(key, b"\x00roleIdNameIndex\x00admin\x00u1\x00");
///
/// let (namespace, parts) = decode(&key).unwrap();
/// assert_eq!(namespace, "roleIdNameIndex");
/// assert_eq!(parts, vec!["admin", "u1"]);
/// ```
pub fn encode<S: AsRef<str>>(namespace: &str, components: &[S]) -> IndexResult<Vec<u8>> {
    Ok(CompositeKey::new(namespace, components)?.to_bytes())
}

/// Decode a composite key into `(namespace, components)`.
pub fn decode(key: &[u8]) -> IndexResult<(String, Vec<String>)> {
    if key.first() != Some(&COMPOSITE_KEY_MARKER) {
        return Err(IndexError::Decoding {
            reason: "missing leading 0x00 marker".into(),
        });
    }
    if key.len() < 3 {
        return Err(IndexError::Decoding {
            reason: format!("truncated key of {} bytes", key.len()),
        });
    }
    if key.last() != Some(&COMPOSITE_KEY_MARKER) {
        return Err(IndexError::Decoding {
            reason: "trailing segment is not terminated".into(),
        });
    }

    let body = std::str::from_utf8(&key[1..key.len() - 1]).map_err(|e| IndexError::Decoding {
        reason: format!("not valid UTF-8: {e}"),
    })?;
    let mut parts = body.split(DELIMITER);
    let namespace = match parts.next() {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => {
            return Err(IndexError::Decoding {
                reason: "empty namespace".into(),
            })
        }
    };
    Ok((namespace, parts.map(str::to_string).collect()))
}

/// Exclusive upper bound for a scan over every key starting with `prefix`.
///
/// `prefix` is an encoded (partial) composite key, so it ends with the
/// delimiter; the bound replaces that final byte with 0x01.
pub fn prefix_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    match end.last_mut() {
        Some(last) if *last == COMPOSITE_KEY_MARKER => *last = 0x01,
        _ => end.push(0x01),
    }
    end
}

/// Check that `key` is usable as a primary (simple) key.
pub fn validate_simple_key(key: &str) -> IndexResult<()> {
    if key.is_empty() {
        return Err(IndexError::InvalidSimpleKey {
            key: key.to_string(),
            reason: "key must not be empty".into(),
        });
    }
    if key.as_bytes()[0] == COMPOSITE_KEY_MARKER {
        return Err(IndexError::InvalidSimpleKey {
            key: key.to_string(),
            reason: "simple keys must not start with 0x00".into(),
        });
    }
    Ok(())
}

/// Byte bounds for a range scan over simple keys.
///
/// An empty `start` is replaced with 0x01 so the scan skips the composite
/// key space; an empty `end` stays unbounded.
pub fn simple_key_range(start: &str, end: &str) -> (Vec<u8>, Vec<u8>) {
    let start = if start.is_empty() {
        MIN_SIMPLE_KEY.to_vec()
    } else {
        start.as_bytes().to_vec()
    };
    (start, end.as_bytes().to_vec())
}

fn validate_namespace(namespace: &str) -> IndexResult<()> {
    if namespace.is_empty() {
        return Err(IndexError::Encoding {
            part: "namespace",
            value: String::new(),
            reason: "namespace must not be empty".into(),
        });
    }
    validate_part("namespace", namespace)
}

fn validate_part(part: &'static str, value: &str) -> IndexResult<()> {
    for ch in [DELIMITER, MAX_UNICODE_RUNE] {
        if value.contains(ch) {
            return Err(IndexError::Encoding {
                part,
                value: value.escape_debug().to_string(),
                reason: format!("contains reserved character U+{:04X}", ch as u32),
            });
        }
    }
    Ok(())
}
