//! Content hashing for task build signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// Task signatures are `ContentHash`es over everything that influences the
/// command line of a task: its inputs, outputs, scanned dependencies and flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental builder for a [`ContentHash`] over a sequence of fields.
///
/// Each field is length-prefixed so `["ab", "c"]` and `["a", "bc"]` hash
/// differently.
#[derive(Default)]
pub struct SignatureHasher {
    buf: Vec<u8>,
}

impl SignatureHasher {
    /// Creates an empty hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one string field.
    pub fn field(&mut self, value: &str) -> &mut Self {
        self.buf
            .extend_from_slice(&(value.len() as u64).to_le_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Feeds a separator marking the end of a group of fields.
    pub fn end_group(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&u64::MAX.to_le_bytes());
        self
    }

    /// Returns the hash of everything fed so far.
    pub fn finish(&self) -> ContentHash {
        ContentHash::from_bytes(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"-O2 -Iinclude");
        let b = ContentHash::from_bytes(b"-O2 -Iinclude");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"-O2");
        let b = ContentHash::from_bytes(b"-O3");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hex() {
        let s = ContentHash::from_bytes(b"test").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hasher_fields_are_delimited() {
        let mut a = SignatureHasher::new();
        a.field("ab").field("c");
        let mut b = SignatureHasher::new();
        b.field("a").field("bc");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn hasher_groups_matter() {
        let mut a = SignatureHasher::new();
        a.field("x").end_group().field("y");
        let mut b = SignatureHasher::new();
        b.field("x").field("y");
        assert_ne!(a.finish(), b.finish());
    }
}
