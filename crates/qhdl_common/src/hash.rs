//! Content hashing for source files and flattened-graph fingerprints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed with XXH3.
///
/// Source files carry one so unchanged inputs can be recognised, and the
/// flattened circuit graph exposes one as its connectivity fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Combines a collection of hashes without regard to their order.
    ///
    /// The parts are sorted before being folded, so any permutation of the
    /// same multiset yields the same result.
    pub fn combine_unordered(parts: impl IntoIterator<Item = ContentHash>) -> Self {
        let mut parts: Vec<ContentHash> = parts.into_iter().collect();
        parts.sort_unstable();
        let mut bytes = Vec::with_capacity(parts.len() * 16);
        for part in &parts {
            bytes.extend_from_slice(&part.0);
        }
        Self::from_bytes(&bytes)
    }

    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"entity Beamsplitter");
        let b = ContentHash::from_bytes(b"entity Beamsplitter");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"B1.Out1");
        let b = ContentHash::from_bytes(b"B2.Out1");
        assert_ne!(a, b);
    }

    #[test]
    fn unordered_combination_ignores_order() {
        let x = ContentHash::from_bytes(b"x");
        let y = ContentHash::from_bytes(b"y");
        let z = ContentHash::from_bytes(b"z");
        assert_eq!(
            ContentHash::combine_unordered([x, y, z]),
            ContentHash::combine_unordered([z, x, y])
        );
        assert_ne!(
            ContentHash::combine_unordered([x, y]),
            ContentHash::combine_unordered([x, z])
        );
    }

    #[test]
    fn display_format() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"fingerprint");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
