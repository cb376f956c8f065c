//! Cryptographic hash type used throughout the ledger (BLAKE3).

use sbor::prelude::*;
use std::fmt;

/// A 32-byte BLAKE3 digest.
///
/// Used for Merkle labels, block/transaction identity, and DARC identity.
/// All hashing is deterministic, which `(replay-root)` and
/// `(salted-order-determinism)` depend on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
#[sbor(transparent)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Size of a hash in bytes.
    pub const BYTES: usize = 32;

    /// The zero hash, used for placeholder leaves and the genesis parent link.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Hash a single byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Hash the concatenation of several byte slices without an intermediate copy.
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Wrap raw 32 bytes that are already a digest (no hashing performed).
    pub fn from_digest_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        if s.len() != 64 {
            return Err(HashError::InvalidLength {
                expected: 64,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| HashError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Render as a 64-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Borrow the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// True for the zero/placeholder hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// XOR this hash with another, in place. Used by the block assembler's
    /// salted ordering (spec §4.4).
    pub fn xor_with(&mut self, other: &Hash) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a ^= b;
        }
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Hash({}..{})", &hex[..8], &hex[56..])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Errors parsing a hash from an external representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Hex string had the wrong length.
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex string contained non-hex characters.
    #[error("invalid hex string")]
    InvalidHex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(Hash::from_bytes(b"a"), Hash::from_bytes(b"a"));
        assert_ne!(Hash::from_bytes(b"a"), Hash::from_bytes(b"b"));
    }

    #[test]
    fn hex_roundtrip() {
        let h = Hash::from_bytes(b"omniledger");
        let parsed = Hash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn from_parts_matches_concatenation() {
        let a = Hash::from_parts(&[b"foo", b"bar"]);
        let b = Hash::from_bytes(b"foobar");
        assert_eq!(a, b);
    }

    #[test]
    fn xor_is_order_independent() {
        let mut acc1 = Hash::ZERO;
        let mut acc2 = Hash::ZERO;
        let h1 = Hash::from_bytes(b"1");
        let h2 = Hash::from_bytes(b"2");
        acc1.xor_with(&h1);
        acc1.xor_with(&h2);
        acc2.xor_with(&h2);
        acc2.xor_with(&h1);
        assert_eq!(acc1, acc2);
    }
}
