//! Composite trie keys.

use crate::{DarcId, Hash};
use sbor::prelude::*;
use thiserror::Error;

/// Failures reconstructing a [`Key`] from its raw wire encoding (spec §6,
/// `incorrect-key-length`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key is shorter than a darc id ({0} bytes)")]
    TooShort(usize),
}

/// A key addressing one leaf of the Merkle trie: a name scoped to the DARC
/// instance that governs it (spec §3, "Name prefixed by a per-instance
/// DarcID"). Two keys with the same name under different DARCs never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, BasicSbor)]
pub struct Key {
    darc_id: DarcId,
    name: Vec<u8>,
}

impl Key {
    /// Build a key from its governing DARC and a name chosen by the caller.
    pub fn new(darc_id: DarcId, name: impl Into<Vec<u8>>) -> Self {
        Self {
            darc_id,
            name: name.into(),
        }
    }

    /// The literal well-known genesis-marker key under a given DARC (spec
    /// §6, "Genesis-transaction key = literal bytes `\"genesis\"`").
    pub fn genesis_marker(darc_id: DarcId) -> Self {
        Self::new(darc_id, b"genesis".to_vec())
    }

    /// The governing DARC.
    pub fn darc_id(&self) -> DarcId {
        self.darc_id
    }

    /// The name within the DARC's namespace.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Opaque byte encoding used both as the trie-addressing preimage and as
    /// the bucketed-file row key: `darc_id || name`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32 + self.name.len());
        buf.extend_from_slice(self.darc_id.as_bytes());
        buf.extend_from_slice(&self.name);
        buf
    }

    /// The fixed-length hash addressing this key's leaf in the trie.
    pub fn trie_hash(&self) -> Hash {
        Hash::from_bytes(&self.to_bytes())
    }

    /// Reconstruct a key from its wire encoding (`darc_id || name`), the
    /// inverse of [`Self::to_bytes`]. Used at the service RPC boundary,
    /// where a key arrives as an opaque byte string rather than the typed
    /// pair (spec §6, `GetProof{..., Key}`).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() < Hash::BYTES {
            return Err(KeyError::TooShort(bytes.len()));
        }
        let mut darc_bytes = [0u8; Hash::BYTES];
        darc_bytes.copy_from_slice(&bytes[..Hash::BYTES]);
        Ok(Self {
            darc_id: DarcId::from_hash(Hash::from_digest_bytes(darc_bytes)),
            name: bytes[Hash::BYTES..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_darcs_never_collide() {
        let a = DarcId::from_hash(Hash::from_bytes(b"darc-a"));
        let b = DarcId::from_hash(Hash::from_bytes(b"darc-b"));
        let ka = Key::new(a, b"same-name".to_vec());
        let kb = Key::new(b, b"same-name".to_vec());
        assert_ne!(ka.trie_hash(), kb.trie_hash());
    }

    #[test]
    fn trie_hash_deterministic() {
        let d = DarcId::from_hash(Hash::from_bytes(b"darc"));
        let k1 = Key::new(d, b"name".to_vec());
        let k2 = Key::new(d, b"name".to_vec());
        assert_eq!(k1.trie_hash(), k2.trie_hash());
    }

    #[test]
    fn bytes_round_trip() {
        let d = DarcId::from_hash(Hash::from_bytes(b"darc"));
        let key = Key::new(d, b"greet".to_vec());
        let bytes = key.to_bytes();
        assert_eq!(Key::from_bytes(&bytes).unwrap(), key);
    }

    #[test]
    fn too_short_is_rejected() {
        assert_eq!(Key::from_bytes(&[1, 2, 3]), Err(KeyError::TooShort(3)));
    }
}
