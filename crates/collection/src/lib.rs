//! A deterministic Merkle binary trie over `H(key) -> (value, kind)`.
//!
//! Every mutation is persistent: it returns a new [`Collection`] that shares
//! every subtree untouched by the change with its predecessor, so `clone`
//! (the derived [`Clone`] impl, a pointer copy) is O(1) regardless of trie
//! size (spec §9, "Cloneable Collection").

mod error;
mod node;
mod proof;

pub use error::{CollectionError, ProofError};
pub use proof::{Dump, Proof, Step};

use node::Node;
use omniledger_types::Hash;
use std::sync::Arc;

/// An immutable snapshot of the key/value/kind state for one chain.
#[derive(Debug, Clone)]
pub struct Collection {
    root: Arc<Node>,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// An empty collection (root label is the placeholder label `H(0)`).
    pub fn new() -> Self {
        Self { root: Node::placeholder() }
    }

    /// The current Merkle root.
    pub fn root_label(&self) -> Hash {
        self.root.label()
    }

    /// Insert `(key, value, kind)`. Fails with [`CollectionError::DuplicateKey`]
    /// if `key` is already present (spec §3 invariant 2).
    pub fn add(&self, key: &[u8], value: Vec<u8>, kind: impl Into<String>) -> Result<Self, CollectionError> {
        let key_hash = Hash::from_bytes(key);
        let kind = kind.into();
        let root = node::add(&self.root, key, &key_hash, value, &kind, 0)?;
        Ok(Self { root })
    }

    /// Remove `key`. Fails with [`CollectionError::KeyNotFound`] if absent.
    pub fn remove(&self, key: &[u8]) -> Result<Self, CollectionError> {
        let key_hash = Hash::from_bytes(key);
        let root = node::remove(&self.root, key, &key_hash, 0)?;
        Ok(Self { root })
    }

    /// Look up `key`, returning its stored `(value, kind)` if present.
    pub fn get(&self, key: &[u8]) -> Option<(Vec<u8>, String)> {
        let key_hash = Hash::from_bytes(key);
        match node::get(&self.root, key, &key_hash, 0) {
            node::Found::Present { value, kind } => Some((value.to_vec(), kind.to_string())),
            node::Found::Absent => None,
        }
    }

    /// True iff `key` is present.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Build an inclusion or absence proof for `key` against the current
    /// root (spec §4.6).
    pub fn proof(&self, key: &[u8]) -> Proof {
        proof::build(&self.root, key)
    }
}
