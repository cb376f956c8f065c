//! Small identifier newtypes used across the ledger.

use crate::Hash;
use sbor::prelude::*;
use std::fmt;

/// The identity of a DARC: its content hash at version 0 (spec §3, "A DARC's
/// ID is its content hash at version 0").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
#[sbor(transparent)]
pub struct DarcId(Hash);

impl DarcId {
    /// The all-zero DarcId, used as the prefix of the well-known index key
    /// (spec §6, "Well-known identifiers").
    pub const ZERO: Self = Self(Hash::ZERO);

    /// Wrap an already-computed content hash.
    pub fn from_hash(hash: Hash) -> Self {
        Self(hash)
    }

    /// The underlying hash.
    pub fn hash(&self) -> Hash {
        self.0
    }

    /// Raw bytes, for building signing messages and trie keys.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for DarcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "darc:{}", self.0)
    }
}

/// The identity of a skipchain (the chain's genesis block hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
#[sbor(transparent)]
pub struct ChainId(Hash);

impl ChainId {
    /// Wrap an already-computed genesis hash.
    pub fn from_hash(hash: Hash) -> Self {
        Self(hash)
    }

    /// The underlying hash.
    pub fn hash(&self) -> Hash {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

/// Position of a skipblock within its chain. Genesis is index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BasicSbor)]
#[sbor(transparent)]
pub struct BlockIndex(pub u64);

impl BlockIndex {
    /// The genesis index.
    pub const GENESIS: Self = BlockIndex(0);

    /// True when this is the genesis index.
    pub fn is_genesis(&self) -> bool {
        self.0 == 0
    }

    /// The next index.
    pub fn next(self) -> Self {
        BlockIndex(self.0 + 1)
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered contract tag selecting the state-transition verifier for a
/// record (spec §3, "Kind is a registered contract tag").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
pub struct Kind(String);

impl Kind {
    /// The well-known kind for DARC records (spec §6).
    pub const DARC: &'static str = "darc";

    /// Wrap a kind tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Borrow the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this is the well-known `"darc"` kind.
    pub fn is_darc(&self) -> bool {
        self.0 == Self::DARC
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_index_progression() {
        assert!(BlockIndex::GENESIS.is_genesis());
        assert_eq!(BlockIndex::GENESIS.next(), BlockIndex(1));
        assert!(!BlockIndex(1).is_genesis());
    }

    #[test]
    fn kind_darc_well_known() {
        assert!(Kind::new("darc").is_darc());
        assert!(!Kind::new("value").is_darc());
    }
}
