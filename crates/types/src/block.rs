//! Block payloads and the skipblocks that carry them.

use crate::{BlockIndex, ChainId, Hash, PublicKey, Transaction};
use sbor::prelude::*;

/// The payload committed into each skipblock (spec §3, "Block payload").
///
/// `merkle_root` is the root of the Collection after applying, in this
/// struct's stored order, only the transactions with `valid == true`.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Data {
    pub merkle_root: Hash,
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
}

impl Data {
    /// Construct a block payload. `transactions` must already be in their
    /// final salted-hash order (spec §4.4 "Ordering").
    pub fn new(merkle_root: Hash, timestamp: i64, transactions: Vec<Transaction>) -> Self {
        Self {
            merkle_root,
            timestamp,
            transactions,
        }
    }

    /// The transactions the leader (or a replaying node) considers applied.
    pub fn valid_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|tx| tx.valid)
    }

    /// A hash over every transaction in this payload, valid or not, in
    /// stored order. Unlike `merkle_root`, this also covers transactions
    /// that were judged invalid and therefore never reach the Collection,
    /// so two blocks that differ only in which transactions they rejected
    /// don't collide.
    pub fn transactions_hash(&self) -> Hash {
        let mut buf = Vec::with_capacity(self.transactions.len() * 33);
        for tx in &self.transactions {
            buf.extend_from_slice(tx.content_hash().as_bytes());
            buf.push(tx.valid as u8);
        }
        Hash::from_bytes(&buf)
    }
}

/// The ordered list of node identities authoritative for a chain (spec
/// GLOSSARY, "Roster").
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Roster(Vec<PublicKey>);

impl Roster {
    /// Build a roster from an ordered member list. Must be non-empty.
    pub fn new(members: Vec<PublicKey>) -> Self {
        Self(members)
    }

    /// The roster members, in order.
    pub fn members(&self) -> &[PublicKey] {
        &self.0
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One entry in a hash-linked chain replicated across a roster (spec
/// GLOSSARY, "Block / Skipblock").
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Skipblock {
    pub chain_id: ChainId,
    pub index: BlockIndex,
    pub parent: Hash,
    pub roster: Roster,
    pub data: Data,
}

impl Skipblock {
    /// The content hash identifying this block, used as the parent link of
    /// its successor. Covers every field, including the full transaction
    /// list (not just `merkle_root`, which only reflects the valid subset)
    /// so the hash chain commits to rejected transactions and the roster
    /// too.
    pub fn hash(&self) -> Hash {
        let mut roster_bytes = Vec::with_capacity(self.roster.len() * 32);
        for member in self.roster.members() {
            roster_bytes.extend_from_slice(member.as_bytes());
        }
        let transactions_hash = self.data.transactions_hash();
        Hash::from_parts(&[
            self.chain_id.hash().as_bytes(),
            &self.index.0.to_be_bytes(),
            self.parent.as_bytes(),
            self.data.merkle_root.as_bytes(),
            &self.data.timestamp.to_be_bytes(),
            transactions_hash.as_bytes(),
            &roster_bytes,
        ])
    }

    /// True for the first block of a chain.
    pub fn is_genesis(&self) -> bool {
        self.index.is_genesis()
    }
}
