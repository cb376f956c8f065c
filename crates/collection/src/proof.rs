//! Inclusion/absence proofs: `(root_dump, step_dump[])` (spec §4.1, §4.6).

use crate::error::ProofError;
use crate::node::{bit_at, internal_label, leaf_label, placeholder_label, Node};
use omniledger_types::Hash;
use sbor::prelude::*;
use std::sync::Arc;

/// The visible contents of one trie node, carried inside a proof.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Dump {
    label: Hash,
    contents: DumpContents,
}

#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
enum DumpContents {
    Placeholder,
    Leaf { key: Vec<u8>, value: Vec<u8>, kind: String },
    Internal { left_label: Hash, right_label: Hash },
}

impl Dump {
    fn from_node(node: &Node) -> Dump {
        match node {
            Node::Placeholder { label } => Dump {
                label: *label,
                contents: DumpContents::Placeholder,
            },
            Node::Leaf { label, key, value, kind } => Dump {
                label: *label,
                contents: DumpContents::Leaf {
                    key: key.to_vec(),
                    value: value.to_vec(),
                    kind: kind.to_string(),
                },
            },
            Node::Internal { label, left, right } => Dump {
                label: *label,
                contents: DumpContents::Internal {
                    left_label: left.label(),
                    right_label: right.label(),
                },
            },
        }
    }

    /// The node's Merkle label.
    pub fn label(&self) -> Hash {
        self.label
    }

    /// The stored key, if this dump is a leaf.
    pub fn key(&self) -> Option<&[u8]> {
        match &self.contents {
            DumpContents::Leaf { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The stored `(value, kind)`, if this dump is a leaf.
    pub fn value_kind(&self) -> Option<(&[u8], &str)> {
        match &self.contents {
            DumpContents::Leaf { value, kind, .. } => Some((value, kind)),
            _ => None,
        }
    }

    /// True iff this dump is an empty subtree.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.contents, DumpContents::Placeholder)
    }

    /// `label` matches the hash of this dump's own visible contents (spec
    /// §4.1, "marked `consistent` iff its label equals the hash of its
    /// visible contents").
    pub fn consistent(&self) -> bool {
        let expected = match &self.contents {
            DumpContents::Placeholder => placeholder_label(),
            DumpContents::Leaf { key, value, kind } => leaf_label(key, value, kind),
            DumpContents::Internal { left_label, right_label } => internal_label(left_label, right_label),
        };
        expected == self.label
    }
}

/// Both sibling dumps at one descent step.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Step {
    pub left: Dump,
    pub right: Dump,
}

/// A path of node dumps from root to a leaf or placeholder, witnessing
/// inclusion or absence of `key` (spec §4.6). Serialized with the same SBOR
/// encoding as every other wire payload, so it can cross the service RPC
/// boundary and round-trip (spec §8, "proof-round-trip").
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Proof {
    key: Vec<u8>,
    root_dump: Dump,
    steps: Vec<Step>,
}

impl Proof {
    /// The root dump's label, i.e. the Collection root this proof was taken
    /// against.
    pub fn root_label(&self) -> Hash {
        self.root_dump.label()
    }

    /// Every dump's label equals the hash of its own contents, and each
    /// step's two children reconstruct the parent's label (spec §4.1,
    /// §testable-properties "proof-soundness").
    pub fn consistent(&self) -> bool {
        if !self.root_dump.consistent() {
            return false;
        }
        let key_hash = Hash::from_bytes(&self.key);
        let mut parent_label = self.root_dump.label();
        for (depth, step) in self.steps.iter().enumerate() {
            if !step.left.consistent() || !step.right.consistent() {
                return false;
            }
            if parent_label != internal_label(&step.left.label(), &step.right.label()) {
                return false;
            }
            parent_label = if bit_at(&key_hash, depth) {
                step.right.label()
            } else {
                step.left.label()
            };
        }
        true
    }

    /// Verify this proof against a committed root (spec §4.6, "Verifying
    /// against `B` requires `proof.root_dump.label == B.Data.MerkleRoot` and
    /// `proof.consistent()`").
    pub fn verify(&self, root: Hash) -> bool {
        self.root_label() == root && self.consistent()
    }

    fn final_dump(&self) -> &Dump {
        let key_hash = Hash::from_bytes(&self.key);
        let mut current = &self.root_dump;
        for (depth, step) in self.steps.iter().enumerate() {
            current = if bit_at(&key_hash, depth) { &step.right } else { &step.left };
        }
        current
    }

    /// True iff the path down `H(key)` ends at a leaf whose key matches
    /// (spec §4.6).
    pub fn matches(&self) -> bool {
        match self.final_dump().key() {
            Some(k) => k == self.key.as_slice(),
            None => false,
        }
    }

    /// The stored `(value, kind)` if this proof matches, otherwise the
    /// absence error.
    pub fn values(&self) -> Result<(Vec<u8>, String), ProofError> {
        if !self.matches() {
            return Err(ProofError::NothingStored);
        }
        let (value, kind) = self.final_dump().value_kind().expect("matches() implies a leaf dump");
        Ok((value.to_vec(), kind.to_string()))
    }
}

/// Walk the real trie from `root` down the path of `key`, dumping both
/// siblings at every internal step.
pub(crate) fn build(root: &Arc<Node>, key: &[u8]) -> Proof {
    let key_hash = Hash::from_bytes(key);
    let root_dump = Dump::from_node(root);
    let mut steps = Vec::new();
    let mut current = root;
    let mut depth = 0usize;
    while let Node::Internal { left, right, .. } = current.as_ref() {
        steps.push(Step {
            left: Dump::from_node(left),
            right: Dump::from_node(right),
        });
        current = if bit_at(&key_hash, depth) { right } else { left };
        depth += 1;
    }
    Proof {
        key: key.to_vec(),
        root_dump,
        steps,
    }
}
