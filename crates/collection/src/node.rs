//! The binary trie itself: labels, descent, split and collapse.

use omniledger_types::Hash;
use std::sync::Arc;

/// Maximum descent depth: one bit per byte of the addressing hash.
pub(crate) const MAX_DEPTH: usize = Hash::BYTES * 8;

/// Bit `depth` of `hash`, most significant bit first.
pub(crate) fn bit_at(hash: &Hash, depth: usize) -> bool {
    let byte = hash.as_bytes()[depth / 8];
    (byte >> (7 - (depth % 8))) & 1 == 1
}

/// A node in the trie. Persistent: mutation never touches an existing node,
/// it builds new nodes on the path from the change back to the root and
/// shares every untouched subtree via `Arc` (spec §9, "Cloneable
/// Collection").
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// An empty subtree. Its label is the fixed value `H(0)`.
    Placeholder { label: Hash },
    /// A stored (key, value, kind) triple.
    Leaf {
        label: Hash,
        key: Arc<[u8]>,
        value: Arc<[u8]>,
        kind: Arc<str>,
    },
    /// A branch with two children, aggregating their labels.
    Internal {
        label: Hash,
        left: Arc<Node>,
        right: Arc<Node>,
    },
}

impl Node {
    pub(crate) fn placeholder() -> Arc<Node> {
        Arc::new(Node::Placeholder { label: placeholder_label() })
    }

    pub(crate) fn label(&self) -> Hash {
        match self {
            Node::Placeholder { label } => *label,
            Node::Leaf { label, .. } => *label,
            Node::Internal { label, .. } => *label,
        }
    }

    fn leaf(key: &[u8], value: Vec<u8>, kind: &str) -> Arc<Node> {
        Arc::new(Node::Leaf {
            label: leaf_label(key, &value, kind),
            key: Arc::from(key),
            value: Arc::from(value.as_slice()),
            kind: Arc::from(kind),
        })
    }

    fn internal(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        let label = internal_label(&left.label(), &right.label());
        Arc::new(Node::Internal { label, left, right })
    }
}

pub(crate) fn placeholder_label() -> Hash {
    Hash::from_bytes(&[0u8])
}

pub(crate) fn leaf_label(key: &[u8], value: &[u8], kind: &str) -> Hash {
    Hash::from_parts(&[&[1u8], key, value, kind.as_bytes()])
}

pub(crate) fn internal_label(left: &Hash, right: &Hash) -> Hash {
    Hash::from_parts(&[left.as_bytes(), right.as_bytes()])
}

/// Outcome of a lookup: either the stored value and kind, or absence.
pub(crate) enum Found {
    Present { value: Arc<[u8]>, kind: Arc<str> },
    Absent,
}

/// Descend to `key_hash` and report what is stored there, if anything.
pub(crate) fn get(node: &Arc<Node>, key: &[u8], key_hash: &Hash, depth: usize) -> Found {
    match node.as_ref() {
        Node::Placeholder { .. } => Found::Absent,
        Node::Leaf { key: stored_key, value, kind, .. } => {
            if stored_key.as_ref() == key {
                Found::Present {
                    value: value.clone(),
                    kind: kind.clone(),
                }
            } else {
                Found::Absent
            }
        }
        Node::Internal { left, right, .. } => {
            if bit_at(key_hash, depth) {
                get(right, key, key_hash, depth + 1)
            } else {
                get(left, key, key_hash, depth + 1)
            }
        }
    }
}

/// Insert `key` at `key_hash`, failing if already present (spec §3 invariant
/// 2, §4.1 "Fails if the key is already present").
pub(crate) fn add(
    node: &Arc<Node>,
    key: &[u8],
    key_hash: &Hash,
    value: Vec<u8>,
    kind: &str,
    depth: usize,
) -> Result<Arc<Node>, crate::CollectionError> {
    match node.as_ref() {
        Node::Placeholder { .. } => Ok(Node::leaf(key, value, kind)),
        Node::Leaf { key: existing_key, value: existing_value, kind: existing_kind, .. } => {
            if existing_key.as_ref() == key {
                return Err(crate::CollectionError::DuplicateKey);
            }
            // Both keys collide in their bit-prefix down to `depth`; the
            // existing leaf sits higher than its natural depth and must
            // split into an internal node, recursing until the two keys'
            // hash bits diverge (spec §4.1, "split if a colliding leaf sits
            // higher").
            let existing_hash = Hash::from_bytes(existing_key.as_ref());
            split_leaf(
                (existing_key.as_ref(), existing_value.as_ref(), existing_kind.as_ref(), &existing_hash),
                (key, &value, kind, key_hash),
                depth,
            )
        }
        Node::Internal { left, right, .. } => {
            if bit_at(key_hash, depth) {
                let new_right = add(right, key, key_hash, value, kind, depth + 1)?;
                Ok(Node::internal(left.clone(), new_right))
            } else {
                let new_left = add(left, key, key_hash, value, kind, depth + 1)?;
                Ok(Node::internal(new_left, right.clone()))
            }
        }
    }
}

type LeafParts<'a> = (&'a [u8], &'a [u8], &'a str, &'a Hash);

/// Build the minimal subtree holding both `existing` and `incoming`, whose
/// hashes currently agree on every bit before `depth`: descend one bit at a
/// time, wrapping a single-child internal node (placeholder sibling) while
/// the bits still match, and terminate in a two-leaf internal node the
/// moment they diverge.
fn split_leaf(
    existing: LeafParts<'_>,
    incoming: LeafParts<'_>,
    depth: usize,
) -> Result<Arc<Node>, crate::CollectionError> {
    if depth >= MAX_DEPTH {
        return Err(crate::CollectionError::HashCollision);
    }
    let (ek, ev, ekind, eh) = existing;
    let (ik, iv, ikind, ih) = incoming;
    let ebit = bit_at(eh, depth);
    let ibit = bit_at(ih, depth);
    if ebit == ibit {
        let child = split_leaf(existing, incoming, depth + 1)?;
        Ok(if ebit {
            Node::internal(Node::placeholder(), child)
        } else {
            Node::internal(child, Node::placeholder())
        })
    } else {
        let existing_leaf = Node::leaf(ek, ev.to_vec(), ekind);
        let incoming_leaf = Node::leaf(ik, iv.to_vec(), ikind);
        Ok(if ibit {
            Node::internal(existing_leaf, incoming_leaf)
        } else {
            Node::internal(incoming_leaf, existing_leaf)
        })
    }
}

pub(crate) fn remove(
    node: &Arc<Node>,
    key: &[u8],
    key_hash: &Hash,
    depth: usize,
) -> Result<Arc<Node>, crate::CollectionError> {
    match node.as_ref() {
        Node::Placeholder { .. } => Err(crate::CollectionError::KeyNotFound),
        Node::Leaf { key: stored_key, .. } => {
            if stored_key.as_ref() == key {
                Ok(Node::placeholder())
            } else {
                Err(crate::CollectionError::KeyNotFound)
            }
        }
        Node::Internal { left, right, .. } => {
            if bit_at(key_hash, depth) {
                let new_right = remove(right, key, key_hash, depth + 1)?;
                Ok(collapse(left.clone(), new_right))
            } else {
                let new_left = remove(left, key, key_hash, depth + 1)?;
                Ok(collapse(new_left, right.clone()))
            }
        }
    }
}

/// Collapse a parent whose children are now a placeholder and (at most) one
/// non-placeholder child, pulling a lone leaf back up (spec §4.1, "collapse
/// single-placeholder parents").
fn collapse(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
    match (left.as_ref(), right.as_ref()) {
        (Node::Placeholder { .. }, Node::Placeholder { .. }) => Node::placeholder(),
        (Node::Placeholder { .. }, Node::Leaf { .. }) => right,
        (Node::Leaf { .. }, Node::Placeholder { .. }) => left,
        _ => Node::internal(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_at_msb_first() {
        let h = Hash::from_digest_bytes({
            let mut b = [0u8; 32];
            b[0] = 0b1000_0000;
            b
        });
        assert!(bit_at(&h, 0));
        assert!(!bit_at(&h, 1));
    }
}
