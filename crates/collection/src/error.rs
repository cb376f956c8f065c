use thiserror::Error;

/// Failures from mutating or reading a [`crate::Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// `add` was called for a key already present (spec §3 invariant 2).
    #[error("key already present in the collection")]
    DuplicateKey,

    /// `remove` was called for a key that is absent.
    #[error("key not present in the collection")]
    KeyNotFound,

    /// Two distinct keys hashed identically all the way to the maximum trie
    /// depth. Cryptographically negligible; guarded against to keep `add`
    /// total rather than recursing forever.
    #[error("hash collision exceeded the trie's maximum depth")]
    HashCollision,
}

/// Failures reading a constructed [`crate::Proof`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// The proof is an absence witness; there is no value to read.
    #[error("nothing stored under that key")]
    NothingStored,
}
