//! A Collection paired with a bucketed file: the persistent half of the
//! ledger state (spec §4.3).

mod error;

pub use error::StoreError;

use omniledger_collection::Collection;
use omniledger_types::{Action, Hash, Transaction};
use std::path::Path;

const VALUE_PREFIX: &[u8] = b"v:";
const KIND_PREFIX: &[u8] = b"k:";
const ROOT_META_KEY: &[u8] = b"m:root";

fn value_key(key: &[u8]) -> Vec<u8> {
    [VALUE_PREFIX, key].concat()
}

fn kind_key(key: &[u8]) -> Vec<u8> {
    [KIND_PREFIX, key].concat()
}

/// A Collection backed by a `sled` bucket file, rebuilt by scanning the
/// bucket on open (spec §4.3).
///
/// `try_hash` never mutates `self`: it runs the same state-transition logic
/// against a cloned (structurally shared, O(1)) Collection and simply
/// discards the clone, which is why purity holds unconditionally rather
/// than relying on an undo path (spec §9 open question (a)).
pub struct CollectionStore {
    db: sled::Db,
    collection: Collection,
    corrupt: bool,
}

impl CollectionStore {
    /// Open (creating if absent) the bucket file at `path` and rebuild the
    /// in-memory Collection by scanning it. If the bucket carries a
    /// previously committed root that disagrees with the rebuilt root, the
    /// store opens in a corrupt state and refuses further writes (spec
    /// §4.3, "the store is marked corrupt and the node refuses to serve").
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let collection = Self::load_all(&db)?;
        let corrupt = match db.get(ROOT_META_KEY)? {
            Some(recorded) => recorded.as_ref() != collection.root_label().as_bytes().as_slice(),
            None => false,
        };
        if corrupt {
            tracing::error!(
                rebuilt = %collection.root_label(),
                "collection store bucket scan did not reproduce the last committed root"
            );
        }
        Ok(Self { db, collection, corrupt })
    }

    fn load_all(db: &sled::Db) -> Result<Collection, StoreError> {
        let mut collection = Collection::new();
        for entry in db.scan_prefix(VALUE_PREFIX) {
            let (full_key, value) = entry?;
            let key = &full_key[VALUE_PREFIX.len()..];
            let kind_bytes = db.get(kind_key(key))?.ok_or(StoreError::MissingKind)?;
            let kind = std::str::from_utf8(&kind_bytes).map_err(|_| StoreError::InvalidKind)?;
            collection = collection.add(key, value.to_vec(), kind)?;
        }
        Ok(collection)
    }

    /// True once a reopen detected a mismatched root. A corrupt store still
    /// answers reads against whatever it rebuilt, but [`Self::store`]
    /// refuses to commit further writes.
    pub fn is_corrupt(&self) -> bool {
        self.corrupt
    }

    /// The current Merkle root.
    pub fn root_hash(&self) -> Hash {
        self.collection.root_label()
    }

    /// A read-only view of the underlying Collection, for building proofs
    /// or DARC-resolving snapshots (spec §5, "readers... take a shared view
    /// via `clone()`").
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Look up a stored `(value, kind)` pair.
    pub fn get_value_kind(&self, key: &[u8]) -> Option<(Vec<u8>, String)> {
        self.collection.get(key)
    }

    /// Apply `tx`'s state change and persist it atomically (spec §4.3,
    /// "writes... atomically in one file transaction").
    pub fn store(&mut self, tx: &Transaction) -> Result<(), StoreError> {
        if self.corrupt {
            return Err(StoreError::Corrupt);
        }
        let updated = apply(&self.collection, tx)?;
        self.persist(tx, &updated)?;
        self.collection = updated;
        Ok(())
    }

    fn persist(&self, tx: &Transaction, updated: &Collection) -> Result<(), StoreError> {
        let key_bytes = tx.key.to_bytes();
        let value_k = value_key(&key_bytes);
        let kind_k = kind_key(&key_bytes);
        let root_bytes = updated.root_label().as_bytes().to_vec();
        let value = tx.value.clone();
        let kind = tx.kind.as_str().as_bytes().to_vec();
        let remove = tx.action == Action::Remove;

        self.db
            .transaction(move |tx_db| -> sled::transaction::ConflictableTransactionResult<(), sled::Error> {
                if remove {
                    tx_db.remove(value_k.as_slice())?;
                    tx_db.remove(kind_k.as_slice())?;
                } else {
                    tx_db.insert(value_k.as_slice(), value.clone())?;
                    tx_db.insert(kind_k.as_slice(), kind.clone())?;
                }
                tx_db.insert(ROOT_META_KEY, root_bytes.clone())?;
                Ok(())
            })?;
        self.db.flush()?;
        Ok(())
    }

    /// Compute the root as if `txs` had been applied, without mutating the
    /// store (spec §4.3, "applies, records the root, then undoes each
    /// insertion; the pre- and post-state roots must be equal").
    pub fn try_hash(&self, txs: &[Transaction]) -> Result<Hash, StoreError> {
        let mut probe = self.collection.clone();
        for tx in txs {
            probe = apply(&probe, tx)?;
        }
        Ok(probe.root_label())
    }
}

fn apply(collection: &Collection, tx: &Transaction) -> Result<Collection, StoreError> {
    let key_bytes = tx.key.to_bytes();
    match tx.action {
        Action::Create => Ok(collection.add(&key_bytes, tx.value.clone(), tx.kind.as_str())?),
        Action::Update => {
            let removed = collection.remove(&key_bytes)?;
            Ok(removed.add(&key_bytes, tx.value.clone(), tx.kind.as_str())?)
        }
        Action::Remove => Ok(collection.remove(&key_bytes)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniledger_types::{DarcId, Key, Kind, KeyPair};

    fn sample_tx(action: Action, name: &[u8], value: &[u8], valid: bool) -> Transaction {
        let kp = KeyPair::from_seed(&[6u8; 32]);
        Transaction {
            action,
            key: Key::new(DarcId::from_hash(Hash::from_bytes(b"d")), name.to_vec()),
            kind: Kind::new("v1"),
            value: value.to_vec(),
            signer: kp.public_key(),
            signature: kp.sign(b"x"),
            valid,
        }
    }

    #[test]
    fn store_then_reopen_matches_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CollectionStore::open(dir.path()).unwrap();
        store.store(&sample_tx(Action::Create, b"greet", b"hello", true)).unwrap();
        let root_before = store.root_hash();
        drop(store);

        let reopened = CollectionStore::open(dir.path()).unwrap();
        assert!(!reopened.is_corrupt());
        assert_eq!(reopened.root_hash(), root_before);
        assert_eq!(
            reopened.get_value_kind(b"greet").map(|_| ()),
            Some(())
        );
    }

    #[test]
    fn try_hash_does_not_mutate_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();
        let before = store.root_hash();
        let probe = store
            .try_hash(&[sample_tx(Action::Create, b"x", b"1", true)])
            .unwrap();
        assert_ne!(probe, before);
        assert_eq!(store.root_hash(), before);
    }

    #[test]
    fn update_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CollectionStore::open(dir.path()).unwrap();
        store.store(&sample_tx(Action::Create, b"k", b"v1", true)).unwrap();
        store.store(&sample_tx(Action::Update, b"k", b"v2", true)).unwrap();
        let (value, _) = store.get_value_kind(b"k").unwrap();
        assert_eq!(value, b"v2");
    }

    #[test]
    fn remove_clears_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CollectionStore::open(dir.path()).unwrap();
        store.store(&sample_tx(Action::Create, b"k", b"v", true)).unwrap();
        store.store(&sample_tx(Action::Remove, b"k", b"", true)).unwrap();
        assert!(store.get_value_kind(b"k").is_none());
    }
}
