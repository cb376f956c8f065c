//! The stateful, per-chain half of verification: tracks the locally known
//! tip and replays catch-up history fetched from the substrate (spec §4.5
//! step 2).

use crate::accept::{commit_block, verify_block};
use crate::VerifierError;
use omniledger_core::VerifierRegistry;
use omniledger_store::CollectionStore;
use omniledger_substrate::{PropagationSink, SkipchainSubstrate};
use omniledger_types::{ChainId, Hash, Skipblock};
use parking_lot::Mutex;
use std::sync::Arc;

/// Verifies and commits skipblocks for a single chain, replaying from the
/// substrate when its locally known tip falls behind an incoming block's
/// parent.
pub struct Verifier {
    chain_id: ChainId,
    store: Arc<Mutex<CollectionStore>>,
    registry: Arc<VerifierRegistry>,
    substrate: Arc<dyn SkipchainSubstrate>,
    tip: Option<Hash>,
}

impl Verifier {
    pub fn new(
        chain_id: ChainId,
        store: Arc<Mutex<CollectionStore>>,
        registry: Arc<VerifierRegistry>,
        substrate: Arc<dyn SkipchainSubstrate>,
    ) -> Self {
        Self { chain_id, store, registry, substrate, tip: None }
    }

    /// The hash of the last block this verifier has accepted, if any.
    pub fn tip(&self) -> Option<Hash> {
        self.tip
    }

    /// Verify and commit `block`, catching up first if its parent is not
    /// the locally known tip (spec §4.5 step 2).
    pub fn accept(&mut self, block: Skipblock) -> Result<(), VerifierError> {
        if !block.is_genesis() && self.tip != Some(block.parent) {
            self.catch_up_to(block.parent)?;
        }
        self.accept_one(&block)?;
        self.tip = Some(block.hash());
        Ok(())
    }

    fn catch_up_to(&mut self, parent: Hash) -> Result<(), VerifierError> {
        let since = self.tip.unwrap_or(Hash::ZERO);
        let missing = self.substrate.get_update_chain(self.chain_id, since);
        if missing.is_empty() {
            return Err(VerifierError::CannotCatchUp);
        }
        for block in &missing {
            self.accept_one(block)?;
            self.tip = Some(block.hash());
        }
        if self.tip != Some(parent) {
            return Err(VerifierError::CannotCatchUp);
        }
        Ok(())
    }

    fn accept_one(&self, block: &Skipblock) -> Result<(), VerifierError> {
        let mut store = self.store.lock();
        verify_block(&store, &self.registry, block)?;
        commit_block(&mut store, block)
    }
}

/// A shareable, thread-safe handle to a [`Verifier`], registrable as a
/// [`PropagationSink`] with a [`SkipchainSubstrate`].
#[derive(Clone)]
pub struct VerifierHandle(Arc<Mutex<Verifier>>);

impl VerifierHandle {
    pub fn new(verifier: Verifier) -> Self {
        Self(Arc::new(Mutex::new(verifier)))
    }

    /// The hash of the last accepted block, if any.
    pub fn tip(&self) -> Option<Hash> {
        self.0.lock().tip()
    }
}

impl PropagationSink for VerifierHandle {
    fn on_skipblock(&self, block: Skipblock) {
        let chain_id = block.chain_id;
        let index = block.index;
        if let Err(err) = self.0.lock().accept(block) {
            tracing::error!(%chain_id, %index, %err, "verifier rejected propagated skipblock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniledger_core::darc_key;
    use omniledger_darc::{Darc, Rule, Subject};
    use omniledger_substrate::LocalSubstrate;
    use omniledger_types::{Action, BlockIndex, Data, Key, Kind, KeyPair, Roster, Transaction};

    fn signed(kp: &KeyPair, action: Action, key: Key, kind: &str, value: &[u8]) -> Transaction {
        let unsigned = Transaction::new(action, key.clone(), Kind::new(kind), value.to_vec());
        let probe = Transaction {
            action,
            key,
            kind: Kind::new(kind),
            value: value.to_vec(),
            signer: kp.public_key(),
            signature: kp.sign(b"x"),
            valid: false,
        };
        let msg = probe.signing_message();
        unsigned.signed(kp.public_key(), kp.sign(&msg))
    }

    fn fresh_store() -> CollectionStore {
        let dir = tempfile::tempdir().unwrap();
        CollectionStore::open(dir.path()).unwrap()
    }

    #[test]
    fn genesis_then_sequential_block_is_accepted() {
        let chain_id = ChainId::from_hash(Hash::from_bytes(b"chain"));
        let owner = KeyPair::from_seed(&[1u8; 32]);
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(owner.public_key())])], "root");

        let store = Arc::new(Mutex::new(fresh_store()));
        let mut registry = VerifierRegistry::new();
        registry.register("v1", Arc::new(omniledger_core::GenericVerifier));
        let registry = Arc::new(registry);
        let substrate: Arc<dyn SkipchainSubstrate> = Arc::new(LocalSubstrate::new());

        let mut verifier = Verifier::new(chain_id, store.clone(), registry, substrate);

        let install = signed(&owner, Action::Create, darc_key(darc.id()), Kind::DARC, &sbor::basic_encode(&darc).unwrap());
        let genesis = Skipblock {
            chain_id,
            index: BlockIndex::GENESIS,
            parent: Hash::ZERO,
            roster: Roster::new(vec![]),
            data: Data::new(Hash::ZERO, 0, vec![Transaction { valid: true, ..install }]),
        };
        verifier.accept(genesis.clone()).unwrap();
        assert_eq!(verifier.tip(), Some(genesis.hash()));

        let tx = signed(&owner, Action::Create, Key::new(darc.id(), b"greet".to_vec()), "v1", b"hello");
        let tx = Transaction { valid: true, ..tx };
        let mr = store.lock().try_hash(&[tx.clone()]).unwrap();
        let block1 = Skipblock {
            chain_id,
            index: BlockIndex(1),
            parent: genesis.hash(),
            roster: Roster::new(vec![]),
            data: Data::new(mr, 0, vec![tx]),
        };
        verifier.accept(block1.clone()).unwrap();
        assert_eq!(verifier.tip(), Some(block1.hash()));
        assert_eq!(store.lock().root_hash(), mr);
    }

    #[test]
    fn unknown_parent_with_no_substrate_history_cannot_catch_up() {
        let chain_id = ChainId::from_hash(Hash::from_bytes(b"chain"));
        let store = Arc::new(Mutex::new(fresh_store()));
        let registry = Arc::new(VerifierRegistry::new());
        let substrate: Arc<dyn SkipchainSubstrate> = Arc::new(LocalSubstrate::new());
        let mut verifier = Verifier::new(chain_id, store, registry, substrate);

        let orphan = Skipblock {
            chain_id,
            index: BlockIndex(5),
            parent: Hash::from_bytes(b"nonexistent"),
            roster: Roster::new(vec![]),
            data: Data::new(Hash::ZERO, 0, vec![]),
        };
        assert!(matches!(verifier.accept(orphan).unwrap_err(), VerifierError::CannotCatchUp));
    }
}
