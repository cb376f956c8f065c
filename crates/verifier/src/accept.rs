//! Pure block-acceptance checks (spec §4.5 steps 1, 3, 4), independent of
//! where the block came from or how it gets committed.

use crate::VerifierError;
use omniledger_core::{LedgerSnapshot, VerifierRegistry};
use omniledger_store::CollectionStore;
use omniledger_types::{Skipblock, Transaction};

/// Re-derive every transaction's validity against `store` and recompute the
/// merkle root over the valid subset, accepting only if both match the
/// block's recorded values. Every node performs this independently rather
/// than trusting the leader's `Valid` assignment (spec §9, "the `Valid`
/// flag's authority").
///
/// Genesis blocks are accepted unconditionally (spec §4.5 step 1): they
/// carry the chain's first state and have nothing to verify against.
pub fn verify_block(store: &CollectionStore, registry: &VerifierRegistry, block: &Skipblock) -> Result<(), VerifierError> {
    if block.is_genesis() {
        return Ok(());
    }

    let snapshot = LedgerSnapshot::new(store.collection());
    for tx in &block.data.transactions {
        if !validity_matches(&snapshot, registry, tx) {
            return Err(VerifierError::ValidityMismatch);
        }
    }

    let valid: Vec<Transaction> = block.data.valid_transactions().cloned().collect();
    let recomputed = store.try_hash(&valid)?;
    if recomputed != block.data.merkle_root {
        return Err(VerifierError::MerkleMismatch);
    }
    Ok(())
}

fn validity_matches(snapshot: &LedgerSnapshot<'_>, registry: &VerifierRegistry, tx: &Transaction) -> bool {
    let expected = registry.get(&tx.kind).is_some_and(|verifier| verifier.verify(snapshot, tx));
    expected == tx.valid
}

/// Apply a block's valid transactions to `store` and assert the resulting
/// root matches what the block claims (spec §4.5, "commits... then asserts
/// `store.root_hash() == Data.MerkleRoot`"; a mismatch here is an invariant
/// violation, not a soft failure).
pub fn commit_block(store: &mut CollectionStore, block: &Skipblock) -> Result<(), VerifierError> {
    for tx in block.data.valid_transactions() {
        store.store(tx)?;
    }
    if store.root_hash() != block.data.merkle_root {
        tracing::error!(
            chain = %block.chain_id,
            index = %block.index,
            "post-commit root diverges from the block's recorded merkle root"
        );
        return Err(VerifierError::MerkleMismatch);
    }
    Ok(())
}
