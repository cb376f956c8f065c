//! The CPU-only half of block assembly (spec §4.4 steps 2-5): no channel,
//! no timer, no I/O beyond the store's own dry-run hashing. Kept separate
//! from the worker loop so it can be tested without `tokio`.

use crate::ordering::order;
use crate::AssemblerError;
use omniledger_core::{LedgerSnapshot, VerifierRegistry};
use omniledger_store::CollectionStore;
use omniledger_types::{Data, Roster, Skipblock, Transaction};

/// Build the next skipblock for a chain whose current tip is `tip`, from a
/// pending batch. Transactions whose kind has no registered verifier are
/// dropped before inclusion (spec §4.4 step 3). Returns `None` if nothing
/// survives to be included — an empty batch never produces a block (spec
/// §4.4 step 1).
pub fn build_block(
    pending: Vec<Transaction>,
    tip: &Skipblock,
    roster: Roster,
    store: &CollectionStore,
    registry: &VerifierRegistry,
    now: i64,
) -> Result<Option<Skipblock>, AssemblerError> {
    if pending.is_empty() {
        return Ok(None);
    }

    let snapshot = LedgerSnapshot::new(store.collection());
    let judged: Vec<Transaction> = order(pending)
        .into_iter()
        .filter_map(|tx| {
            let verifier = registry.get(&tx.kind)?;
            let valid = verifier.verify(&snapshot, &tx);
            Some(Transaction { valid, ..tx })
        })
        .collect();

    if judged.is_empty() {
        return Ok(None);
    }

    let valid_only: Vec<Transaction> = judged.iter().filter(|tx| tx.valid).cloned().collect();
    let merkle_root = store.try_hash(&valid_only)?;
    let data = Data::new(merkle_root, now, judged);

    Ok(Some(Skipblock {
        chain_id: tip.chain_id,
        index: tip.index.next(),
        parent: tip.hash(),
        roster,
        data,
    }))
}
