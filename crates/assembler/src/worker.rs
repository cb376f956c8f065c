//! The tokio task that owns a chain's pending-transaction queue and builds
//! one block per epoch tick (spec §4.4), mirroring the teacher's per-shard
//! worker shape: one channel for incoming work, one timer for the flush.
//!
//! Commit is not performed here directly: this worker registers its
//! `Verifier` as a propagation sink with the substrate, so submitting a
//! block and having it locally accepted is the same call
//! (`SkipchainSubstrate::store_skipblock`) — consistent with real multi-node
//! propagation being out of scope (spec §6 Non-goals) while still routing
//! through the same callback a remote peer's block would use.

use crate::build::build_block;
use omniledger_core::VerifierRegistry;
use omniledger_store::CollectionStore;
use omniledger_substrate::SkipchainSubstrate;
use omniledger_types::{ChainId, Roster, Transaction};
use omniledger_verifier::{Verifier, VerifierHandle};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Epoch timing and other assembler-tunable parameters (spec §6
/// Configuration).
#[derive(Debug, Clone, Copy)]
pub struct AssemblerConfig {
    pub epoch: Duration,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self { epoch: Duration::from_secs(5) }
    }
}

/// A live handle to a chain's queue worker: submit transactions, read the
/// committed state.
pub struct AssemblerHandle {
    sender: mpsc::UnboundedSender<Transaction>,
    store: Arc<Mutex<CollectionStore>>,
    verifier: VerifierHandle,
}

impl AssemblerHandle {
    /// Enqueue a transaction for the next epoch's block (spec §4.7
    /// "AddTransaction... enqueues; returns immediately").
    pub fn submit(&self, tx: Transaction) -> Result<(), crate::AssemblerError> {
        self.sender.send(tx).map_err(|_| crate::AssemblerError::WorkerGone)
    }

    /// A read-only snapshot of the committed Collection (spec §5, readers
    /// "take a shared view via `clone()`").
    pub fn collection(&self) -> omniledger_collection::Collection {
        self.store.lock().collection().clone()
    }

    /// The hash of the last block this chain's verifier has accepted.
    pub fn tip(&self) -> Option<omniledger_types::Hash> {
        self.verifier.tip()
    }
}

/// Spawn the per-chain queue worker. `store` should already contain the
/// chain's genesis state (spec §4.7, `CreateGenesis` commits genesis before
/// starting the worker).
pub fn spawn(
    chain_id: ChainId,
    roster: Roster,
    store: Arc<Mutex<CollectionStore>>,
    registry: Arc<VerifierRegistry>,
    substrate: Arc<dyn SkipchainSubstrate>,
    config: AssemblerConfig,
) -> AssemblerHandle {
    let verifier = Verifier::new(chain_id, store.clone(), registry.clone(), substrate.clone());
    let verifier_handle = VerifierHandle::new(verifier);
    substrate.register_sink(Arc::new(verifier_handle.clone()));

    let (sender, mut receiver) = mpsc::unbounded_channel::<Transaction>();
    let handle = AssemblerHandle { sender, store: store.clone(), verifier: verifier_handle };

    tokio::spawn(async move {
        let mut pending = Vec::new();
        let mut ticker = tokio::time::interval(config.epoch);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                received = receiver.recv() => {
                    match received {
                        Some(tx) => pending.push(tx),
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    if pending.is_empty() {
                        continue;
                    }
                    let Some(tip) = substrate.get_latest(chain_id) else {
                        tracing::warn!(%chain_id, "no known tip; epoch skipped, batch retained");
                        continue;
                    };
                    let batch = std::mem::take(&mut pending);
                    let now = i64::try_from(
                        std::time::SystemTime::now()
                            .duration_since(std::time::UNIX_EPOCH)
                            .map(|d| d.as_secs())
                            .unwrap_or(0),
                    )
                    .unwrap_or(0);
                    let built = {
                        let guard = store.lock();
                        build_block(batch.clone(), &tip, roster.clone(), &guard, &registry, now)
                    };
                    match built {
                        Ok(Some(block)) => {
                            tracing::info!(%chain_id, index = %block.index, "block proposed");
                            if let Err(err) = substrate.store_skipblock(block) {
                                tracing::warn!(%chain_id, %err, "submission failed; epoch skipped, batch retained");
                                pending = batch;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::warn!(%chain_id, %err, "block build failed; epoch skipped, batch retained");
                            pending = batch;
                        }
                    }
                }
            }
        }
    });

    handle
}
