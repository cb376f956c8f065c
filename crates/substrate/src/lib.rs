//! The narrow boundary the ledger core depends on instead of a concrete
//! gossip/consensus implementation (spec §6, "Skipchain substrate
//! interface"). Consensus, node discovery, and wire framing are out of
//! scope; this crate only carries the trait and a single-process stand-in.

mod local;

pub use local::LocalSubstrate;

use omniledger_types::{ChainId, Hash, Skipblock};
use std::sync::Arc;
use thiserror::Error;

/// Failures reported back across the substrate boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubstrateError {
    #[error("chain {0} is unknown to this substrate")]
    UnknownChain(ChainId),
}

/// Storage and linearization of skipblocks, consumed as an abstraction so
/// the ledger core never depends on a concrete consensus implementation.
pub trait SkipchainSubstrate: Send + Sync {
    /// Append `block` to its chain and invoke every registered sink with it
    /// (spec §4.4 step 6, "the substrate invokes the propagation callback").
    fn store_skipblock(&self, block: Skipblock) -> Result<(), SubstrateError>;

    /// The most recently stored block of `chain_id`, if any.
    fn get_latest(&self, chain_id: ChainId) -> Option<Skipblock>;

    /// A specific block by its content hash.
    fn get_by_id(&self, chain_id: ChainId, hash: Hash) -> Option<Skipblock>;

    /// Every block of `chain_id` after (not including) the one hashing to
    /// `since`, in chain order. Used by a catching-up Verifier (spec §4.5
    /// step 2, "fetch the chain slice from the substrate and replay").
    /// Returns the whole chain if `since` is not found.
    fn get_update_chain(&self, chain_id: ChainId, since: Hash) -> Vec<Skipblock>;

    /// Register a sink to be invoked on every future accepted block, across
    /// all chains (spec §4.5, "every node runs" the propagation step).
    fn register_sink(&self, sink: Arc<dyn PropagationSink>);
}

/// Invoked once a skipblock is accepted and ready to propagate to this
/// node's local Verifier.
pub trait PropagationSink: Send + Sync {
    fn on_skipblock(&self, block: Skipblock);
}
