//! An in-memory, single-process substrate (spec §6): accepts whatever block
//! the local node proposes and immediately propagates it to this node's
//! sinks. Sufficient to drive the end-to-end scenarios of spec.md §8
//! without implementing real multi-node consensus.

use crate::{PropagationSink, SkipchainSubstrate, SubstrateError};
use omniledger_types::{ChainId, Hash, Skipblock};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct LocalSubstrate {
    chains: Mutex<HashMap<ChainId, Vec<Skipblock>>>,
    sinks: Mutex<Vec<Arc<dyn PropagationSink>>>,
}

impl LocalSubstrate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SkipchainSubstrate for LocalSubstrate {
    fn store_skipblock(&self, block: Skipblock) -> Result<(), SubstrateError> {
        self.chains.lock().entry(block.chain_id).or_default().push(block.clone());
        for sink in self.sinks.lock().iter() {
            sink.on_skipblock(block.clone());
        }
        Ok(())
    }

    fn get_latest(&self, chain_id: ChainId) -> Option<Skipblock> {
        self.chains.lock().get(&chain_id)?.last().cloned()
    }

    fn get_by_id(&self, chain_id: ChainId, hash: Hash) -> Option<Skipblock> {
        self.chains.lock().get(&chain_id)?.iter().find(|b| b.hash() == hash).cloned()
    }

    fn get_update_chain(&self, chain_id: ChainId, since: Hash) -> Vec<Skipblock> {
        let chains = self.chains.lock();
        let Some(blocks) = chains.get(&chain_id) else {
            return Vec::new();
        };
        match blocks.iter().position(|b| b.hash() == since) {
            Some(idx) => blocks[idx + 1..].to_vec(),
            None => blocks.clone(),
        }
    }

    fn register_sink(&self, sink: Arc<dyn PropagationSink>) {
        self.sinks.lock().push(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniledger_types::{BlockIndex, Data, Roster};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn block(chain_id: ChainId, index: u64, parent: Hash) -> Skipblock {
        Skipblock {
            chain_id,
            index: BlockIndex(index),
            parent,
            roster: Roster::new(vec![]),
            data: Data::new(Hash::ZERO, 0, vec![]),
        }
    }

    #[test]
    fn unknown_chain_has_no_latest() {
        let substrate = LocalSubstrate::new();
        let chain = ChainId::from_hash(Hash::from_bytes(b"chain"));
        assert!(substrate.get_latest(chain).is_none());
    }

    #[test]
    fn stored_block_becomes_latest() {
        let substrate = LocalSubstrate::new();
        let chain = ChainId::from_hash(Hash::from_bytes(b"chain"));
        let genesis = block(chain, 0, Hash::ZERO);
        substrate.store_skipblock(genesis.clone()).unwrap();
        assert_eq!(substrate.get_latest(chain), Some(genesis));
    }

    #[test]
    fn update_chain_returns_suffix_after_known_hash() {
        let substrate = LocalSubstrate::new();
        let chain = ChainId::from_hash(Hash::from_bytes(b"chain"));
        let genesis = block(chain, 0, Hash::ZERO);
        let b1 = block(chain, 1, genesis.hash());
        let b2 = block(chain, 2, b1.hash());
        substrate.store_skipblock(genesis.clone()).unwrap();
        substrate.store_skipblock(b1.clone()).unwrap();
        substrate.store_skipblock(b2.clone()).unwrap();

        let suffix = substrate.get_update_chain(chain, genesis.hash());
        assert_eq!(suffix, vec![b1, b2]);
    }

    #[test]
    fn update_chain_returns_everything_when_since_is_unknown() {
        let substrate = LocalSubstrate::new();
        let chain = ChainId::from_hash(Hash::from_bytes(b"chain"));
        let genesis = block(chain, 0, Hash::ZERO);
        substrate.store_skipblock(genesis.clone()).unwrap();
        assert_eq!(substrate.get_update_chain(chain, Hash::from_bytes(b"nowhere")), vec![genesis]);
    }

    #[test]
    fn registered_sinks_see_every_stored_block() {
        struct Counter(AtomicUsize);
        impl PropagationSink for Counter {
            fn on_skipblock(&self, _block: Skipblock) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let substrate = LocalSubstrate::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        substrate.register_sink(counter.clone());

        let chain = ChainId::from_hash(Hash::from_bytes(b"chain"));
        substrate.store_skipblock(block(chain, 0, Hash::ZERO)).unwrap();
        substrate.store_skipblock(block(chain, 1, Hash::ZERO)).unwrap();

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
