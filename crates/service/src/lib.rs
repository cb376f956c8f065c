//! Request handlers for `CreateGenesis`, `AddTransaction`, and `GetProof`
//! (spec §4.7), plus the additive read-only `GetLatestSkipblock` /
//! `GetChainStatus` accessors (spec §4.7 extension).

mod error;
mod genesis;

pub use error::ServiceError;

use omniledger_assembler::{AssemblerConfig, AssemblerHandle};
use omniledger_collection::Proof;
use omniledger_core::VerifierRegistry;
use omniledger_darc::Darc;
use omniledger_store::CollectionStore;
use omniledger_substrate::SkipchainSubstrate;
use omniledger_types::{BlockIndex, ChainId, Hash, Key, Roster, Skipblock, Transaction};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Current RPC protocol version (spec §6, "Ping / service version
/// negotiation"). Every handler checks the caller's version against this
/// before touching any state.
pub const CURRENT_VERSION: u32 = 1;

/// Static configuration loaded by the node binary (spec §6
/// "Configuration").
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory under which each chain gets its own bucket file,
    /// named by the chain's hex-encoded id.
    pub bucket_dir: PathBuf,
    pub assembler: AssemblerConfig,
    pub propagation_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bucket_dir: PathBuf::from("."),
            assembler: AssemblerConfig::default(),
            propagation_timeout: Duration::from_secs(10),
        }
    }
}

/// Read-only summary of a chain's state (spec §4.7, "GetChainStatus").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStatus {
    pub chain_id: ChainId,
    pub latest_index: BlockIndex,
    pub root_hash: Hash,
}

struct Chain {
    handle: AssemblerHandle,
}

/// The process-wide ledger service: every chain this node serves, the
/// substrate it submits blocks to, and the contract verifiers it trusts.
/// Held as a value and threaded through request dispatch rather than a
/// global registry (spec §9, "Global service registry").
pub struct Service {
    config: ServiceConfig,
    substrate: Arc<dyn SkipchainSubstrate>,
    registry: Arc<VerifierRegistry>,
    chains: Mutex<HashMap<ChainId, Chain>>,
    /// Serializes genesis creation across chains (spec §5, "A single coarse
    /// mutex serializes genesis creation across chains").
    genesis_lock: Mutex<()>,
    propagation_timeout: Mutex<Duration>,
}

impl Service {
    pub fn new(config: ServiceConfig, substrate: Arc<dyn SkipchainSubstrate>, registry: Arc<VerifierRegistry>) -> Self {
        let propagation_timeout = config.propagation_timeout;
        Self {
            config,
            substrate,
            registry,
            chains: Mutex::new(HashMap::new()),
            genesis_lock: Mutex::new(()),
            propagation_timeout: Mutex::new(propagation_timeout),
        }
    }

    /// `SetPropagationTimeout` (spec §6). The in-process `LocalSubstrate`
    /// propagates synchronously and has no timeout of its own to honor;
    /// this only updates the value surfaced by configuration introspection.
    pub fn set_propagation_timeout(&self, timeout: Duration) {
        *self.propagation_timeout.lock() = timeout;
    }

    pub fn propagation_timeout(&self) -> Duration {
        *self.propagation_timeout.lock()
    }

    /// `CreateGenesisBlock` (spec §4.7): validate, materialize genesis
    /// state, submit the genesis block, and start the chain's worker.
    pub fn create_genesis(
        &self,
        version: u32,
        roster: Roster,
        genesis_darc: Darc,
        genesis_tx: Transaction,
    ) -> Result<Skipblock, ServiceError> {
        ServiceError::check_version(version)?;
        let _guard = self.genesis_lock.lock();

        let chain_id = genesis::chain_id_for(&genesis_darc, &roster);
        if self.chains.lock().contains_key(&chain_id) {
            return Err(ServiceError::DuplicateKey);
        }
        genesis::authorize_genesis_tx(&genesis_darc, &genesis_tx)?;

        let path = self.config.bucket_dir.join(chain_id.hash().to_hex());
        let mut store = CollectionStore::open(&path)?;
        let block = genesis::build_genesis_block(&mut store, chain_id, roster.clone(), &genesis_darc, &genesis_tx)?;

        let store = Arc::new(Mutex::new(store));
        let handle = omniledger_assembler::spawn(
            chain_id,
            roster,
            store,
            self.registry.clone(),
            self.substrate.clone(),
            self.config.assembler,
        );

        self.substrate.store_skipblock(block.clone())?;
        self.chains.lock().insert(chain_id, Chain { handle });
        tracing::info!(%chain_id, "genesis block created");
        Ok(block)
    }

    /// `AddTransaction` (spec §4.7): enqueue, returning immediately.
    pub fn add_transaction(&self, version: u32, chain_id: ChainId, tx: Transaction) -> Result<(), ServiceError> {
        ServiceError::check_version(version)?;
        if tx.signature.as_bytes() == &[0u8; 64] {
            return Err(ServiceError::NoSignatures);
        }
        if tx.kind.is_darc() && !tx.key.name().is_empty() {
            return Err(ServiceError::KeyNotDarcId);
        }
        let chains = self.chains.lock();
        let chain = chains.get(&chain_id).ok_or(ServiceError::UnknownChain(chain_id))?;
        chain.handle.submit(tx)?;
        Ok(())
    }

    /// `GetProof` (spec §4.7): resolve the chain's latest committed state
    /// and build a proof for `key` against it. `key` is the wire encoding
    /// of a [`Key`] (`darc_id || name`).
    pub fn get_proof(&self, version: u32, chain_id: ChainId, key: &[u8]) -> Result<Proof, ServiceError> {
        ServiceError::check_version(version)?;
        Key::from_bytes(key)?;
        let chains = self.chains.lock();
        let chain = chains.get(&chain_id).ok_or(ServiceError::UnknownChain(chain_id))?;
        Ok(chain.handle.collection().proof(key))
    }

    /// Resolve a proof to its stored value, mapping an absence witness onto
    /// `ServiceError::NothingStored` (spec §6, `nothing-stored`).
    pub fn get_value(&self, version: u32, chain_id: ChainId, key: &[u8]) -> Result<(Vec<u8>, String), ServiceError> {
        let proof = self.get_proof(version, chain_id, key)?;
        proof.values().map_err(|_| ServiceError::NothingStored)
    }

    /// `GetLatestSkipblock` (spec §4.7 extension).
    pub fn get_latest_skipblock(&self, version: u32, chain_id: ChainId) -> Result<Skipblock, ServiceError> {
        ServiceError::check_version(version)?;
        self.substrate.get_latest(chain_id).ok_or(ServiceError::UnknownChain(chain_id))
    }

    /// `GetChainStatus` (spec §4.7 extension).
    pub fn get_chain_status(&self, version: u32, chain_id: ChainId) -> Result<ChainStatus, ServiceError> {
        ServiceError::check_version(version)?;
        let chains = self.chains.lock();
        let chain = chains.get(&chain_id).ok_or(ServiceError::UnknownChain(chain_id))?;
        let latest = self.substrate.get_latest(chain_id).ok_or(ServiceError::UnknownChain(chain_id))?;
        Ok(ChainStatus {
            chain_id,
            latest_index: latest.index,
            root_hash: chain.handle.collection().root_label(),
        })
    }
}
