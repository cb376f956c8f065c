use omniledger_types::{ChainId, KeyError};
use thiserror::Error;

use crate::CURRENT_VERSION;

/// The union of every failure the RPC surface can return (spec §6,
/// "Exit / error codes"). Everything local (store, collection, merkle) maps
/// onto a fatal-for-the-chain variant; malformed requests map onto a
/// client-facing variant with nothing persisted (spec §7).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("version mismatch: client sent {client}, server runs {server}")]
    VersionMismatch { client: u32, server: u32 },

    #[error("unknown chain: {0}")]
    UnknownChain(ChainId),

    #[error("a skipchain already exists for this genesis darc and roster")]
    DuplicateKey,

    #[error(transparent)]
    IncorrectKeyLength(#[from] KeyError),

    #[error("a darc-kind record's key must carry an empty name")]
    KeyNotDarcId,

    #[error("transaction carries no signature")]
    NoSignatures,

    #[error("genesis transaction did not verify under the genesis darc's add-genesis rule")]
    VerifyFailed,

    #[error("nothing stored under that key")]
    NothingStored,

    #[error("merkle root mismatch")]
    MerkleMismatch,

    #[error(transparent)]
    Store(#[from] omniledger_store::StoreError),

    #[error(transparent)]
    Assembler(#[from] omniledger_assembler::AssemblerError),

    #[error(transparent)]
    Substrate(#[from] omniledger_substrate::SubstrateError),
}

impl ServiceError {
    /// Build the version check every RPC handler performs first (spec §4.7,
    /// "Ping / service version negotiation").
    pub fn check_version(client: u32) -> Result<(), ServiceError> {
        if client != CURRENT_VERSION {
            return Err(ServiceError::VersionMismatch {
                client,
                server: CURRENT_VERSION,
            });
        }
        Ok(())
    }
}
