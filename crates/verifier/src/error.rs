use thiserror::Error;

/// Failures from block-level acceptance (spec §4.5).
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("block's parent is unknown locally and the substrate has no history to catch up from")]
    CannotCatchUp,

    #[error("a transaction's recomputed validity does not match the block's recorded flag")]
    ValidityMismatch,

    #[error("recomputed merkle root does not match the block's recorded root")]
    MerkleMismatch,

    #[error(transparent)]
    Store(#[from] omniledger_store::StoreError),
}
