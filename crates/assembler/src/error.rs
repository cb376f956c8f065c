use thiserror::Error;

/// Failures from building or submitting a block. Per spec §7, a
/// `transient-substrate-error` here means the epoch is skipped and the
/// pending batch retained — callers decide that retry policy, not this enum.
#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error(transparent)]
    Store(#[from] omniledger_store::StoreError),

    #[error(transparent)]
    Substrate(#[from] omniledger_substrate::SubstrateError),

    #[error("the assembler worker for this chain has already stopped")]
    WorkerGone,
}
