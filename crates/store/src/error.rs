use omniledger_collection::CollectionError;
use thiserror::Error;

/// Failures from the persistent projection of a Collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket file error: {0}")]
    Sled(#[from] sled::Error),

    #[error("transaction error: {0}")]
    Transaction(#[from] sled::transaction::TransactionError<sled::Error>),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("bucket file has a value with no matching kind entry")]
    MissingKind,

    #[error("kind entry is not valid utf-8")]
    InvalidKind,

    #[error("store is corrupt: post-scan root does not match the last committed root")]
    Corrupt,
}
