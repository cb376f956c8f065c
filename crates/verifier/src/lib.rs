//! Block-level acceptance (spec §4.5): independent re-verification of every
//! transaction's validity, merkle recomputation, and catch-up replay when a
//! node's locally known tip lags an incoming block's parent.

mod accept;
mod error;
mod state;

pub use accept::{commit_block, verify_block};
pub use error::VerifierError;
pub use state::{Verifier, VerifierHandle};
