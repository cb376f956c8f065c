//! The DARC-backed ledger view and contract verifier registry shared by
//! block assembly and block verification.

mod registry;
mod verifier;
mod view;

pub use registry::VerifierRegistry;
pub use verifier::{base_checks, ContractVerifier, DarcContractVerifier, GenericVerifier};
pub use view::{darc_key, LedgerSnapshot};
