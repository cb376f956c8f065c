//! Combined signature + delegation-path authorization (spec §4.2, §3
//! "Signature").

use crate::resolve::{resolve, DarcResolver, Outcome};
use omniledger_types::{DarcId, PublicKey, Signature};

/// The outcome of checking a request against a DARC forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The cryptographic signature checks out and a delegation path exists.
    Authorized,
    /// The cryptographic signature itself does not verify.
    BadSignature,
    /// The signature is fine but no authorization path exists or the forest
    /// is malformed.
    Unauthorized(Outcome),
}

/// Check a request `(darc_id, action, message)` signed by `signer` via
/// `signature` (spec §4.2 steps 1-3).
///
/// Step 1 (crypto check) is evaluated first and short-circuits: an
/// unauthorized forest never needs to be walked if the signature itself is
/// invalid.
pub fn authorize<R: DarcResolver>(
    resolver: &R,
    darc_id: DarcId,
    action: &str,
    signer: PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Authorization {
    if !signer.verify(message, signature) {
        return Authorization::BadSignature;
    }
    match resolve(resolver, darc_id, action, signer) {
        Outcome::Found => Authorization::Authorized,
        other => Authorization::Unauthorized(other),
    }
}
