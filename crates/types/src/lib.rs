//! Core data types shared by every OmniLedger crate: hashes, keys, identity,
//! transactions, and block payloads.

mod block;
mod crypto;
mod hash;
mod identifiers;
mod key;
mod signing;
mod transaction;

pub use block::{Data, Roster, Skipblock};
pub use crypto::{KeyPair, PublicKey, Signature};
pub use hash::{Hash, HashError};
pub use identifiers::{BlockIndex, ChainId, DarcId, Kind};
pub use key::{Key, KeyError};
pub use signing::{genesis_request_message, tx_request_message, DOMAIN_GENESIS_REQUEST, DOMAIN_TX_REQUEST};
pub use transaction::{Action, Transaction, UnsignedTransaction};

/// Literal well-known genesis-action name (spec §6).
pub const ACTION_ADD_GENESIS: &str = "add-genesis";

/// Kind tag for the genesis marker record planted by `CreateGenesis` (spec
/// §4.7, "a `genesis` marker pointing at its key"; spec §6, "Genesis-
/// transaction key = literal bytes `\"genesis\"`").
pub const KIND_GENESIS_MARKER: &str = "genesis";
