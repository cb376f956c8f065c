//! Domain-separated signing messages.
//!
//! Every signable message type gets a distinct domain tag prefix so a
//! signature produced for one request shape can never be replayed as a
//! different one (spec §4.2, "Canonicalize `R`... sign/verify").

use crate::{DarcId, Hash};

/// Domain tag for a transaction authorization request.
pub const DOMAIN_TX_REQUEST: &[u8] = b"omniledger-tx-request";

/// Domain tag for the genesis-transaction authorization request.
pub const DOMAIN_GENESIS_REQUEST: &[u8] = b"omniledger-genesis-request";

/// The canonical message a client signs to authorize a transaction.
///
/// Format: `tag || darc_id || action || message_hash`, matching spec §4.2's
/// `Request{DarcID, Action, Message}` canonicalization.
pub fn tx_request_message(darc_id: DarcId, action: &str, message: &[u8]) -> Vec<u8> {
    build_request_message(DOMAIN_TX_REQUEST, darc_id, action, message)
}

/// The canonical message a client signs to authorize the genesis transaction
/// under the well-known `add-genesis` action (spec §6, "Well-known identifiers").
pub fn genesis_request_message(darc_id: DarcId, message: &[u8]) -> Vec<u8> {
    build_request_message(DOMAIN_GENESIS_REQUEST, darc_id, crate::ACTION_ADD_GENESIS, message)
}

fn build_request_message(tag: &[u8], darc_id: DarcId, action: &str, message: &[u8]) -> Vec<u8> {
    let message_hash = Hash::from_bytes(message);
    let mut buf = Vec::with_capacity(tag.len() + 32 + action.len() + 32);
    buf.extend_from_slice(tag);
    buf.extend_from_slice(darc_id.as_bytes());
    buf.extend_from_slice(action.as_bytes());
    buf.extend_from_slice(message_hash.as_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let darc = DarcId::from_hash(Hash::from_bytes(b"darc"));
        let a = tx_request_message(darc, "update", b"payload");
        let b = tx_request_message(darc, "update", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn domains_do_not_collide() {
        let darc = DarcId::from_hash(Hash::from_bytes(b"darc"));
        let tx = tx_request_message(darc, "add-genesis", b"payload");
        let genesis = genesis_request_message(darc, b"payload");
        assert_ne!(tx, genesis);
    }

    #[test]
    fn action_is_domain_separated() {
        let darc = DarcId::from_hash(Hash::from_bytes(b"darc"));
        let a = tx_request_message(darc, "update", b"payload");
        let b = tx_request_message(darc, "remove", b"payload");
        assert_ne!(a, b);
    }
}
