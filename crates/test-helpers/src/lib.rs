//! Properly-signed DARC and transaction fixtures for crypto testing, the
//! same role `hyperscale-test-helpers` plays for its own crate family:
//! every other crate in this workspace hand-rolls a `signed()` helper in
//! its own `#[cfg(test)]` module (see `omniledger-assembler`'s
//! `build.rs`/`worker.rs`, `omniledger-verifier`'s `accept.rs`/`state.rs`,
//! `omniledger-service`'s `lib.rs`/`genesis.rs`); this crate factors the
//! same construction out for integration tests that live outside any
//! single crate and need it without repeating the boilerplate.

use omniledger_darc::{Darc, Rule, Subject};
use omniledger_types::{
    Action, ChainId, DarcId, Hash, Key, Kind, KeyPair, PublicKey, Transaction, ACTION_ADD_GENESIS,
};

/// A deterministic key pair derived from a small integer, for fixtures that
/// need stable identities across test runs.
pub fn seeded_keypair(seed: u8) -> KeyPair {
    KeyPair::from_seed(&[seed; 32])
}

/// A genesis DARC whose `create`/`update`/`remove`/`add-genesis` rules are
/// all owned by a single key, named by `description`.
pub fn single_owner_darc(owner: PublicKey, description: impl Into<String>) -> Darc {
    Darc::genesis(
        vec![
            Rule::new(ACTION_ADD_GENESIS, vec![Subject::Key(owner)]),
            Rule::new(Action::Create.rule_name(), vec![Subject::Key(owner)]),
            Rule::new(Action::Update.rule_name(), vec![Subject::Key(owner)]),
            Rule::new(Action::Remove.rule_name(), vec![Subject::Key(owner)]),
        ],
        description,
    )
}

/// A DARC that delegates every rule to another DARC's `user` rule, for
/// exercising the delegation path (spec §4.2 step 3).
pub fn delegating_darc(delegate: DarcId, description: impl Into<String>) -> Darc {
    Darc::genesis(
        vec![
            Rule::new(ACTION_ADD_GENESIS, vec![Subject::Delegation(delegate)]),
            Rule::new(Action::Create.rule_name(), vec![Subject::Delegation(delegate)]),
            Rule::new(Action::Update.rule_name(), vec![Subject::Delegation(delegate)]),
            Rule::new(Action::Remove.rule_name(), vec![Subject::Delegation(delegate)]),
        ],
        description,
    )
}

/// Build and sign an ordinary (non-genesis) transaction, as a real client
/// would: construct the unsigned body, sign its canonical message, attach
/// signer and signature.
pub fn signed_transaction(kp: &KeyPair, action: Action, key: Key, kind: &str, value: &[u8]) -> Transaction {
    let unsigned = Transaction::new(action, key.clone(), Kind::new(kind), value.to_vec());
    let probe = Transaction {
        action,
        key,
        kind: Kind::new(kind),
        value: value.to_vec(),
        signer: kp.public_key(),
        signature: kp.sign(b"placeholder"),
        valid: false,
    };
    let message = probe.signing_message();
    unsigned.signed(kp.public_key(), kp.sign(&message))
}

/// Build and sign a transaction under the well-known `add-genesis` action
/// (spec §4.7, `CreateGenesis`'s `GenesisTx`).
pub fn signed_genesis_transaction(kp: &KeyPair, darc_id: DarcId, action: Action, key: Key, kind: &str, value: &[u8]) -> Transaction {
    let unsigned = Transaction::new(action, key.clone(), Kind::new(kind), value.to_vec());
    let probe = Transaction {
        action,
        key,
        kind: Kind::new(kind),
        value: value.to_vec(),
        signer: kp.public_key(),
        signature: kp.sign(b"placeholder"),
        valid: false,
    };
    let message = probe.genesis_signing_message(darc_id);
    unsigned.signed(kp.public_key(), kp.sign(&message))
}

/// An arbitrary but deterministic chain id, for tests that need a `ChainId`
/// without running a full `CreateGenesis` flow.
pub fn fixture_chain_id(label: &str) -> ChainId {
    ChainId::from_hash(Hash::from_bytes(label.as_bytes()))
}
