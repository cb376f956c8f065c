//! Contract verifiers: kind-specific state-transition functions.
//!
//! Every kind's verifier enforces the two invariants common to all
//! transactions (DARC authorization, existence precondition) before any
//! kind-specific check (spec §4.4 "Authorization check (inside verifier)",
//! §3 invariant 2).

use crate::view::LedgerSnapshot;
use omniledger_darc::{authorize, Authorization};
use omniledger_types::{Action, Transaction};

/// A state-transition function selected by a transaction's `kind` (spec
/// §9, "Dynamic contract dispatch").
pub trait ContractVerifier: Send + Sync {
    /// Decide whether `tx` is authorized and applicable against `view`.
    fn verify(&self, view: &LedgerSnapshot<'_>, tx: &Transaction) -> bool;
}

/// Checks common to every kind: the signer's DARC path and the
/// create/update/remove existence precondition.
pub fn base_checks(view: &LedgerSnapshot<'_>, tx: &Transaction) -> bool {
    is_authorized(view, tx) && precondition_holds(view, tx)
}

fn is_authorized(view: &LedgerSnapshot<'_>, tx: &Transaction) -> bool {
    let message = tx.signing_message();
    let outcome = authorize(view, tx.key.darc_id(), tx.action.rule_name(), tx.signer, &message, &tx.signature);
    if !matches!(outcome, Authorization::Authorized) {
        tracing::debug!(darc = %tx.key.darc_id(), action = tx.action.rule_name(), ?outcome, "transaction denied");
    }
    matches!(outcome, Authorization::Authorized)
}

fn precondition_holds(view: &LedgerSnapshot<'_>, tx: &Transaction) -> bool {
    let present = view.collection().contains(&tx.key.to_bytes());
    let ok = match tx.action {
        Action::Create => !present,
        Action::Update | Action::Remove => present,
    };
    if !ok {
        tracing::debug!(key = %tx.key.darc_id(), action = tx.action.rule_name(), present, "precondition failed");
    }
    ok
}

/// The verifier for ordinary (non-DARC) kinds: the base checks are the
/// whole of it.
pub struct GenericVerifier;

impl ContractVerifier for GenericVerifier {
    fn verify(&self, view: &LedgerSnapshot<'_>, tx: &Transaction) -> bool {
        base_checks(view, tx)
    }
}

/// The verifier for the well-known `"darc"` kind: additionally requires the
/// value decode as a `Darc` whose content-hash id matches the key it is
/// being installed under (spec §3 invariant 4).
pub struct DarcContractVerifier;

impl ContractVerifier for DarcContractVerifier {
    fn verify(&self, view: &LedgerSnapshot<'_>, tx: &Transaction) -> bool {
        if !base_checks(view, tx) {
            return false;
        }
        match sbor::basic_decode::<omniledger_darc::Darc>(&tx.value) {
            Ok(darc) => darc.id() == tx.key.darc_id() && tx.key.name().is_empty(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::darc_key;
    use omniledger_collection::Collection;
    use omniledger_darc::{Darc, Rule, Subject};
    use omniledger_types::{Key, Kind, KeyPair};

    #[test]
    fn generic_verifier_accepts_authorized_create() {
        let kp = KeyPair::from_seed(&[7u8; 32]);
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(kp.public_key())])], "root");
        let collection = Collection::new()
            .add(
                &darc_key(darc.id()).to_bytes(),
                sbor::basic_encode(&darc).unwrap(),
                Kind::DARC,
            )
            .unwrap();
        let key = Key::new(darc.id(), b"greet".to_vec());
        let unsigned = Transaction::new(Action::Create, key, Kind::new("v1"), b"hello".to_vec());
        let msg_probe = Transaction {
            action: Action::Create,
            key: Key::new(darc.id(), b"greet".to_vec()),
            kind: Kind::new("v1"),
            value: b"hello".to_vec(),
            signer: kp.public_key(),
            signature: kp.sign(b"x"),
            valid: false,
        }
        .signing_message();
        let tx = unsigned.signed(kp.public_key(), kp.sign(&msg_probe));

        let view = LedgerSnapshot::new(&collection);
        assert!(GenericVerifier.verify(&view, &tx));
    }

    #[test]
    fn generic_verifier_rejects_unauthorized_signer() {
        let owner = KeyPair::from_seed(&[7u8; 32]);
        let stranger = KeyPair::from_seed(&[8u8; 32]);
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(owner.public_key())])], "root");
        let collection = Collection::new()
            .add(
                &darc_key(darc.id()).to_bytes(),
                sbor::basic_encode(&darc).unwrap(),
                Kind::DARC,
            )
            .unwrap();
        let key = Key::new(darc.id(), b"greet".to_vec());
        let unsigned = Transaction::new(Action::Create, key.clone(), Kind::new("v1"), b"hello".to_vec());
        let msg = Transaction {
            action: Action::Create,
            key,
            kind: Kind::new("v1"),
            value: b"hello".to_vec(),
            signer: stranger.public_key(),
            signature: stranger.sign(b"x"),
            valid: false,
        }
        .signing_message();
        let tx = unsigned.signed(stranger.public_key(), stranger.sign(&msg));

        let view = LedgerSnapshot::new(&collection);
        assert!(!GenericVerifier.verify(&view, &tx));
    }

    #[test]
    fn duplicate_create_fails_precondition() {
        let kp = KeyPair::from_seed(&[7u8; 32]);
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(kp.public_key())])], "root");
        let key = Key::new(darc.id(), b"greet".to_vec());
        let collection = Collection::new()
            .add(&darc_key(darc.id()).to_bytes(), sbor::basic_encode(&darc).unwrap(), Kind::DARC)
            .unwrap()
            .add(&key.to_bytes(), b"hello".to_vec(), "v1")
            .unwrap();
        let unsigned = Transaction::new(Action::Create, key.clone(), Kind::new("v1"), b"hello2".to_vec());
        let msg = Transaction {
            action: Action::Create,
            key,
            kind: Kind::new("v1"),
            value: b"hello2".to_vec(),
            signer: kp.public_key(),
            signature: kp.sign(b"x"),
            valid: false,
        }
        .signing_message();
        let tx = unsigned.signed(kp.public_key(), kp.sign(&msg));

        let view = LedgerSnapshot::new(&collection);
        assert!(!GenericVerifier.verify(&view, &tx));
    }

    #[test]
    fn darc_verifier_rejects_id_mismatch() {
        let kp = KeyPair::from_seed(&[7u8; 32]);
        let master = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(kp.public_key())])], "root");
        let other = Darc::genesis(vec![Rule::new("create", vec![])], "other");
        let collection = Collection::new()
            .add(&darc_key(master.id()).to_bytes(), sbor::basic_encode(&master).unwrap(), Kind::DARC)
            .unwrap();
        // Attempt to install `other`'s bytes under `master`'s key.
        let key = darc_key(master.id());
        let unsigned = Transaction::new(Action::Update, key.clone(), Kind::DARC.into(), sbor::basic_encode(&other).unwrap());
        let msg = Transaction {
            action: Action::Update,
            key,
            kind: Kind::DARC.into(),
            value: sbor::basic_encode(&other).unwrap(),
            signer: kp.public_key(),
            signature: kp.sign(b"x"),
            valid: false,
        }
        .signing_message();
        let tx = unsigned.signed(kp.public_key(), kp.sign(&msg));

        let view = LedgerSnapshot::new(&collection);
        assert!(!DarcContractVerifier.verify(&view, &tx));
    }
}
