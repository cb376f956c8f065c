//! `CreateGenesis` (spec §4.7): validate the caller's first transaction
//! against the genesis DARC's `add-genesis` rule, then materialize the
//! three-transaction genesis block (darc-install, the user's transaction,
//! a `"genesis"` marker pointing at its key).

use crate::error::ServiceError;
use omniledger_darc::{resolve, Darc, DarcResolver, Outcome};
use omniledger_store::CollectionStore;
use omniledger_types::{
    Action, BlockIndex, ChainId, Data, DarcId, Hash, Key, Kind, Roster, Skipblock, Transaction,
    ACTION_ADD_GENESIS, KIND_GENESIS_MARKER,
};

/// A stand-in resolver exposing only the genesis DARC itself: at genesis
/// time nothing has been written to the chain yet, so the usual
/// `LedgerSnapshot`-backed resolver has nothing to resolve against.
struct OnlyGenesisDarc<'a>(&'a Darc);

impl DarcResolver for OnlyGenesisDarc<'_> {
    fn get(&self, id: DarcId) -> Option<Darc> {
        (id == self.0.id()).then(|| self.0.clone())
    }
}

/// A chain's identity is derived from its genesis DARC and roster, sidestepping
/// the circularity of a genesis block's `chain_id` depending on its own hash
/// (spec GLOSSARY, "Chain / Skipchain... identity is the chain's genesis
/// block hash" is approximated here since the real hash would need to
/// reference a still-unbuilt chain_id field).
pub fn chain_id_for(genesis_darc: &Darc, roster: &Roster) -> ChainId {
    let mut buf = Vec::with_capacity(32 + roster.len() * 32);
    buf.extend_from_slice(genesis_darc.id().as_bytes());
    for member in roster.members() {
        buf.extend_from_slice(member.as_bytes());
    }
    ChainId::from_hash(Hash::from_bytes(&buf))
}

/// Validate that `genesis_tx` is signed by a key with a path to the genesis
/// DARC's `add-genesis` rule (spec §4.7).
pub fn authorize_genesis_tx(genesis_darc: &Darc, genesis_tx: &Transaction) -> Result<(), ServiceError> {
    if genesis_tx.signature.as_bytes() == &[0u8; 64] {
        return Err(ServiceError::NoSignatures);
    }
    let message = genesis_tx.genesis_signing_message(genesis_darc.id());
    if !genesis_tx.signer.verify(&message, &genesis_tx.signature) {
        tracing::warn!(darc = %genesis_darc.id(), "genesis transaction signature does not verify");
        return Err(ServiceError::VerifyFailed);
    }
    let resolver = OnlyGenesisDarc(genesis_darc);
    match resolve(&resolver, genesis_darc.id(), ACTION_ADD_GENESIS, genesis_tx.signer) {
        Outcome::Found => Ok(()),
        other => {
            tracing::warn!(darc = %genesis_darc.id(), ?other, "genesis signer has no add-genesis path");
            Err(ServiceError::VerifyFailed)
        }
    }
}

/// Materialize the genesis state into a freshly opened store and build the
/// genesis skipblock. The three genesis transactions are written directly
/// (not through a `ContractVerifier`) since they are trusted by
/// construction — the same convention `Verifier::accept` relies on when it
/// accepts a genesis block unconditionally (spec §4.5 step 1).
pub fn build_genesis_block(
    store: &mut CollectionStore,
    chain_id: ChainId,
    roster: Roster,
    genesis_darc: &Darc,
    genesis_tx: &Transaction,
) -> Result<Skipblock, ServiceError> {
    let darc_bytes = sbor::basic_encode(genesis_darc).expect("darc serialization should never fail");
    let install = Transaction {
        action: Action::Create,
        key: omniledger_core::darc_key(genesis_darc.id()),
        kind: Kind::new(Kind::DARC),
        value: darc_bytes,
        signer: genesis_tx.signer,
        signature: genesis_tx.signature.clone(),
        valid: true,
    };
    store.store(&install)?;

    let mut user_tx = genesis_tx.clone();
    user_tx.valid = true;
    store.store(&user_tx)?;

    let marker = Transaction {
        action: Action::Create,
        key: Key::genesis_marker(genesis_darc.id()),
        kind: Kind::new(KIND_GENESIS_MARKER),
        value: genesis_tx.key.to_bytes(),
        signer: genesis_tx.signer,
        signature: genesis_tx.signature.clone(),
        valid: true,
    };
    store.store(&marker)?;

    Ok(Skipblock {
        chain_id,
        index: BlockIndex::GENESIS,
        parent: Hash::ZERO,
        roster,
        data: Data::new(store.root_hash(), 0, vec![install, user_tx, marker]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniledger_darc::{Rule, Subject};
    use omniledger_types::KeyPair;

    fn genesis_darc_and_tx() -> (Darc, Transaction, KeyPair) {
        let owner = KeyPair::from_seed(&[1u8; 32]);
        let darc = Darc::genesis(
            vec![Rule::new(ACTION_ADD_GENESIS, vec![Subject::Key(owner.public_key())])],
            "root",
        );
        let unsigned = Transaction::new(Action::Create, Key::new(darc.id(), b"greet".to_vec()), Kind::new("v1"), b"hello".to_vec());
        let probe = Transaction {
            action: Action::Create,
            key: Key::new(darc.id(), b"greet".to_vec()),
            kind: Kind::new("v1"),
            value: b"hello".to_vec(),
            signer: owner.public_key(),
            signature: owner.sign(b"x"),
            valid: false,
        };
        let msg = probe.genesis_signing_message(darc.id());
        let tx = unsigned.signed(owner.public_key(), owner.sign(&msg));
        (darc, tx, owner)
    }

    #[test]
    fn properly_signed_genesis_tx_authorizes() {
        let (darc, tx, _owner) = genesis_darc_and_tx();
        assert!(authorize_genesis_tx(&darc, &tx).is_ok());
    }

    #[test]
    fn wrong_action_rule_is_rejected() {
        let owner = KeyPair::from_seed(&[2u8; 32]);
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(owner.public_key())])], "root");
        let unsigned = Transaction::new(Action::Create, Key::new(darc.id(), b"greet".to_vec()), Kind::new("v1"), b"hello".to_vec());
        let probe = Transaction {
            action: Action::Create,
            key: Key::new(darc.id(), b"greet".to_vec()),
            kind: Kind::new("v1"),
            value: b"hello".to_vec(),
            signer: owner.public_key(),
            signature: owner.sign(b"x"),
            valid: false,
        };
        let msg = probe.genesis_signing_message(darc.id());
        let tx = unsigned.signed(owner.public_key(), owner.sign(&msg));
        assert!(authorize_genesis_tx(&darc, &tx).is_err());
    }

    #[test]
    fn build_genesis_block_writes_three_records() {
        let (darc, tx, _owner) = genesis_darc_and_tx();
        let dir = tempfile::tempdir().unwrap();
        let mut store = CollectionStore::open(dir.path()).unwrap();
        let chain_id = chain_id_for(&darc, &Roster::new(vec![]));
        let block = build_genesis_block(&mut store, chain_id, Roster::new(vec![]), &darc, &tx).unwrap();

        assert!(store.get_value_kind(&omniledger_core::darc_key(darc.id()).to_bytes()).is_some());
        assert!(store.get_value_kind(&tx.key.to_bytes()).is_some());
        assert!(store.get_value_kind(&Key::genesis_marker(darc.id()).to_bytes()).is_some());
        assert_eq!(block.data.merkle_root, store.root_hash());
        assert!(block.is_genesis());
        assert_eq!(block.data.transactions.len(), 3);
        assert!(block.data.transactions.iter().all(|tx| tx.valid));
    }
}
