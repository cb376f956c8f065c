//! The unit of mutation accepted by the ledger.

use crate::{signing, DarcId, Hash, Key, Kind, PublicKey, Signature};
use sbor::prelude::*;

/// How a transaction modifies the Collection (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, BasicSbor)]
pub enum Action {
    /// Insert a new key-value association. Fails if the key is present.
    Create,
    /// Change the value of an existing key. Fails if the key is absent.
    Update,
    /// Delete an existing key-value association. Fails if the key is absent.
    Remove,
}

impl Action {
    /// The DARC rule name this action resolves to (spec §4.2 step 2).
    pub fn rule_name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Remove => "remove",
        }
    }
}

/// `(Action, Key, Kind, Value, Signature, Valid?)` from spec §3.
///
/// `valid` starts `false` and is assigned by the block assembler's contract
/// verifier (§4.4 step 3); every node re-derives it independently during
/// verification rather than trusting the leader's assignment (§4.5 step 3,
/// §9 "the `Valid` flag's authority").
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Transaction {
    pub action: Action,
    pub key: Key,
    pub kind: Kind,
    pub value: Vec<u8>,
    pub signer: PublicKey,
    pub signature: Signature,
    pub valid: bool,
}

impl Transaction {
    /// Build an unsigned transaction body.
    pub fn new(action: Action, key: Key, kind: Kind, value: Vec<u8>) -> UnsignedTransaction {
        UnsignedTransaction {
            action,
            key,
            kind,
            value,
        }
    }

    /// The message that was (or must be) signed to authorize this
    /// transaction: domain tag, governing DARC, action name, and a hash of
    /// the key/kind/value body (spec §3, "Signature... canonicalization of
    /// `Request`").
    pub fn signing_message(&self) -> Vec<u8> {
        signing::tx_request_message(self.key.darc_id(), self.action.rule_name(), &self.body())
    }

    /// Check the cryptographic signature alone, independent of DARC
    /// authorization (spec §4.2 step 1).
    pub fn signature_is_valid(&self) -> bool {
        self.signer.verify(&self.signing_message(), &self.signature)
    }

    /// The message a genesis transaction is signed over: the same body as
    /// [`Self::signing_message`], but domain-separated under the well-known
    /// `add-genesis` action rather than this transaction's own action (spec
    /// §4.7, "`GenesisTx` is signed by `GenesisDarc` under the well-known
    /// `add-genesis` action").
    pub fn genesis_signing_message(&self, darc_id: DarcId) -> Vec<u8> {
        signing::genesis_request_message(darc_id, &self.body())
    }

    /// Content hash used for deterministic salted-order sorting (spec §4.4,
    /// "salt = XOR over `H(tx_i)`"). Computed over the signed body and
    /// signature, excluding the leader-assigned `valid` flag, since ordering
    /// happens before any verifier has run.
    pub fn content_hash(&self) -> Hash {
        Hash::from_parts(&[
            &[self.action as u8],
            &self.key.to_bytes(),
            self.kind.as_str().as_bytes(),
            &self.value,
            self.signer.as_bytes(),
            self.signature.as_bytes(),
        ])
    }

    fn body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.key.name().len() + self.kind.as_str().len() + self.value.len());
        buf.extend_from_slice(self.key.name());
        buf.extend_from_slice(self.kind.as_str().as_bytes());
        buf.extend_from_slice(&self.value);
        buf
    }
}

/// An unsigned transaction body, produced by a client before it is signed.
pub struct UnsignedTransaction {
    action: Action,
    key: Key,
    kind: Kind,
    value: Vec<u8>,
}

impl UnsignedTransaction {
    /// Attach a signer and signature, producing a submittable transaction.
    /// The caller is responsible for having signed `signing_message()` of
    /// the resulting transaction; this is checked lazily by
    /// [`Transaction::signature_is_valid`].
    pub fn signed(self, signer: PublicKey, signature: Signature) -> Transaction {
        Transaction {
            action: self.action,
            key: self.key,
            kind: self.kind,
            value: self.value,
            signer,
            signature,
            valid: false,
        }
    }
}
