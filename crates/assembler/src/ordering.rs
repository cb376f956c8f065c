//! Deterministic salted-hash transaction ordering (spec §4.4 "Ordering"),
//! grounded in the original service's `sortTransactions` /
//! `xorTransactions` / `sortWithSalt`: salt = XOR over every pending
//! transaction's content hash, then sort by `H(salt || tx)`. Unpredictable
//! to clients ahead of time, yet reproducible bit-for-bit at every node.

use omniledger_types::{Hash, Transaction};

pub fn order(mut batch: Vec<Transaction>) -> Vec<Transaction> {
    if batch.len() < 2 {
        return batch;
    }
    let salt = salt_of(&batch);
    let mut keyed: Vec<(Hash, Transaction)> = batch
        .drain(..)
        .map(|tx| {
            let key = Hash::from_parts(&[salt.as_bytes(), tx.content_hash().as_bytes()]);
            (key, tx)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.into_iter().map(|(_, tx)| tx).collect()
}

fn salt_of(batch: &[Transaction]) -> Hash {
    let mut salt = Hash::ZERO;
    for tx in batch {
        salt.xor_with(&tx.content_hash());
    }
    salt
}
