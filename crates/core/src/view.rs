//! A read-only view over a Collection snapshot, doubling as a DARC resolver.

use omniledger_collection::Collection;
use omniledger_darc::{Darc, DarcResolver};
use omniledger_types::{DarcId, Key, Kind};

/// The key a DARC with identity `id` is stored under: its own ID as the
/// DARC key's prefix, with an empty name (spec §3, "A DARC's ID is its
/// content hash at version 0"; the record lives at the instance it governs).
pub fn darc_key(id: DarcId) -> Key {
    Key::new(id, Vec::new())
}

/// A snapshot of the Collection as seen by a verifier: reads only, no
/// mutation (spec §4.4 step 3, "`verifier(collection, tx)`").
pub struct LedgerSnapshot<'a> {
    collection: &'a Collection,
}

impl<'a> LedgerSnapshot<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self { collection }
    }

    /// The underlying Collection.
    pub fn collection(&self) -> &Collection {
        self.collection
    }
}

impl<'a> DarcResolver for LedgerSnapshot<'a> {
    fn get(&self, id: DarcId) -> Option<Darc> {
        let (bytes, kind) = self.collection.get(&darc_key(id).to_bytes())?;
        if kind != Kind::DARC {
            return None;
        }
        sbor::basic_decode(&bytes).ok()
    }
}
