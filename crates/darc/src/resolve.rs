//! Delegation-path resolution (spec §4.2 steps 2-3).

use crate::darc::{Darc, Subject, USER_RULE};
use omniledger_types::{DarcId, PublicKey};
use std::collections::HashSet;

/// Supplies DARCs by ID, backed by whatever store holds the `"darc"`-kind
/// records of the Collection (spec §3, "A DARC... materialized by a
/// create-darc transaction").
pub trait DarcResolver {
    fn get(&self, id: DarcId) -> Option<Darc>;
}

/// Why a path search could not even be attempted, as opposed to simply
/// finding no path (spec §9, "distinguish three outcomes: found, absent,
/// malformed").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    NoSuchDarc(DarcId),
    NoSuchRule { darc: DarcId, action: String },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::NoSuchDarc(id) => write!(f, "no such darc: {id}"),
            MalformedReason::NoSuchRule { darc, action } => {
                write!(f, "darc {darc} has no rule for action {action:?}")
            }
        }
    }
}

/// The result of searching for a path from a rule to a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A cycle-free delegation path to `signer` exists.
    Found,
    /// The rule (and every DARC it delegates to) was resolved, but no path
    /// to `signer` exists.
    Absent,
    /// A referenced DARC or rule does not exist.
    Malformed(MalformedReason),
}

/// Depth-first search for `signer` among the subjects of `root`'s rule
/// named `action`, following delegation edges. A visited-set keyed by
/// DARC-ID prevents infinite recursion on cyclic references (spec §9,
/// "Cyclic DARC references").
pub fn resolve<R: DarcResolver>(resolver: &R, root: DarcId, action: &str, signer: PublicKey) -> Outcome {
    let mut visited = HashSet::new();
    search(resolver, root, action, signer, &mut visited)
}

fn search<R: DarcResolver>(
    resolver: &R,
    darc_id: DarcId,
    action: &str,
    signer: PublicKey,
    visited: &mut HashSet<DarcId>,
) -> Outcome {
    if !visited.insert(darc_id) {
        return Outcome::Absent;
    }
    let Some(darc) = resolver.get(darc_id) else {
        return Outcome::Malformed(MalformedReason::NoSuchDarc(darc_id));
    };
    let Some(rule) = darc.find_rule(action) else {
        return Outcome::Malformed(MalformedReason::NoSuchRule {
            darc: darc_id,
            action: action.to_string(),
        });
    };
    for subject in rule.subjects() {
        match subject {
            Subject::Key(pk) if *pk == signer => return Outcome::Found,
            Subject::Key(_) => continue,
            Subject::Delegation(sub_id) => {
                if let Outcome::Found = search(resolver, *sub_id, USER_RULE, signer, visited) {
                    return Outcome::Found;
                }
            }
        }
    }
    Outcome::Absent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darc::Rule;
    use omniledger_types::KeyPair;
    use std::collections::HashMap;

    struct MapResolver(HashMap<DarcId, Darc>);

    impl DarcResolver for MapResolver {
        fn get(&self, id: DarcId) -> Option<Darc> {
            self.0.get(&id).cloned()
        }
    }

    #[test]
    fn direct_key_is_found() {
        let owner = KeyPair::from_seed(&[1u8; 32]).public_key();
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(owner)])], "root");
        let mut map = HashMap::new();
        map.insert(darc.id(), darc.clone());
        let resolver = MapResolver(map);
        assert_eq!(resolve(&resolver, darc.id(), "create", owner), Outcome::Found);
    }

    #[test]
    fn unrelated_key_is_absent() {
        let owner = KeyPair::from_seed(&[1u8; 32]).public_key();
        let stranger = KeyPair::from_seed(&[2u8; 32]).public_key();
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(owner)])], "root");
        let mut map = HashMap::new();
        map.insert(darc.id(), darc.clone());
        let resolver = MapResolver(map);
        assert_eq!(resolve(&resolver, darc.id(), "create", stranger), Outcome::Absent);
    }

    #[test]
    fn delegation_chain_is_followed() {
        let leaf_key = KeyPair::from_seed(&[3u8; 32]).public_key();
        let child = Darc::genesis(vec![Rule::new(USER_RULE, vec![Subject::Key(leaf_key)])], "child");
        let parent = Darc::genesis(
            vec![Rule::new("update", vec![Subject::Delegation(child.id())])],
            "parent",
        );
        let mut map = HashMap::new();
        map.insert(child.id(), child.clone());
        map.insert(parent.id(), parent.clone());
        let resolver = MapResolver(map);
        assert_eq!(resolve(&resolver, parent.id(), "update", leaf_key), Outcome::Found);
    }

    #[test]
    fn cyclic_delegation_terminates_as_absent() {
        // Two DARCs delegating to each other's `user` rule, never reaching
        // any leaf key: the search must terminate rather than loop forever.
        // Resolution is keyed by the resolver's map key, not by the stored
        // Darc's own content-hash id, so two arbitrary ids suffice to form
        // a loop.
        let stranger = KeyPair::from_seed(&[9u8; 32]).public_key();
        let id_a = DarcId::from_hash(omniledger_types::Hash::from_bytes(b"A"));
        let id_b = DarcId::from_hash(omniledger_types::Hash::from_bytes(b"B"));
        let darc_a = Darc::genesis(vec![Rule::new(USER_RULE, vec![Subject::Delegation(id_b)])], "a");
        let darc_b = Darc::genesis(vec![Rule::new(USER_RULE, vec![Subject::Delegation(id_a)])], "b");
        let mut map = HashMap::new();
        map.insert(id_a, darc_a);
        map.insert(id_b, darc_b);
        let resolver = MapResolver(map);
        assert_eq!(resolve(&resolver, id_a, USER_RULE, stranger), Outcome::Absent);
    }

    #[test]
    fn missing_darc_is_malformed() {
        let owner = KeyPair::from_seed(&[1u8; 32]).public_key();
        let resolver = MapResolver(HashMap::new());
        let bogus = DarcId::from_hash(omniledger_types::Hash::from_bytes(b"nowhere"));
        assert_eq!(
            resolve(&resolver, bogus, "create", owner),
            Outcome::Malformed(MalformedReason::NoSuchDarc(bogus))
        );
    }

    #[test]
    fn missing_rule_is_malformed() {
        let owner = KeyPair::from_seed(&[1u8; 32]).public_key();
        let darc = Darc::genesis(vec![Rule::new("create", vec![Subject::Key(owner)])], "root");
        let mut map = HashMap::new();
        map.insert(darc.id(), darc.clone());
        let resolver = MapResolver(map);
        assert_eq!(
            resolve(&resolver, darc.id(), "remove", owner),
            Outcome::Malformed(MalformedReason::NoSuchRule {
                darc: darc.id(),
                action: "remove".to_string()
            })
        );
    }
}
