//! DARC structure: rules, subjects, content-hash identity.

use omniledger_types::{DarcId, Hash, PublicKey};
use sbor::prelude::*;

/// A leaf public key or a delegation to another DARC's `user` rule (spec
/// §3, "A `Subject` is either a leaf public key or a reference to another
/// DARC").
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub enum Subject {
    Key(PublicKey),
    Delegation(DarcId),
}

/// `(Action, Subjects[])`: who may perform a named action (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Rule {
    action: String,
    subjects: Vec<Subject>,
}

impl Rule {
    /// Build a rule for `action` authorizing `subjects`.
    pub fn new(action: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            action: action.into(),
            subjects,
        }
    }

    /// The action name this rule governs.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The authorized subjects.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }
}

/// The fixed rule name a delegation recurses into on the delegate DARC,
/// regardless of the action being authorized on the delegating DARC.
pub const USER_RULE: &str = "user";

/// `(ID, Version, Rules[], Description)` (spec §3).
///
/// Immutable in this core: DARC versioning is future work (spec §9, "DARC
/// versioning").
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Darc {
    id: DarcId,
    version: u64,
    rules: Vec<Rule>,
    description: String,
}

impl Darc {
    /// Build the version-0 DARC; its ID is the content hash of its rules
    /// and description (spec §3, "A DARC's ID is its content hash at
    /// version 0").
    pub fn genesis(rules: Vec<Rule>, description: impl Into<String>) -> Self {
        let description = description.into();
        let id = DarcId::from_hash(content_hash(0, &rules, &description));
        Self {
            id,
            version: 0,
            rules,
            description,
        }
    }

    /// The DARC's identity.
    pub fn id(&self) -> DarcId {
        self.id
    }

    /// The version, always 0 in this core.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The rule named `action`, if any.
    pub fn find_rule(&self, action: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.action() == action)
    }
}

fn content_hash(version: u64, rules: &[Rule], description: &str) -> Hash {
    let mut buf = Vec::new();
    buf.extend_from_slice(&version.to_be_bytes());
    for rule in rules {
        buf.extend_from_slice(&(rule.action().len() as u32).to_be_bytes());
        buf.extend_from_slice(rule.action().as_bytes());
        buf.extend_from_slice(&(rule.subjects().len() as u32).to_be_bytes());
        for subject in rule.subjects() {
            match subject {
                Subject::Key(pk) => {
                    buf.push(0);
                    buf.extend_from_slice(pk.as_bytes());
                }
                Subject::Delegation(id) => {
                    buf.push(1);
                    buf.extend_from_slice(id.as_bytes());
                }
            }
        }
    }
    buf.extend_from_slice(&(description.len() as u32).to_be_bytes());
    buf.extend_from_slice(description.as_bytes());
    Hash::from_bytes(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniledger_types::KeyPair;

    #[test]
    fn genesis_id_is_deterministic() {
        let key = KeyPair::from_seed(&[1u8; 32]).public_key();
        let rules = vec![Rule::new("create", vec![Subject::Key(key)])];
        let a = Darc::genesis(rules.clone(), "owner");
        let b = Darc::genesis(rules, "owner");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn different_description_changes_id() {
        let key = KeyPair::from_seed(&[1u8; 32]).public_key();
        let rules = vec![Rule::new("create", vec![Subject::Key(key)])];
        let a = Darc::genesis(rules.clone(), "owner");
        let b = Darc::genesis(rules, "different owner");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn find_rule_looks_up_by_action() {
        let key = KeyPair::from_seed(&[1u8; 32]).public_key();
        let darc = Darc::genesis(vec![Rule::new("update", vec![Subject::Key(key)])], "owner");
        assert!(darc.find_rule("update").is_some());
        assert!(darc.find_rule("remove").is_none());
    }
}
