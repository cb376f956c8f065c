//! Kind → verifier dispatch (spec §9, "Dynamic contract dispatch... thread
//! the registry through the service struct").

use crate::verifier::{ContractVerifier, DarcContractVerifier};
use omniledger_types::Kind;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a transaction's `kind` tag to the verifier that knows how to judge
/// it. The `"darc"` kind is always present; callers register any additional
/// kinds their deployment accepts.
pub struct VerifierRegistry {
    verifiers: HashMap<String, Arc<dyn ContractVerifier>>,
}

impl VerifierRegistry {
    /// A registry carrying only the built-in `"darc"` verifier.
    pub fn new() -> Self {
        let mut registry = Self { verifiers: HashMap::new() };
        registry.register(Kind::DARC, Arc::new(DarcContractVerifier));
        registry
    }

    /// Register (or replace) the verifier for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, verifier: Arc<dyn ContractVerifier>) {
        self.verifiers.insert(kind.into(), verifier);
    }

    /// Look up the verifier for `kind`. `None` means the kind is unknown and
    /// any transaction carrying it is dropped (spec §4.4 step 3, "unknown
    /// kind").
    pub fn get(&self, kind: &Kind) -> Option<&Arc<dyn ContractVerifier>> {
        self.verifiers.get(kind.as_str())
    }
}

impl Default for VerifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::GenericVerifier;

    #[test]
    fn darc_kind_is_registered_by_default() {
        let registry = VerifierRegistry::new();
        assert!(registry.get(&Kind::new("darc")).is_some());
    }

    #[test]
    fn unregistered_kind_is_absent() {
        let registry = VerifierRegistry::new();
        assert!(registry.get(&Kind::new("v1")).is_none());
    }

    #[test]
    fn a_kind_can_be_registered_and_found() {
        let mut registry = VerifierRegistry::new();
        registry.register("v1", Arc::new(GenericVerifier));
        assert!(registry.get(&Kind::new("v1")).is_some());
    }
}
