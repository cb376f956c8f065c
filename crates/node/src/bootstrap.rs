//! Wires a [`NodeConfig`] into a running [`Service`]: the substrate, the
//! contract verifier registry, and the bucket directory each chain's
//! `CollectionStore` lives under.

use crate::config::NodeConfig;
use omniledger_assembler::AssemblerConfig;
use omniledger_core::{GenericVerifier, VerifierRegistry};
use omniledger_service::{Service, ServiceConfig};
use omniledger_substrate::{LocalSubstrate, SkipchainSubstrate};
use std::sync::Arc;

/// The default kind tag for plain value records, registered out of the box
/// so the end-to-end scenarios of spec.md §8 run against a freshly started
/// node without extra setup. Operators extend the registry with additional
/// kinds before constructing [`Service`] for anything beyond that.
pub const DEFAULT_VALUE_KIND: &str = "v1";

/// Build a [`Service`] bound to an in-process [`LocalSubstrate`] (spec §6,
/// "An in-memory, single-process implementation... sufficient to drive the
/// end-to-end scenarios... without implementing real multi-node
/// consensus"). Real multi-node gossip/consensus transport is out of scope
/// for this crate (spec §1 Non-goals).
pub fn build_service(config: &NodeConfig) -> Service {
    std::fs::create_dir_all(&config.bucket_file_path).ok();

    let substrate: Arc<dyn SkipchainSubstrate> = Arc::new(LocalSubstrate::new());
    let mut registry = VerifierRegistry::new();
    registry.register(DEFAULT_VALUE_KIND, Arc::new(GenericVerifier));

    let service_config = ServiceConfig {
        bucket_dir: config.bucket_file_path.clone().into(),
        assembler: AssemblerConfig { epoch: config.epoch() },
        propagation_timeout: config.propagation_timeout(),
    };

    Service::new(service_config, substrate, Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniledger_darc::{Darc, Rule, Subject};
    use omniledger_test_helpers::{seeded_keypair, signed_genesis_transaction};
    use omniledger_types::{Action, Key, Roster, ACTION_ADD_GENESIS};

    #[tokio::test]
    async fn built_service_can_run_create_genesis_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            bucket_file_path: dir.path().display().to_string(),
            ..NodeConfig::default()
        };
        let service = build_service(&config);

        let owner = seeded_keypair(1);
        let darc = Darc::genesis(
            vec![Rule::new(ACTION_ADD_GENESIS, vec![Subject::Key(owner.public_key())])],
            "root",
        );
        let key = Key::new(darc.id(), b"greet".to_vec());
        let tx = signed_genesis_transaction(&owner, darc.id(), Action::Create, key.clone(), DEFAULT_VALUE_KIND, b"hello");

        let block = service
            .create_genesis(omniledger_service::CURRENT_VERSION, Roster::new(vec![]), darc, tx)
            .unwrap();
        assert!(block.is_genesis());
    }
}
