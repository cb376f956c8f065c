//! Standalone node bootstrap: configuration loading, logging
//! initialization, and wiring a [`Service`](omniledger_service::Service) to
//! an in-process substrate for dev/standalone use (spec §6 "Configuration";
//! §1 Non-goals excludes real multi-node gossip transport).

mod bootstrap;
mod config;
mod error;
mod logging;

pub use bootstrap::{build_service, DEFAULT_VALUE_KIND};
pub use config::{GenesisParams, LoggingConfig, NodeConfig};
pub use error::ConfigError;
pub use logging::init as init_logging;
