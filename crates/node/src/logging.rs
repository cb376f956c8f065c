//! `tracing` + `tracing-subscriber` (env-filter) initialization, the same
//! combination the teacher's `production`/`simulator` crates use.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber driven by `config.filter`,
/// overridable at runtime via the `RUST_LOG` environment variable.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
