//! Node configuration: a TOML file (`serde` + `toml`) with CLI overrides,
//! following the same builder-struct convention as the teacher's
//! `ProvisionConfig`/`SimulatorConfig`, extended with file loading since
//! this is a standalone node rather than an in-process simulation
//! (spec §6 "Configuration").

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Genesis block parameters passed through to the skipchain substrate.
/// The substrate's own height-management scheme is out of scope for this
/// crate (spec §1 Non-goals, "on-disk layout of the skipchain log"); the
/// node still needs to carry these values because `CreateGenesisBlock`'s
/// configuration surface names them (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisParams {
    pub max_height: u32,
    pub base_height: u32,
}

impl Default for GenesisParams {
    fn default() -> Self {
        Self { max_height: 10, base_height: 10 }
    }
}

/// Logging configuration: an `EnvFilter` directive string, the same
/// mechanism the teacher's `production`/`simulator` binaries use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

/// The file-loadable shape of a node's configuration. Durations are stored
/// in seconds for a human-editable TOML file and converted to
/// `std::time::Duration` by [`NodeConfig::epoch`] / [`NodeConfig::propagation_timeout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Epoch length in seconds (spec §6, default 5s).
    pub epoch_secs: u64,
    /// Propagation timeout in seconds (spec §6, default 10s).
    pub propagation_timeout_secs: u64,
    /// Directory holding each chain's bucket file (spec §6 `bucket_file_path`).
    pub bucket_file_path: String,
    #[serde(flatten)]
    pub genesis: GenesisParams,
    pub logging: LoggingConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            epoch_secs: 5,
            propagation_timeout_secs: 10,
            bucket_file_path: "./omniledger-data".to_string(),
            genesis: GenesisParams::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load a config from a TOML file, falling back to defaults for any
    /// field the file omits.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn epoch(&self) -> Duration {
        Duration::from_secs(self.epoch_secs)
    }

    pub fn propagation_timeout(&self) -> Duration {
        Duration::from_secs(self.propagation_timeout_secs)
    }

    /// Apply CLI overrides (`clap`, derive API), which take precedence over
    /// whatever the TOML file specified.
    pub fn with_overrides(mut self, epoch_secs: Option<u64>, bucket_file_path: Option<String>, log_filter: Option<String>) -> Self {
        if let Some(secs) = epoch_secs {
            self.epoch_secs = secs;
        }
        if let Some(path) = bucket_file_path {
            self.bucket_file_path = path;
        }
        if let Some(filter) = log_filter {
            self.logging.filter = filter;
        }
        self
    }
}
