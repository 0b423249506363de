//! Node configuration for the Californiacoin node.
//!
//! [`NodeConfig`] has sensible defaults and can be layered from an optional
//! TOML file and `CALI_*` environment variables with [`NodeConfig::load`].
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cali_core::constants::NetworkType;
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `CALI_CHECKPOINTS=false`.
pub const ENV_PREFIX: &str = "CALI";

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "cali.toml";

/// Configuration for a node instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Network to run on. Decided once at startup.
    pub network_type: NetworkType,
    /// Administrative checkpoint switch. When off, every checkpoint query
    /// degrades to "no opinion".
    pub checkpoints: bool,
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "debug", "cali_consensus=trace").
    pub log_level: String,
    /// Log output format: "text" or "json".
    pub log_format: String,
    /// Seconds between sync status reports.
    pub status_interval_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("californiacoin");

        Self {
            network_type: NetworkType::default(),
            checkpoints: true,
            data_dir,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            status_interval_secs: 30,
        }
    }
}

impl NodeConfig {
    /// Load configuration: defaults, then `file` if it exists, then
    /// `CALI_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Per-network data directory.
    pub fn network_dir(&self) -> PathBuf {
        self.data_dir.join(self.network_type.data_dir_suffix())
    }

    /// Default location of the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    /// Interval between sync status reports. Never zero.
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }
}
