//! TOML configuration for the msig tooling.

use std::{
    fs, io,
    num::NonZero,
    path::{Path, PathBuf},
};

use alloy_primitives::{address, Address};
use msig_collector::{CollectorError, OwnerConfig};
use msig_common::logging::{FileLoggingConfig, LogRotation, LoggerConfig};
use msig_crypto::EntryPointContext;
use msig_gas::{GasBoundEstimator, GasMultipliers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical EntryPoint v0.6 deployment address.
pub const DEFAULT_ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

/// Default value for `file_prefix` in [`LoggingConfig`].
const DEFAULT_LOG_FILE_PREFIX: &str = "msig";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("account threshold must be at least 1")]
    ZeroThreshold,

    #[error("invalid owner set: {0}")]
    Owners(#[source] CollectorError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub account: AccountConfig,

    #[serde(default)]
    pub gas: GasMultipliers,

    pub entry_point: EntryPointConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Owner set of the threshold account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub owners: Vec<Address>,
    pub threshold: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointConfig {
    #[serde(default = "default_entry_point")]
    pub address: Address,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON instead of compact lines.
    #[serde(default)]
    pub json: bool,

    /// Also write logs to rotating files in this directory.
    pub log_dir: Option<PathBuf>,

    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,

    #[serde(default)]
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            log_dir: None,
            file_prefix: default_log_file_prefix(),
            rotation: LogRotation::default(),
        }
    }
}

fn default_entry_point() -> Address {
    DEFAULT_ENTRY_POINT
}

fn default_log_file_prefix() -> String {
    DEFAULT_LOG_FILE_PREFIX.to_string()
}

impl Config {
    /// Reads, parses and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the owner set and threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.owner_config().map(|_| ())
    }

    pub fn owner_config(&self) -> Result<OwnerConfig, ConfigError> {
        let threshold = NonZero::new(self.account.threshold).ok_or(ConfigError::ZeroThreshold)?;
        OwnerConfig::try_new(self.account.owners.clone(), threshold).map_err(ConfigError::Owners)
    }

    pub fn entry_point_context(&self) -> EntryPointContext {
        EntryPointContext::new(self.entry_point.address, self.entry_point.chain_id)
    }

    pub fn gas_estimator(&self) -> GasBoundEstimator {
        GasBoundEstimator::new(self.gas)
    }

    /// Builds the logger configuration for a service.
    pub fn logger_config(&self, service_name: &str) -> LoggerConfig {
        let mut config =
            LoggerConfig::new(service_name.to_string()).with_json_logging(self.logging.json);
        if let Some(dir) = &self.logging.log_dir {
            config = config.with_file_logging(
                FileLoggingConfig::new(dir.clone(), self.logging.file_prefix.clone())
                    .with_rotation(self.logging.rotation.into())
                    .with_json_format(self.logging.json),
            );
        }
        config
    }
}
