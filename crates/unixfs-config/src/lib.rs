//! # unixfs-config
//!
//! Configuration for the UnixFS node codec.
//!
//! Values are resolved in order:
//! 1. Built-in defaults
//! 2. A TOML file supplied by the caller (`Config::load_from`)
//! 3. Environment variables (highest priority)
//!
//! There is no process-wide config instance; callers own the `Config` value
//! and pass the pieces they need to the codec.

pub mod logging;
pub mod testing;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use logging::{init_logging, init_test_logging, LogLevel};

/// Hash function id for murmur3-x64-64, the default HAMT hash
pub const HASH_MURMUR3_X64_64: u64 = 0x22;

/// Default HAMT fanout (entries per shard)
pub const DEFAULT_SHARD_FANOUT: u64 = 256;

pub const ENV_SHARD_FANOUT: &str = "UNIXFS_SHARD_FANOUT";
pub const ENV_SHARD_HASH_TYPE: &str = "UNIXFS_SHARD_HASH_TYPE";
pub const ENV_LOG_LEVEL: &str = "UNIXFS_LOG_LEVEL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shard: ShardConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (environment-shaped).
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(fanout) = lookup(ENV_SHARD_FANOUT) {
            self.shard.fanout = parse_u64(ENV_SHARD_FANOUT, &fanout)?;
        }
        if let Some(hash_type) = lookup(ENV_SHARD_HASH_TYPE) {
            self.shard.hash_type = parse_u64(ENV_SHARD_HASH_TYPE, &hash_type)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level.parse()?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        self.shard.validate()
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

/// Accepts decimal or `0x`-prefixed hex.
fn parse_u64(key: &str, value: &str) -> Result<u64> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| ConfigError::Invalid(format!("{key}: `{value}` is not an unsigned integer")))
}

/// Parameters written into HAMT shard headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardConfig {
    /// Entries per shard; must be a non-zero power of two
    pub fanout: u64,
    /// Multicodec id of the hash function used to place entries
    pub hash_type: u64,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            fanout: DEFAULT_SHARD_FANOUT,
            hash_type: HASH_MURMUR3_X64_64,
        }
    }
}

impl ShardConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fanout.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "shard fanout must be a power of two, got {}",
                self.fanout
            )));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
