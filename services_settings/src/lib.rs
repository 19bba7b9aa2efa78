//! # Settings
//!
//! Typed configuration for a file-system instance.
//!
//! ## Philosophy
//!
//! - **Typed settings**: every knob is a typed field, not a string lookup
//! - **Defaults baked in**: an empty document yields the built-in defaults
//! - **Validated up front**: an engine is never built from a config that
//!   would break its invariants
//! - **Deterministic**: settings are serializable and reproducible
//!
//! ## Example
//!
//! ```
//! use services_settings::FsConfig;
//!
//! let config = FsConfig::from_json(r#"{ "block_size": 16 }"#).unwrap();
//! assert_eq!(config.block_size, 16);
//! assert_eq!(config.max_descriptors, FsConfig::DEFAULT_MAX_DESCRIPTORS);
//! ```

use serde::{Deserialize, Serialize};
use services_logger::LogLevel;
use thiserror::Error;

/// Errors produced while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the engine cannot work with
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Settings for one file-system instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Bytes per storage block; also the longest allowed symlink target
    pub block_size: usize,
    /// Capacity of the descriptor table, root included
    pub max_descriptors: usize,
    /// Longest allowed single path segment, in bytes
    pub max_filename_length: usize,
    /// Symlink hops allowed during one path resolution
    pub max_symlink_hops: usize,
    /// Entries retained by the engine's event log
    pub log_capacity: usize,
    /// Lowest level recorded by the engine's event log
    pub log_level: LogLevel,
}

impl FsConfig {
    pub const DEFAULT_BLOCK_SIZE: usize = 64;
    pub const DEFAULT_MAX_DESCRIPTORS: usize = 128;
    pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 32;
    pub const DEFAULT_MAX_SYMLINK_HOPS: usize = 32;
    pub const DEFAULT_LOG_CAPACITY: usize = 256;

    /// Parses settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes settings to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every field is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(invalid("block_size", "must be at least 1 byte"));
        }
        if self.max_descriptors == 0 {
            return Err(invalid(
                "max_descriptors",
                "must leave room for the root directory",
            ));
        }
        if self.max_filename_length == 0 {
            return Err(invalid("max_filename_length", "must be at least 1 byte"));
        }
        if self.max_symlink_hops == 0 {
            return Err(invalid("max_symlink_hops", "must allow at least one hop"));
        }
        Ok(())
    }

    /// Returns a copy with a different block size
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Returns a copy with a different descriptor table capacity
    pub fn with_max_descriptors(mut self, max_descriptors: usize) -> Self {
        self.max_descriptors = max_descriptors;
        self
    }

    /// Returns a copy with a different filename limit
    pub fn with_max_filename_length(mut self, max_filename_length: usize) -> Self {
        self.max_filename_length = max_filename_length;
        self
    }

    /// Returns a copy with a different symlink hop limit
    pub fn with_max_symlink_hops(mut self, max_symlink_hops: usize) -> Self {
        self.max_symlink_hops = max_symlink_hops;
        self
    }
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            block_size: Self::DEFAULT_BLOCK_SIZE,
            max_descriptors: Self::DEFAULT_MAX_DESCRIPTORS,
            max_filename_length: Self::DEFAULT_MAX_FILENAME_LENGTH,
            max_symlink_hops: Self::DEFAULT_MAX_SYMLINK_HOPS,
            log_capacity: Self::DEFAULT_LOG_CAPACITY,
            log_level: LogLevel::Debug,
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
