//! # Configuration Management
//!
//! Decode limits and logging settings for the codec.
//!
//! The pure `from_bytes` functions use [`LimitsConfig::default`]; the
//! `*_with_limits` variants and the streaming codecs take an explicit
//! configuration so a deployment can tighten what it accepts from peers.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`

use crate::error::{constants, ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Default cap on entries in a single tag message.
pub const MAX_TAG_ENTRIES: usize = 128;

/// Default cap on the encoded size of a single tag message.
pub const MAX_TAG_MESSAGE_SIZE: usize = 16 * 1024;

/// Largest value the 2-byte reason length field can express.
pub const MAX_REASON_LENGTH: usize = u16::MAX as usize;

/// Top-level codec configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Limits applied while decoding untrusted input
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_OPEN))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_READ))
        })?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE))
        })
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("QUIC_WIRE_MAX_TAG_ENTRIES") {
            config.limits.max_tag_entries = parse_env("QUIC_WIRE_MAX_TAG_ENTRIES", &value)?;
        }

        if let Ok(value) = std::env::var("QUIC_WIRE_MAX_REASON_LENGTH") {
            config.limits.max_reason_length = parse_env("QUIC_WIRE_MAX_REASON_LENGTH", &value)?;
        }

        if let Ok(value) = std::env::var("QUIC_WIRE_MAX_TAG_MESSAGE_SIZE") {
            config.limits.max_tag_message_size =
                parse_env("QUIC_WIRE_MAX_TAG_MESSAGE_SIZE", &value)?;
        }

        if let Ok(value) = std::env::var("QUIC_WIRE_LOG_LEVEL") {
            config.logging.log_level = value.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid QUIC_WIRE_LOG_LEVEL: {value}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_SERIALIZE))
        })?;

        std::fs::write(path, content).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_WRITE))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.limits.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_env(key: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|e| ProtocolError::ConfigError(format!("Invalid {key}={value}: {e}")))
}

/// Limits applied while decoding untrusted input
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of entries accepted in one tag message
    pub max_tag_entries: usize,

    /// Maximum reason phrase length accepted in error-bearing frames
    pub max_reason_length: usize,

    /// Maximum encoded size of one tag message (streaming codec only)
    pub max_tag_message_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_tag_entries: MAX_TAG_ENTRIES,
            max_reason_length: MAX_REASON_LENGTH,
            max_tag_message_size: MAX_TAG_MESSAGE_SIZE,
        }
    }
}

impl LimitsConfig {
    /// Validate limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_tag_entries == 0 {
            errors.push("Max tag entries must be greater than 0".to_string());
        } else if self.max_tag_entries > u16::MAX as usize {
            errors.push(format!(
                "Max tag entries too large: {} (wire format maximum: 65535)",
                self.max_tag_entries
            ));
        }

        if self.max_reason_length > MAX_REASON_LENGTH {
            errors.push(format!(
                "Max reason length too large: {} (wire format maximum: 65535)",
                self.max_reason_length
            ));
        }

        // fixed header: name(4) + count(2) + padding(2)
        if self.max_tag_message_size < 8 {
            errors.push("Max tag message size too small (minimum: 8 bytes)".to_string());
        } else if self.max_tag_message_size > 16 * 1024 * 1024 {
            errors.push(format!(
                "Max tag message size too large: {} bytes (maximum recommended: 16 MB)",
                self.max_tag_message_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("quic-wire"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
