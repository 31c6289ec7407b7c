//! Configuration schema types
//!
//! This module defines the configuration structure for deid. Every section
//! has defaults, so an empty file (or no file at all) is a valid configuration.

use crate::anonymization::config::{AuditConfig, EngineConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main deid configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeidConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Annotation engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// File mode settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DeidConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.engine.validate().map_err(|e| e.to_string())?;
        self.server.validate()?;
        self.audit.validate().map_err(|e| e.to_string())?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// What to do when a line in file mode fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log the failure, emit nothing for the line and continue
    #[default]
    Skip,
    /// Stop at the first failing line
    Abort,
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("Invalid on_error '{other}'. Must be one of: skip, abort")),
        }
    }
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Shape of each output line in file mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The de-identified text only
    #[default]
    Text,
    /// The nine input columns plus the de-identified text
    Appended,
    /// One JSON object per line
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "appended" => Ok(Self::Appended),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(format!(
                "Invalid output_format '{other}'. Must be one of: text, appended, jsonl"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Appended => write!(f, "appended"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// File mode configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Partial-failure policy
    #[serde(default)]
    pub on_error: OnError,

    /// Output line format
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Largest number of texts accepted in one bulk request
    #[serde(default = "default_max_bulk_texts")]
    pub max_bulk_texts: usize,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "Invalid server.bind_address '{}'. Expected host:port",
                self.bind_address
            ));
        }

        if self.max_bulk_texts == 0 {
            return Err("server.max_bulk_texts must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_bulk_texts: default_max_bulk_texts(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_bulk_texts() -> usize {
    1000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeidConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.batch.on_error, OnError::Skip);
        assert_eq!(config.batch.output_format, OutputFormat::Text);
        assert!(!config.audit.enabled);
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: DeidConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.server.max_bulk_texts, 1000);
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.bind_address = "not-an-address".to_string();
        assert!(config.validate().is_err());

        config.bind_address = "0.0.0.0:8080".to_string();
        config.max_bulk_texts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_on_error_and_format_parsing() {
        assert_eq!("ABORT".parse::<OnError>().unwrap(), OnError::Abort);
        assert!("retry".parse::<OnError>().is_err());
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::Appended.to_string(), "appended");
    }

    #[test]
    fn test_batch_section_parsing() {
        let config: DeidConfig = toml::from_str(
            r#"
[batch]
on_error = "abort"
output_format = "appended"
"#,
        )
        .unwrap();
        assert_eq!(config.batch.on_error, OnError::Abort);
        assert_eq!(config.batch.output_format, OutputFormat::Appended);
    }
}
