//! Engine and audit configuration

use crate::anonymization::models::EntityCategory;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// Replace with [TAG-n] tokens, numbered per distinct value
    #[default]
    Numbered,
    /// Replace with bare [TAG] tokens
    Redact,
}

/// Rule-based engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Groups disabled for every text, on top of per-request settings
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Placeholder style
    #[serde(default)]
    pub strategy: PlaceholderStyle,

    /// Path to pattern library TOML file (built-in library when unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Largest text accepted, in bytes
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

fn default_max_text_bytes() -> usize {
    1024 * 1024
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            strategy: PlaceholderStyle::default(),
            pattern_library: None,
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        for group in &self.disabled {
            if EntityCategory::from_group(group).is_none() {
                anyhow::bail!("Unknown category group in engine.disabled: {group}");
            }
        }

        if self.max_text_bytes == 0 {
            anyhow::bail!("engine.max_text_bytes must be > 0");
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DEID_ENGINE_DISABLED") {
            self.disabled = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(val) = std::env::var("DEID_ENGINE_STRATEGY") {
            self.strategy = match val.to_lowercase().as_str() {
                "numbered" => PlaceholderStyle::Numbered,
                "redact" => PlaceholderStyle::Redact,
                _ => anyhow::bail!("Invalid DEID_ENGINE_STRATEGY: {}", val),
            };
        }

        if let Ok(val) = std::env::var("DEID_ENGINE_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("DEID_ENGINE_MAX_TEXT_BYTES") {
            self.max_text_bytes = val
                .parse()
                .context("Invalid DEID_ENGINE_MAX_TEXT_BYTES value")?;
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/deidentification.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path must be set when auditing is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DEID_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid DEID_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("DEID_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("DEID_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid DEID_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
