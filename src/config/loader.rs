//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DeidConfig;
use crate::domain::errors::DeidError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DeidConfig
/// 4. Applies environment variable overrides (DEID_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use deid::config::loader::load_config;
///
/// let config = load_config("deid.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DeidConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DeidError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DeidError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: DeidConfig = toml::from_str(&contents)
        .map_err(|e| DeidError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(&mut config)?;
    Ok(config)
}

/// Default configuration with environment overrides applied
///
/// Used when no configuration file is given.
pub fn load_default_config() -> Result<DeidConfig> {
    let mut config = DeidConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut DeidConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        DeidError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DeidError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(DeidError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using DEID_* prefix
///
/// Environment variables follow the pattern: DEID_<SECTION>_<KEY>
/// For example: DEID_SERVER_BIND_ADDRESS, DEID_BATCH_ON_ERROR
fn apply_env_overrides(config: &mut DeidConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("DEID_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Engine and audit overrides
    config
        .engine
        .apply_env_overrides()
        .map_err(|e| DeidError::Configuration(e.to_string()))?;
    config
        .audit
        .apply_env_overrides()
        .map_err(|e| DeidError::Configuration(e.to_string()))?;

    // Batch overrides
    if let Ok(val) = std::env::var("DEID_BATCH_ON_ERROR") {
        config.batch.on_error = val.parse().map_err(DeidError::Configuration)?;
    }
    if let Ok(val) = std::env::var("DEID_BATCH_OUTPUT_FORMAT") {
        config.batch.output_format = val.parse().map_err(DeidError::Configuration)?;
    }

    // Server overrides
    if let Ok(val) = std::env::var("DEID_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Ok(val) = std::env::var("DEID_SERVER_MAX_BULK_TEXTS") {
        config.server.max_bulk_texts = val.parse().map_err(|e| {
            DeidError::Configuration(format!("Invalid DEID_SERVER_MAX_BULK_TEXTS '{val}': {e}"))
        })?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("DEID_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().map_err(|e| {
            DeidError::Configuration(format!("Invalid DEID_LOGGING_LOCAL_ENABLED '{val}': {e}"))
        })?;
    }
    if let Ok(val) = std::env::var("DEID_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("DEID_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
