//! Configuration management for deid.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! deid uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DEID_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`EngineConfig`] - Default disabled groups, pattern library, placeholder style
//! - [`BatchConfig`] - File mode failure policy and output format
//! - [`ServerConfig`] - Bind address and bulk limit
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [engine]
//! disabled = ["ages"]
//!
//! [batch]
//! on_error = "skip"
//! output_format = "text"
//!
//! [server]
//! bind_address = "127.0.0.1:5000"
//!
//! [audit]
//! enabled = true
//! log_path = "${DEID_AUDIT_DIR}/deidentification.log"
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use deid::config::load_config;
//!
//! # fn example() {
//! match load_config("deid.toml") {
//!     Ok(config) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::anonymization::config::{AuditConfig, EngineConfig, PlaceholderStyle};
pub use loader::{load_config, load_default_config};
pub use schema::{
    ApplicationConfig, BatchConfig, DeidConfig, LoggingConfig, OnError, OutputFormat,
    ServerConfig,
};
