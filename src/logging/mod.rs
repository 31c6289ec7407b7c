//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Console output on stderr
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use deid::logging::init_logging;
//! use deid::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a file-mode run
///
/// # Example
///
/// ```no_run
/// use deid::log_batch_start;
///
/// log_batch_start!("notes.tsv");
/// ```
#[macro_export]
macro_rules! log_batch_start {
    ($source:expr) => {
        tracing::info!(source = %$source, "Starting de-identification batch");
    };
}

/// Log the completion of a file-mode run
///
/// # Example
///
/// ```no_run
/// use deid::log_batch_complete;
/// use std::time::Duration;
///
/// log_batch_complete!(120, 2, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($processed:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            processed = $processed,
            failed = $failed,
            duration_ms = $duration.as_millis(),
            "De-identification batch completed"
        );
    };
}

/// Log a line that could not be de-identified
///
/// # Example
///
/// ```no_run
/// use deid::log_record_failure;
///
/// log_record_failure!(17, "Malformed record: expected 9 tab-separated fields, found 3");
/// ```
#[macro_export]
macro_rules! log_record_failure {
    ($line:expr, $error:expr) => {
        tracing::error!(line = $line, error = %$error, "Failed to de-identify line");
    };
}
