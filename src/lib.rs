// deid - Clinical Note De-identification Service
// Copyright (c) 2025 Deid Contributors
// Licensed under the MIT License

//! # deid - Clinical Note De-identification
//!
//! deid replaces identifying spans in free-text clinical notes (patient
//! names, dates, ages, phone numbers, e-mail addresses, URLs, BSN numbers and
//! postal codes) with category placeholders such as `[PATIENT]` and `[DATUM-1]`.
//!
//! ## Overview
//!
//! Two entry points share one engine:
//! - **File mode** reads a tab-delimited file of notes and writes de-identified
//!   text line by line
//! - **HTTP mode** exposes single and bulk JSON endpoints
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - File-mode batch processing
//! - [`server`] - axum HTTP surface
//! - [`anonymization`] - Engine boundary, detectors, placeholders and audit
//! - [`domain`] - Records, JSON envelopes and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deid::anonymization::{adapter::Deidentifier, config::EngineConfig, RuleBasedEngine};
//! use deid::domain::ClinicalRecord;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RuleBasedEngine::new(EngineConfig::default())?;
//! let deidentifier = Deidentifier::new(Arc::new(engine));
//!
//! let line = "H1\tN1\tBrief\tJan\tJ.\tJansen\tJANSEN\t\tJan Jansen is op 20 maart 2021 gezien.";
//! let record = ClinicalRecord::parse_line(line)?;
//! let result = deidentifier.deidentify_record(record)?;
//!
//! assert_eq!(result.text, "[PATIENT] is op [DATUM-1] gezien.");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! deid uses the [`domain::DeidError`] type for all errors; `anyhow` appears
//! only at the edges (CLI commands, engine construction).

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
