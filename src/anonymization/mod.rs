//! De-identification engine
//!
//! This module provides detection of identifying spans in clinical text and
//! their replacement with category placeholders.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: patient names from record metadata, plus a regex pattern library
//! - **Resolution**: overlapping candidates reduced to one span per region
//! - **Substitution**: `[TAG-n]` placeholders, numbered per distinct value
//! - **Audit**: per-text log lines with hashed values
//!
//! The rest of the crate talks to [`AnnotationEngine`] through the
//! [`adapter::Deidentifier`], so the engine can be swapped without touching
//! parsing, batching or the HTTP surface.
//!
//! # Usage
//!
//! ```rust
//! use deid::anonymization::{AnnotationEngine, RuleBasedEngine, config::EngineConfig};
//! use deid::anonymization::models::{AnnotationRequest, PatientMetadata};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = RuleBasedEngine::new(EngineConfig::default())?;
//! let request = AnnotationRequest::new("Mevrouw Jong voelt zich weer jong.")
//!     .with_patient(PatientMetadata::new().with_surname("Jong"));
//! let result = engine.annotate(&request)?;
//! assert_eq!(result.text, "Mevrouw [PATIENT] voelt zich weer jong.");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;

// Re-export main types
pub use adapter::{DeidentifiedRecord, Deidentifier};
pub use config::{AuditConfig, EngineConfig};
pub use engine::{AnnotationEngine, RuleBasedEngine};
pub use models::{Annotation, AnnotationRequest, AnnotationResult, EntityCategory};
