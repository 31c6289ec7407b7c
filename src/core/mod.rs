//! Core business logic for deid.
//!
//! # Modules
//!
//! - [`batch`] - File-mode processing of tab-delimited notes
//!
//! # File Workflow
//!
//! 1. **Read**: one line at a time from the input file
//! 2. **Parse**: split into a nine-column [`ClinicalRecord`](crate::domain::ClinicalRecord)
//! 3. **De-identify**: run the engine over the note text with the patient's name variants
//! 4. **Write**: one output line per record, in input order
//! 5. **Report**: a [`BatchSummary`](batch::BatchSummary) with failed lines
//!
//! # Example
//!
//! ```rust,no_run
//! use deid::anonymization::{adapter::Deidentifier, config::EngineConfig, RuleBasedEngine};
//! use deid::core::batch::BatchProcessor;
//! use std::io::{BufReader, stdout};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RuleBasedEngine::new(EngineConfig::default())?;
//! let processor = BatchProcessor::new(Deidentifier::new(Arc::new(engine)));
//!
//! let input = BufReader::new(std::fs::File::open("notes.tsv")?);
//! let summary = processor.process(input, stdout().lock())?;
//!
//! println!("Processed: {}", summary.processed);
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod batch;
