//! File-mode batch processing
//!
//! - [`BatchProcessor`] - reads records line by line and writes de-identified output
//! - [`BatchSummary`] - counts and failed lines of a run

pub mod processor;
pub mod summary;

pub use processor::BatchProcessor;
pub use summary::{BatchSummary, LineFailure};
