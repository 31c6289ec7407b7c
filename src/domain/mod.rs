//! Domain models and types for deid.
//!
//! The domain layer provides:
//! - **Records** ([`ClinicalRecord`]) parsed from tab-delimited input lines
//! - **JSON envelopes** ([`DeidentifyPayload`], [`BulkDeidentifyPayload`]) for the HTTP surface
//! - **Error types** ([`DeidError`], [`MalformedRecordError`], [`EngineError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible domain operations return [`Result<T, DeidError>`]:
//!
//! ```rust
//! use deid::domain::{ClinicalRecord, Result};
//!
//! fn example(line: &str) -> Result<String> {
//!     // MalformedRecordError converts into DeidError with ?
//!     let record = ClinicalRecord::parse_line(line)?;
//!     Ok(record.note_id().to_string())
//! }
//! ```

pub mod errors;
pub mod payload;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DeidError, EngineError, MalformedRecordError};
pub use payload::{
    BulkDeidentifyPayload, BulkDeidentifyResponse, DeidentifyPayload, DeidentifyResponse,
};
pub use record::{ClinicalRecord, RECORD_FIELD_COUNT};
pub use result::Result;
