//! Placeholder strategy module
//!
//! Provides the strategies that turn an applied annotation into the text
//! written in its place.

pub mod placeholder;
pub mod redaction;

use crate::anonymization::models::Annotation;

/// Trait for placeholder strategy implementations
///
/// A strategy instance is scoped to a single text so counters restart per text.
pub trait Anonymizer: Send {
    /// Placeholder for an applied annotation
    fn anonymize(&mut self, annotation: &Annotation) -> String;
}
