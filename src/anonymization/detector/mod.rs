//! Entity detection module
//!
//! Provides the detector interface and the implementations used by
//! [`RuleBasedEngine`](crate::anonymization::engine::RuleBasedEngine).

pub mod patient;
pub mod patterns;
pub mod regex;

use crate::anonymization::models::{Annotation, AnnotationRequest};
use anyhow::Result;

/// Trait for detector implementations
///
/// Detectors report candidate spans only; overlap resolution and substitution
/// happen in the engine.
pub trait Detector: Send + Sync {
    /// Find candidate spans in the request text
    fn detect(&self, request: &AnnotationRequest) -> Result<Vec<Annotation>>;
}
