//! Annotation engines
//!
//! This module defines the [`AnnotationEngine`] boundary and the
//! [`RuleBasedEngine`] that ships with deid.
//!
//! # Architecture
//!
//! The rule-based engine coordinates:
//! - **Detectors**: patient name variants from metadata, plus the regex pattern library
//! - **Overlap resolution**: earliest start, then longest span, then category priority
//! - **Placeholder strategy**: `[TAG-n]` numbering (or bare `[TAG]` redaction)
//!
//! # Examples
//!
//! ```
//! use deid::anonymization::{AnnotationEngine, RuleBasedEngine, config::EngineConfig};
//! use deid::anonymization::models::AnnotationRequest;
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = RuleBasedEngine::new(EngineConfig::default())?;
//! let result = engine.annotate(&AnnotationRequest::new("20 maart 2021"))?;
//! assert_eq!(result.text, "[DATUM-1]");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::{placeholder::PlaceholderStrategy, redaction::RedactionStrategy, Anonymizer},
    config::{EngineConfig, PlaceholderStyle},
    detector::{patient::PatientNameDetector, patterns::PatternRegistry, regex::RegexDetector, Detector},
    models::{Annotation, AnnotationRequest, AnnotationResult, EntityCategory},
};
use crate::domain::EngineError;
use anyhow::Context;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;

/// De-identification capability
///
/// Given a text, optional patient metadata and a set of disabled category
/// groups, return the text with identifying spans replaced by placeholders.
/// Implementations are shared across requests and must not hold per-request
/// mutable state.
pub trait AnnotationEngine: Send + Sync {
    /// Annotate and substitute a single text
    fn annotate(&self, request: &AnnotationRequest) -> Result<AnnotationResult, EngineError>;

    /// Short engine name for logs and health output
    fn name(&self) -> &'static str;
}

/// Rule-based annotation engine
///
/// Built once at startup; pattern compilation happens in [`new`](Self::new)
/// and the engine is read-only afterwards. Share it through `Arc`.
pub struct RuleBasedEngine {
    config: EngineConfig,
    detectors: Vec<Arc<dyn Detector>>,
}

impl RuleBasedEngine {
    /// Create a new rule-based engine
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - Pattern library file cannot be loaded or compiled
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .context("Invalid engine configuration")?;

        let regex_detector = if let Some(ref pattern_path) = config.pattern_library {
            let registry = PatternRegistry::from_file(pattern_path)?;
            RegexDetector::with_registry(registry)
        } else {
            RegexDetector::new()?
        };

        let detectors: Vec<Arc<dyn Detector>> =
            vec![Arc::new(PatientNameDetector::new()), Arc::new(regex_detector)];

        Ok(Self::with_detectors(config, detectors))
    }

    /// Create an engine from explicit detectors
    pub fn with_detectors(config: EngineConfig, detectors: Vec<Arc<dyn Detector>>) -> Self {
        Self { config, detectors }
    }

    /// Request with the configured default groups added to its disabled set
    fn effective_request<'a>(&self, request: &'a AnnotationRequest) -> Cow<'a, AnnotationRequest> {
        let missing: Vec<&String> = self
            .config
            .disabled
            .iter()
            .filter(|g| !request.disabled.contains(*g))
            .collect();

        if missing.is_empty() {
            return Cow::Borrowed(request);
        }

        let mut owned = request.clone();
        owned.disabled.extend(missing.into_iter().cloned());
        Cow::Owned(owned)
    }

    fn new_anonymizer(&self) -> Box<dyn Anonymizer> {
        match self.config.strategy {
            PlaceholderStyle::Numbered => Box::new(PlaceholderStrategy::new()),
            PlaceholderStyle::Redact => Box::new(RedactionStrategy::new()),
        }
    }
}

impl AnnotationEngine for RuleBasedEngine {
    fn annotate(&self, request: &AnnotationRequest) -> Result<AnnotationResult, EngineError> {
        let start = Instant::now();

        if request.text.len() > self.config.max_text_bytes {
            return Err(EngineError::InvalidInput(format!(
                "text is {} bytes, limit is {}",
                request.text.len(),
                self.config.max_text_bytes
            )));
        }

        let request = self.effective_request(request);

        for group in &request.disabled {
            if EntityCategory::from_group(group).is_none() {
                tracing::warn!(group = %group, "Ignoring unknown disabled category group");
            }
        }

        let mut candidates = Vec::new();
        for detector in &self.detectors {
            let found = detector
                .detect(&request)
                .map_err(|e| EngineError::Internal(format!("{e:#}")))?;
            candidates.extend(found);
        }
        candidates.retain(|a| !request.is_disabled(a.category) && !a.is_empty());

        let selected = resolve_overlaps(candidates);
        let merged = merge_adjacent_patient_spans(&request.text, selected);

        let mut anonymizer = self.new_anonymizer();
        let (text, annotations) = substitute(&request.text, merged, anonymizer.as_mut());

        tracing::debug!(
            annotations = annotations.len(),
            text_bytes = request.text.len(),
            "Annotated text"
        );

        let processing_time = start.elapsed().as_millis() as u64;
        Ok(AnnotationResult::new(text, annotations, processing_time))
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}

/// Keep non-overlapping spans, preferring earlier, then longer, then higher-priority ones
fn resolve_overlaps(mut candidates: Vec<Annotation>) -> Vec<Annotation> {
    candidates.sort_by_key(|a| (a.start, Reverse(a.len()), a.category.priority()));

    let mut selected: Vec<Annotation> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if selected.last().is_some_and(|last| last.overlaps(&candidate)) {
            continue;
        }
        selected.push(candidate);
    }
    selected
}

/// Join patient spans separated only by whitespace ("Jan Jansen" -> one span)
fn merge_adjacent_patient_spans(text: &str, annotations: Vec<Annotation>) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::with_capacity(annotations.len());

    for annotation in annotations {
        if let Some(last) = merged.last_mut() {
            let joinable = last.category == EntityCategory::Patient
                && annotation.category == EntityCategory::Patient
                && text[last.end..annotation.start]
                    .chars()
                    .all(char::is_whitespace);

            if joinable {
                last.end = annotation.end;
                last.text = text[last.start..last.end].to_string();
                continue;
            }
        }
        merged.push(annotation);
    }

    merged
}

/// Replace sorted, non-overlapping spans with their placeholders
fn substitute(
    text: &str,
    annotations: Vec<Annotation>,
    anonymizer: &mut dyn Anonymizer,
) -> (String, Vec<Annotation>) {
    let mut output = String::with_capacity(text.len());
    let mut applied = Vec::with_capacity(annotations.len());
    let mut cursor = 0;

    for mut annotation in annotations {
        let placeholder = anonymizer.anonymize(&annotation);
        output.push_str(&text[cursor..annotation.start]);
        output.push_str(&placeholder);
        cursor = annotation.end;

        annotation.placeholder = Some(placeholder);
        applied.push(annotation);
    }
    output.push_str(&text[cursor..]);

    (output, applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::PatientMetadata;

    fn engine() -> RuleBasedEngine {
        RuleBasedEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_engine_creation() {
        assert!(RuleBasedEngine::new(EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_date_default() {
        let result = engine()
            .annotate(&AnnotationRequest::new("20 maart 2021"))
            .unwrap();
        assert_eq!(result.text, "[DATUM-1]");
        assert_eq!(result.total_annotations(), 1);
    }

    #[test]
    fn test_dates_disabled() {
        let request = AnnotationRequest::new("20 maart 2021").with_disabled(["dates"]);
        let result = engine().annotate(&request).unwrap();
        assert_eq!(result.text, "20 maart 2021");
        assert!(!result.has_annotations());
    }

    #[test]
    fn test_configured_disabled_groups_apply() {
        let config = EngineConfig {
            disabled: vec!["dates".to_string()],
            ..EngineConfig::default()
        };
        let engine = RuleBasedEngine::new(config).unwrap();
        let result = engine.annotate(&AnnotationRequest::new("20 maart 2021")).unwrap();
        assert_eq!(result.text, "20 maart 2021");
    }

    #[test]
    fn test_full_name_becomes_single_placeholder() {
        let request = AnnotationRequest::new("De naam Jan Jansen staat hier.").with_patient(
            PatientMetadata::new()
                .with_first_names("Jan")
                .with_surname("Jansen"),
        );
        let result = engine().annotate(&request).unwrap();
        assert_eq!(result.text, "De naam [PATIENT] staat hier.");
    }

    #[test]
    fn test_repeated_date_keeps_number() {
        let result = engine()
            .annotate(&AnnotationRequest::new(
                "Op 1-2-2020 en 3-4-2021, controle 1-2-2020.",
            ))
            .unwrap();
        assert_eq!(result.text, "Op [DATUM-1] en [DATUM-2], controle [DATUM-1].");
    }

    #[test]
    fn test_redact_strategy() {
        let config = EngineConfig {
            strategy: PlaceholderStyle::Redact,
            ..EngineConfig::default()
        };
        let engine = RuleBasedEngine::new(config).unwrap();
        let result = engine.annotate(&AnnotationRequest::new("20 maart 2021")).unwrap();
        assert_eq!(result.text, "[DATUM]");
    }

    #[test]
    fn test_text_over_limit_is_rejected() {
        let config = EngineConfig {
            max_text_bytes: 4,
            ..EngineConfig::default()
        };
        let engine = RuleBasedEngine::new(config).unwrap();
        let err = engine.annotate(&AnnotationRequest::new("too long")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_resolve_overlaps_prefers_longest() {
        let selected = resolve_overlaps(vec![
            Annotation::new(EntityCategory::Patient, "RABBIT", 0, 6),
            Annotation::new(EntityCategory::Patient, "RABBIT,P.", 0, 9),
            Annotation::new(EntityCategory::Patient, "P.", 7, 9),
        ]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "RABBIT,P.");
    }

    #[test]
    fn test_merge_does_not_cross_punctuation() {
        let text = "Jansen, Jan";
        let merged = merge_adjacent_patient_spans(
            text,
            vec![
                Annotation::new(EntityCategory::Patient, "Jansen", 0, 6),
                Annotation::new(EntityCategory::Patient, "Jan", 8, 11),
            ],
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_text() {
        let result = engine().annotate(&AnnotationRequest::new("")).unwrap();
        assert_eq!(result.text, "");
    }
}
