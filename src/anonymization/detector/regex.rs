//! Regex-based detector

use super::{
    patterns::{CompiledPattern, PatternRegistry, VALUE_GROUP},
    Detector,
};
use crate::anonymization::models::{Annotation, AnnotationRequest, EntityCategory};
use anyhow::Result;
use std::sync::Arc;

/// Regex-based detector for dates, ages, contact details and identifiers
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
}

impl RegexDetector {
    /// Create a new regex detector with default patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
        }
    }

    /// Detect spans in a string value
    fn detect_in_string(&self, text: &str, request: &AnnotationRequest) -> Vec<Annotation> {
        let mut annotations = Vec::new();

        for category in EntityCategory::ALL {
            if request.is_disabled(category) {
                continue;
            }
            for pattern in self.pattern_registry.patterns_for_category(category) {
                Self::collect_matches(pattern, text, &mut annotations);
            }
        }

        annotations
    }

    fn collect_matches(pattern: &CompiledPattern, text: &str, out: &mut Vec<Annotation>) {
        let narrow = pattern.has_value_group();

        for captures in pattern.regex.captures_iter(text) {
            let matched = if narrow {
                captures.name(VALUE_GROUP)
            } else {
                captures.get(0)
            };
            let Some(matched) = matched else {
                continue;
            };

            if let Some(validator) = pattern.validator {
                if !validator.accepts(matched.as_str()) {
                    tracing::trace!(pattern = %pattern.name, ?validator, "Match rejected");
                    continue;
                }
            }

            out.push(Annotation::new(
                pattern.category,
                matched.as_str(),
                matched.start(),
                matched.end(),
            ));
        }
    }
}

impl Detector for RegexDetector {
    fn detect(&self, request: &AnnotationRequest) -> Result<Vec<Annotation>> {
        Ok(self.detect_in_string(&request.text, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Annotation> {
        let detector = RegexDetector::new().unwrap();
        detector.detect(&AnnotationRequest::new(text)).unwrap()
    }

    #[test]
    fn test_detect_written_date() {
        let found = detect("Opgenomen op 20 maart 2021.");
        assert!(found
            .iter()
            .any(|a| a.category == EntityCategory::Date && a.text == "20 maart 2021"));
    }

    #[test]
    fn test_detect_email() {
        let found = detect("Contact: j.jnsen@email.com");
        assert!(found
            .iter()
            .any(|a| a.category == EntityCategory::Email && a.text == "j.jnsen@email.com"));
    }

    #[test]
    fn test_age_only_annotates_number() {
        let found = detect("is 64 jaar oud");
        let age = found
            .iter()
            .find(|a| a.category == EntityCategory::Age)
            .unwrap();
        assert_eq!(age.text, "64");
        assert_eq!((age.start, age.end), (3, 5));
    }

    #[test]
    fn test_bsn_requires_eleven_check() {
        assert!(detect("BSN 111222333")
            .iter()
            .any(|a| a.category == EntityCategory::Bsn));
        assert!(!detect("BSN 123456789")
            .iter()
            .any(|a| a.category == EntityCategory::Bsn));
    }

    #[test]
    fn test_disabled_category_is_skipped() {
        let detector = RegexDetector::new().unwrap();
        let request = AnnotationRequest::new("20 maart 2021").with_disabled(["dates"]);
        let found = detector.detect(&request).unwrap();
        assert!(found.iter().all(|a| a.category != EntityCategory::Date));
    }
}
