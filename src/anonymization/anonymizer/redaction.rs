//! Redaction placeholder strategy

use super::Anonymizer;
use crate::anonymization::models::Annotation;

/// Redaction strategy - replaces every span with a bare [TAG] token
pub struct RedactionStrategy;

impl RedactionStrategy {
    /// Create a new redaction strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for RedactionStrategy {
    fn anonymize(&mut self, annotation: &Annotation) -> String {
        format!("[{}]", annotation.category.label())
    }
}

impl Default for RedactionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::EntityCategory;

    #[test]
    fn test_redaction() {
        let mut strategy = RedactionStrategy::new();
        let first = Annotation::new(EntityCategory::Date, "1-1-2020", 0, 8);
        let second = Annotation::new(EntityCategory::Date, "2-2-2020", 10, 18);

        assert_eq!(strategy.anonymize(&first), "[DATUM]");
        assert_eq!(strategy.anonymize(&second), "[DATUM]");
    }
}
