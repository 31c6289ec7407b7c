//! Numbered placeholder strategy

use super::Anonymizer;
use crate::anonymization::models::{Annotation, EntityCategory};
use std::collections::HashMap;

/// Numbered strategy - replaces spans with [TAG-n] tokens
///
/// `n` counts distinct surface strings per tag in order of appearance, so a
/// repeated date keeps its number. Patient mentions are never numbered.
#[derive(Debug, Default)]
pub struct PlaceholderStrategy {
    /// Counter for each category
    counters: HashMap<EntityCategory, usize>,
    /// Numbers already handed out per surface string
    assigned: HashMap<(EntityCategory, String), usize>,
}

impl PlaceholderStrategy {
    /// Create a new numbered strategy
    pub fn new() -> Self {
        Self::default()
    }

    fn number_for(&mut self, category: EntityCategory, surface: &str) -> usize {
        if let Some(&n) = self.assigned.get(&(category, surface.to_string())) {
            return n;
        }

        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        let n = *counter;
        self.assigned.insert((category, surface.to_string()), n);
        n
    }
}

impl Anonymizer for PlaceholderStrategy {
    fn anonymize(&mut self, annotation: &Annotation) -> String {
        let category = annotation.category;
        if !category.is_numbered() {
            return format!("[{}]", category.label());
        }

        let n = self.number_for(category, &annotation.text);
        format!("[{}-{}]", category.label(), n)
    }
}
