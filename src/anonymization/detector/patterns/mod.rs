//! Pattern library for rule-based detection

use crate::anonymization::models::EntityCategory;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Name of the capture group that narrows a match to part of the regex
pub const VALUE_GROUP: &str = "value";

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this category
    pub patterns: Vec<String>,
    /// Category label
    pub category: String,
    /// Extra check applied to each match
    #[serde(default)]
    pub validator: Option<String>,
}

/// Post-match check on a candidate span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Dutch BSN eleven-check ("elfproef")
    ElevenCheck,
}

impl Validator {
    fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "eleven_check" | "elfproef" => Ok(Self::ElevenCheck),
            _ => anyhow::bail!("Unknown validator: {s}"),
        }
    }

    /// Check a candidate value
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::ElevenCheck => passes_eleven_check(value),
        }
    }
}

/// Weighted digit sum of a nine-digit number, last digit weighted -1, must be divisible by 11
fn passes_eleven_check(value: &str) -> bool {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 9 || digits.len() != value.chars().count() {
        return false;
    }

    let sum: i64 = digits
        .iter()
        .enumerate()
        .map(|(idx, &d)| {
            let weight = if idx == 8 { -1 } else { 9 - idx as i64 };
            weight * d as i64
        })
        .sum();

    sum != 0 && sum % 11 == 0
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Name of the pattern set it came from
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Entity category
    pub category: EntityCategory,
    /// Optional post-match check
    pub validator: Option<Validator>,
}

impl CompiledPattern {
    /// Whether the regex narrows its matches to the `value` group
    pub fn has_value_group(&self) -> bool {
        self.regex.capture_names().flatten().any(|n| n == VALUE_GROUP)
    }
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for rule-based detection
///
/// Compiled once and shared read-only afterwards.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    patterns_by_category: HashMap<EntityCategory, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();
        let mut patterns_by_category: HashMap<EntityCategory, Vec<CompiledPattern>> =
            HashMap::new();

        for (name, def) in library.patterns {
            let category = Self::parse_category(&def.category).with_context(|| {
                format!("Invalid category in pattern '{}': {}", name, def.category)
            })?;

            let validator = def
                .validator
                .as_deref()
                .map(Validator::parse)
                .transpose()
                .with_context(|| format!("Invalid validator in pattern '{name}'"))?;

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                let compiled = CompiledPattern {
                    name: name.clone(),
                    regex,
                    category,
                    validator,
                };

                patterns.push(compiled.clone());
                patterns_by_category
                    .entry(category)
                    .or_default()
                    .push(compiled);
            }
        }

        if patterns.is_empty() {
            anyhow::bail!("Pattern library contains no patterns");
        }

        Ok(Self {
            patterns,
            patterns_by_category,
        })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/deid_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Patterns for one category, empty when the library has none
    pub fn patterns_for_category(&self, category: EntityCategory) -> &[CompiledPattern] {
        self.patterns_by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parse category string to EntityCategory
    ///
    /// Patient names come from record metadata, never from the pattern library.
    fn parse_category(s: &str) -> Result<EntityCategory> {
        match s.to_lowercase().as_str() {
            "date" | "datum" => Ok(EntityCategory::Date),
            "age" | "leeftijd" => Ok(EntityCategory::Age),
            "phone_number" | "phone" => Ok(EntityCategory::PhoneNumber),
            "email" => Ok(EntityCategory::Email),
            "url" => Ok(EntityCategory::Url),
            "bsn" => Ok(EntityCategory::Bsn),
            "location" | "postal_code" => Ok(EntityCategory::Location),
            _ => anyhow::bail!("Unknown category: {s}"),
        }
    }
}
