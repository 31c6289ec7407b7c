//! Annotation data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category of an identifying span
///
/// Every category has a placeholder tag used in the de-identified text and a
/// group name callers use to disable it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// Any name variant of the patient the note is about
    Patient,
    /// Calendar dates
    Date,
    /// Ages ("64 jaar")
    Age,
    /// Telephone numbers
    PhoneNumber,
    /// E-mail addresses
    Email,
    /// Web URLs
    Url,
    /// Dutch citizen service numbers
    Bsn,
    /// Postal codes
    Location,
}

impl EntityCategory {
    /// All categories in priority order
    pub const ALL: [EntityCategory; 8] = [
        Self::Patient,
        Self::Email,
        Self::Url,
        Self::Date,
        Self::PhoneNumber,
        Self::Bsn,
        Self::Age,
        Self::Location,
    ];

    /// Placeholder tag written into the text
    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => "PATIENT",
            Self::Date => "DATUM",
            Self::Age => "LEEFTIJD",
            Self::PhoneNumber => "TELEFOONNUMMER",
            Self::Email => "EMAIL",
            Self::Url => "URL",
            Self::Bsn => "BSN",
            Self::Location => "LOCATIE",
        }
    }

    /// Group name used in `disabled` lists
    pub fn group(&self) -> &'static str {
        match self {
            Self::Patient => "names",
            Self::Date => "dates",
            Self::Age => "ages",
            Self::PhoneNumber => "phone_numbers",
            Self::Email => "email_addresses",
            Self::Url => "urls",
            Self::Bsn => "identifiers",
            Self::Location => "locations",
        }
    }

    /// Look up a category by its group name
    pub fn from_group(group: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.group() == group)
    }

    /// Tie-break rank when two spans start at the same offset with equal length.
    /// Lower wins.
    pub fn priority(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Whether placeholders of this category carry a sequence number
    pub fn is_numbered(&self) -> bool {
        !matches!(self, Self::Patient)
    }
}

/// Name variants of the patient a text is about
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMetadata {
    /// Given names, separated by whitespace
    pub first_names: Option<String>,
    /// Initials, e.g. `P.J.`
    pub initials: Option<String>,
    pub surname: Option<String>,
    /// Upper-case rendering, e.g. `RABBIT,P.`
    pub surname_capitals: Option<String>,
    /// Second family name
    pub surname_secondary: Option<String>,
}

impl PatientMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_names(mut self, value: &str) -> Self {
        self.first_names = non_blank(value);
        self
    }

    pub fn with_initials(mut self, value: &str) -> Self {
        self.initials = non_blank(value);
        self
    }

    pub fn with_surname(mut self, value: &str) -> Self {
        self.surname = non_blank(value);
        self
    }

    pub fn with_surname_capitals(mut self, value: &str) -> Self {
        self.surname_capitals = non_blank(value);
        self
    }

    pub fn with_surname_secondary(mut self, value: &str) -> Self {
        self.surname_secondary = non_blank(value);
        self
    }

    /// Check if no name variant is known
    pub fn is_empty(&self) -> bool {
        self.first_names.is_none()
            && self.initials.is_none()
            && self.surname.is_none()
            && self.surname_capitals.is_none()
            && self.surname_secondary.is_none()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Input to an annotation engine
///
/// Built per call and not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationRequest {
    /// Text to de-identify
    pub text: String,
    /// Patient name variants, improving recall of patient mentions
    pub patient: Option<PatientMetadata>,
    /// Disabled category groups, passed on as given
    pub disabled: BTreeSet<String>,
}

impl AnnotationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            patient: None,
            disabled: BTreeSet::new(),
        }
    }

    pub fn with_patient(mut self, patient: PatientMetadata) -> Self {
        self.patient = (!patient.is_empty()).then_some(patient);
        self
    }

    pub fn with_disabled<I, S>(mut self, disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(disabled.into_iter().map(Into::into));
        self
    }

    /// Check if a category's group was disabled
    pub fn is_disabled(&self, category: EntityCategory) -> bool {
        self.disabled.contains(category.group())
    }
}

/// An identified span of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub category: EntityCategory,
    /// Matched text (hashed in audit logs)
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Placeholder the span was replaced with
    pub placeholder: Option<String>,
}

impl Annotation {
    pub fn new(category: EntityCategory, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            category,
            text: text.into(),
            start,
            end,
            placeholder: None,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if two spans share at least one byte
    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Output of an annotation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationResult {
    /// Text with every applied span replaced by its placeholder
    pub text: String,
    /// Applied annotations, in text order
    pub annotations: Vec<Annotation>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of annotation
    pub timestamp: DateTime<Utc>,
}

impl AnnotationResult {
    pub fn new(text: String, annotations: Vec<Annotation>, processing_time_ms: u64) -> Self {
        Self {
            text,
            annotations,
            processing_time_ms,
            timestamp: Utc::now(),
        }
    }

    /// Get total number of annotations
    pub fn total_annotations(&self) -> usize {
        self.annotations.len()
    }

    /// Check if anything was replaced
    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup() {
        assert_eq!(EntityCategory::from_group("dates"), Some(EntityCategory::Date));
        assert_eq!(EntityCategory::from_group("names"), Some(EntityCategory::Patient));
        assert_eq!(EntityCategory::from_group("unknown"), None);
    }

    #[test]
    fn test_patient_has_highest_priority() {
        for category in EntityCategory::ALL {
            assert!(EntityCategory::Patient.priority() <= category.priority());
        }
    }

    #[test]
    fn test_patient_metadata_blank_values() {
        let patient = PatientMetadata::new().with_surname("   ").with_first_names("");
        assert!(patient.is_empty());

        let patient = patient.with_surname(" Jansen ");
        assert_eq!(patient.surname.as_deref(), Some("Jansen"));
    }

    #[test]
    fn test_request_drops_empty_patient() {
        let request = AnnotationRequest::new("x").with_patient(PatientMetadata::new());
        assert!(request.patient.is_none());
    }

    #[test]
    fn test_request_disabled() {
        let request = AnnotationRequest::new("x").with_disabled(["dates"]);
        assert!(request.is_disabled(EntityCategory::Date));
        assert!(!request.is_disabled(EntityCategory::Patient));
    }

    #[test]
    fn test_overlap() {
        let a = Annotation::new(EntityCategory::Date, "abc", 0, 3);
        let b = Annotation::new(EntityCategory::Age, "c", 2, 3);
        let c = Annotation::new(EntityCategory::Age, "d", 3, 4);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_has_annotations() {
        let result = AnnotationResult::new(
            "[DATUM-1] [DATUM-2]".to_string(),
            vec![
                Annotation::new(EntityCategory::Date, "1-1-2020", 0, 8),
                Annotation::new(EntityCategory::Date, "2-2-2020", 9, 17),
            ],
            0,
        );
        assert_eq!(result.total_annotations(), 2);
        assert!(result.has_annotations());
    }
}
