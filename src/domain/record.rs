//! Clinical note records parsed from tab-delimited lines
//!
//! One input line holds nine columns in a fixed order:
//!
//! | # | column |
//! |---|--------|
//! | 0 | patient hash |
//! | 1 | note id |
//! | 2 | note category |
//! | 3 | first names |
//! | 4 | initials |
//! | 5 | surname |
//! | 6 | surname in capitals |
//! | 7 | secondary surname |
//! | 8 | note text |

use super::errors::MalformedRecordError;
use crate::anonymization::models::PatientMetadata;
use std::str::FromStr;

/// Number of columns in a record line
pub const RECORD_FIELD_COUNT: usize = 9;

/// Column separator
pub const FIELD_SEPARATOR: char = '\t';

/// A single clinical note with the patient's name variants
///
/// Records are immutable once parsed and are consumed by the annotation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicalRecord {
    hash_id: String,
    note_id: String,
    note_category: String,
    patient_first_names: String,
    patient_initials: String,
    patient_surname: String,
    patient_surname_capitals: String,
    patient_surname_secondary: String,
    free_text: String,
}

impl ClinicalRecord {
    /// Parse a tab-delimited line into a record
    ///
    /// A trailing line terminator (`\n` or `\r\n`) is dropped, everything else
    /// is kept as-is. The text column is preserved verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] when the line does not hold exactly
    /// [`RECORD_FIELD_COUNT`] columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use deid::domain::ClinicalRecord;
    ///
    /// let line = "H1\tN1\tBrief\tJan\tJ.\tJansen\tJANSEN,J.\t\tJan Jansen is thuis.";
    /// let record = ClinicalRecord::parse_line(line).unwrap();
    /// assert_eq!(record.patient_surname(), "Jansen");
    /// assert_eq!(record.free_text(), "Jan Jansen is thuis.");
    /// ```
    pub fn parse_line(line: &str) -> Result<Self, MalformedRecordError> {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        Self::from_fields(&fields)
    }

    /// Build a record from already split columns
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, MalformedRecordError> {
        if fields.len() != RECORD_FIELD_COUNT {
            return Err(MalformedRecordError {
                expected: RECORD_FIELD_COUNT,
                found: fields.len(),
            });
        }

        let field = |idx: usize| fields[idx].as_ref().to_string();

        Ok(Self {
            hash_id: field(0),
            note_id: field(1),
            note_category: field(2),
            patient_first_names: field(3),
            patient_initials: field(4),
            patient_surname: field(5),
            patient_surname_capitals: field(6),
            patient_surname_secondary: field(7),
            free_text: field(8),
        })
    }

    pub fn hash_id(&self) -> &str {
        &self.hash_id
    }

    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    pub fn note_category(&self) -> &str {
        &self.note_category
    }

    pub fn patient_first_names(&self) -> &str {
        &self.patient_first_names
    }

    pub fn patient_initials(&self) -> &str {
        &self.patient_initials
    }

    pub fn patient_surname(&self) -> &str {
        &self.patient_surname
    }

    pub fn patient_surname_capitals(&self) -> &str {
        &self.patient_surname_capitals
    }

    pub fn patient_surname_secondary(&self) -> &str {
        &self.patient_surname_secondary
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// Patient name variants of this record, empty columns dropped
    pub fn patient_metadata(&self) -> PatientMetadata {
        PatientMetadata::new()
            .with_first_names(&self.patient_first_names)
            .with_initials(&self.patient_initials)
            .with_surname(&self.patient_surname)
            .with_surname_capitals(&self.patient_surname_capitals)
            .with_surname_secondary(&self.patient_surname_secondary)
    }

    /// All nine columns in input order
    pub fn fields(&self) -> [&str; RECORD_FIELD_COUNT] {
        [
            &self.hash_id,
            &self.note_id,
            &self.note_category,
            &self.patient_first_names,
            &self.patient_initials,
            &self.patient_surname,
            &self.patient_surname_capitals,
            &self.patient_surname_secondary,
            &self.free_text,
        ]
    }
}

impl FromStr for ClinicalRecord {
    type Err = MalformedRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETER: &str = "HASH_A\tNOTE_ID_1234\tNOTE_CAT_NURSING_NOTITION\tPeter\tP.\tRabbit\tRABBIT,P.\tRabbit-Konijn\t\
        Peter was not very well during the evening. His mother put him to bed, and made some chamomile \
        tea: One table-spoonful to be taken at bedtime";

    #[test]
    fn test_parse_line_maps_every_column() {
        let record = ClinicalRecord::parse_line(PETER).unwrap();
        assert_eq!(record.hash_id(), "HASH_A");
        assert_eq!(record.note_id(), "NOTE_ID_1234");
        assert_eq!(record.note_category(), "NOTE_CAT_NURSING_NOTITION");
        assert_eq!(record.patient_first_names(), "Peter");
        assert_eq!(record.patient_initials(), "P.");
        assert_eq!(record.patient_surname(), "Rabbit");
        assert_eq!(record.patient_surname_capitals(), "RABBIT,P.");
        assert_eq!(record.patient_surname_secondary(), "Rabbit-Konijn");
        assert_eq!(
            record.free_text(),
            "Peter was not very well during the evening. His mother put him to bed, and made \
             some chamomile tea: One table-spoonful to be taken at bedtime"
        );
    }

    #[test]
    fn test_parse_line_strips_line_terminator() {
        let line = format!("{PETER}\r\n");
        let record = ClinicalRecord::parse_line(&line).unwrap();
        assert!(record.free_text().ends_with("bedtime"));
    }

    #[test]
    fn test_parse_line_keeps_surrounding_whitespace_in_text() {
        let line = "h\tn\tc\tf\ti\ts\tS\ts2\t  spaced text ";
        let record = ClinicalRecord::parse_line(line).unwrap();
        assert_eq!(record.free_text(), "  spaced text ");
    }

    #[test]
    fn test_too_few_fields() {
        let err = ClinicalRecord::parse_line("a\tb\tc").unwrap_err();
        assert_eq!(err.expected, RECORD_FIELD_COUNT);
        assert_eq!(err.found, 3);
    }

    #[test]
    fn test_too_many_fields() {
        let line = format!("{PETER}\textra");
        let err = ClinicalRecord::parse_line(&line).unwrap_err();
        assert_eq!(err.found, 10);
    }

    #[test]
    fn test_empty_columns_are_allowed() {
        let record: ClinicalRecord = "\t\t\t\t\t\t\t\t".parse().unwrap();
        assert_eq!(record.free_text(), "");
        assert!(record.patient_metadata().is_empty());
    }

    #[test]
    fn test_patient_metadata_drops_empty_columns() {
        let record = ClinicalRecord::parse_line("h\tn\tc\tJan\t\tJansen\t\t\ttext").unwrap();
        let patient = record.patient_metadata();
        assert_eq!(patient.first_names.as_deref(), Some("Jan"));
        assert_eq!(patient.surname.as_deref(), Some("Jansen"));
        assert!(patient.initials.is_none());
        assert!(patient.surname_capitals.is_none());
        assert!(patient.surname_secondary.is_none());
    }

    #[test]
    fn test_fields_round_trip_input_order() {
        let record = ClinicalRecord::parse_line(PETER).unwrap();
        assert_eq!(record.fields().join("\t"), PETER);
    }
}
