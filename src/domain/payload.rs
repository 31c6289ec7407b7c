//! JSON envelopes for the HTTP surface

use crate::anonymization::models::PatientMetadata;
use serde::{Deserialize, Deserializer, Serialize};

/// Single-text de-identification request
///
/// `text` must be present but may be `null`; a `null` text is passed through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeidentifyPayload {
    /// Text to de-identify
    #[serde(deserialize_with = "required_nullable")]
    pub text: Option<String>,

    /// Caller-supplied identifier, echoed unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Category groups to leave untouched (e.g. `dates`, `names`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Vec<String>>,

    /// Given names, separated by whitespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_first_names: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_surname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_initials: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_surname_capitals: Option<String>,

    #[serde(
        default,
        rename = "patient_surname_2",
        skip_serializing_if = "Option::is_none"
    )]
    pub patient_surname_secondary: Option<String>,
}

impl DeidentifyPayload {
    /// Create a payload for a text without metadata
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the caller identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the disabled groups
    pub fn with_disabled<I, S>(mut self, disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled = Some(disabled.into_iter().map(Into::into).collect());
        self
    }

    /// Set the patient's first names and surname
    pub fn with_patient(mut self, first_names: &str, surname: &str) -> Self {
        self.patient_first_names = Some(first_names.to_string());
        self.patient_surname = Some(surname.to_string());
        self
    }

    /// Patient name variants carried by this payload, if any
    pub fn patient_metadata(&self) -> Option<PatientMetadata> {
        let patient = PatientMetadata::new()
            .with_first_names(self.patient_first_names.as_deref().unwrap_or_default())
            .with_initials(self.patient_initials.as_deref().unwrap_or_default())
            .with_surname(self.patient_surname.as_deref().unwrap_or_default())
            .with_surname_capitals(self.patient_surname_capitals.as_deref().unwrap_or_default())
            .with_surname_secondary(self.patient_surname_secondary.as_deref().unwrap_or_default());

        (!patient.is_empty()).then_some(patient)
    }
}

/// Single-text de-identification response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeidentifyResponse {
    /// De-identified text, `null` when the request text was `null`
    pub text: Option<String>,

    /// Identifier from the request
    pub id: Option<String>,
}

/// Bulk de-identification request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeidentifyPayload {
    /// Texts to de-identify, each processed independently
    pub texts: Vec<DeidentifyPayload>,

    /// Disabled groups applied to every text, replacing per-text settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Vec<String>>,
}

/// Bulk de-identification response, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeidentifyResponse {
    pub texts: Vec<DeidentifyResponse>,
}

/// Require the key to be present while allowing a `null` value
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}
