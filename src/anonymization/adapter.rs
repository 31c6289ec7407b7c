//! Adapter between input shapes and the annotation engine
//!
//! Turns a [`ClinicalRecord`] or a JSON [`DeidentifyPayload`] into an
//! [`AnnotationRequest`], runs the engine, and shapes the result for the
//! caller. Engine-agnostic: anything implementing [`AnnotationEngine`] fits.

use crate::anonymization::audit::AuditLogger;
use crate::anonymization::config::{AuditConfig, EngineConfig};
use crate::anonymization::engine::{AnnotationEngine, RuleBasedEngine};
use crate::anonymization::models::{AnnotationRequest, AnnotationResult};
use crate::domain::{
    BulkDeidentifyPayload, BulkDeidentifyResponse, ClinicalRecord, DeidentifyPayload,
    DeidentifyResponse, Result,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A record together with its de-identified free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeidentifiedRecord {
    pub record: ClinicalRecord,
    pub text: String,
    /// Number of spans replaced
    pub annotations: usize,
}

/// De-identifies records and payloads with a shared engine
#[derive(Clone)]
pub struct Deidentifier {
    engine: Arc<dyn AnnotationEngine>,
    disabled: BTreeSet<String>,
    audit: Option<Arc<AuditLogger>>,
}

impl Deidentifier {
    pub fn new(engine: Arc<dyn AnnotationEngine>) -> Self {
        Self {
            engine,
            disabled: BTreeSet::new(),
            audit: None,
        }
    }

    /// Build the rule-based engine and audit logger from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern library cannot be loaded or the audit
    /// log directory cannot be created.
    pub fn from_config(engine_config: &EngineConfig, audit_config: &AuditConfig) -> anyhow::Result<Self> {
        let engine = RuleBasedEngine::new(engine_config.clone())?;
        let mut deidentifier = Self::new(Arc::new(engine));

        if audit_config.enabled {
            let audit = AuditLogger::new(
                audit_config.log_path.clone(),
                audit_config.json_format,
                audit_config.enabled,
            )?;
            deidentifier = deidentifier.with_audit(audit);
        }

        Ok(deidentifier)
    }

    /// Groups disabled for every record this instance processes
    pub fn with_disabled<I, S>(mut self, disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled = disabled.into_iter().map(Into::into).collect();
        self
    }

    /// Attach an audit logger; disabled loggers are dropped
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit.is_enabled().then(|| Arc::new(audit));
        self
    }

    /// Engine name, for logs and health output
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Build an engine request from a parsed record
    pub fn request_for_record(&self, record: &ClinicalRecord) -> AnnotationRequest {
        AnnotationRequest::new(record.free_text())
            .with_patient(record.patient_metadata())
            .with_disabled(self.disabled.iter().cloned())
    }

    /// Build an engine request from a JSON payload, if it carries a text
    pub fn request_for_payload(&self, payload: &DeidentifyPayload) -> Option<AnnotationRequest> {
        let text = payload.text.as_deref()?;
        let mut request = AnnotationRequest::new(text)
            .with_disabled(payload.disabled.iter().flatten().cloned());

        if let Some(patient) = payload.patient_metadata() {
            request = request.with_patient(patient);
        }

        Some(request)
    }

    /// De-identify the free text of a record
    pub fn deidentify_record(&self, record: ClinicalRecord) -> Result<DeidentifiedRecord> {
        let request = self.request_for_record(&record);
        let result = self.annotate(Some(record.note_id()), &request)?;

        Ok(DeidentifiedRecord {
            record,
            annotations: result.total_annotations(),
            text: result.text,
        })
    }

    /// De-identify a single JSON payload
    ///
    /// A `null` text is passed through as `null`; the id is always echoed.
    pub fn deidentify_payload(&self, payload: &DeidentifyPayload) -> Result<DeidentifyResponse> {
        let text = match self.request_for_payload(payload) {
            Some(request) => Some(self.annotate(payload.id.as_deref(), &request)?.text),
            None => None,
        };

        Ok(DeidentifyResponse {
            text,
            id: payload.id.clone(),
        })
    }

    /// De-identify every payload of a bulk request, keeping order
    ///
    /// A bulk-level `disabled` list replaces the per-text lists.
    pub fn deidentify_bulk(&self, bulk: BulkDeidentifyPayload) -> Result<BulkDeidentifyResponse> {
        let BulkDeidentifyPayload { texts, disabled } = bulk;

        let texts = texts
            .into_iter()
            .map(|mut payload| {
                if let Some(ref disabled) = disabled {
                    payload.disabled = Some(disabled.clone());
                }
                self.deidentify_payload(&payload)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BulkDeidentifyResponse { texts })
    }

    fn annotate(&self, id: Option<&str>, request: &AnnotationRequest) -> Result<AnnotationResult> {
        let result = self.engine.annotate(request)?;

        if let Some(ref audit) = self.audit {
            if let Err(e) = audit.log_result(id, &result) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        Ok(result)
    }
}
