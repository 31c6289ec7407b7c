//! Audit logger for de-identification operations

use crate::anonymization::models::{Annotation, AnnotationResult};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    record_id: Option<&'a str>,
    annotations_count: usize,
    processing_time_ms: u64,
    annotations: Vec<AuditAnnotation<'a>>,
}

/// Audit annotation entry (with hashed value)
#[derive(Debug, Serialize)]
struct AuditAnnotation<'a> {
    category: &'static str,
    start: usize,
    end: usize,
    placeholder: Option<&'a str>,
    /// SHA-256 hash of the replaced text (never log plaintext)
    value_hash: String,
}

/// Audit logger for de-identification operations
///
/// Safe to share between request handlers; writes are serialized.
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
            write_lock: Mutex::new(()),
        })
    }

    /// Check if audit logging is on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log one de-identified text
    ///
    /// `record_id` is the note id (file mode) or the caller's id (HTTP mode).
    pub fn log_result(&self, record_id: Option<&str>, result: &AnnotationResult) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            record_id,
            annotations_count: result.annotations.len(),
            processing_time_ms: result.processing_time_ms,
            annotations: result
                .annotations
                .iter()
                .map(|a| self.create_audit_annotation(a))
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn create_audit_annotation<'a>(&self, annotation: &'a Annotation) -> AuditAnnotation<'a> {
        AuditAnnotation {
            category: annotation.category.label(),
            start: annotation.start,
            end: annotation.end,
            placeholder: annotation.placeholder.as_deref(),
            value_hash: self.hash_value(&annotation.text),
        }
    }

    /// Hash a replaced value using SHA-256
    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry).context("Failed to serialize audit entry")?
        } else {
            format!(
                "[{}] Record: {} | Annotations: {} | Time: {}ms",
                entry.timestamp,
                entry.record_id.unwrap_or("-"),
                entry.annotations_count,
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Audit log lock poisoned"))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        writeln!(file, "{line}").context("Failed to write audit entry")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::EntityCategory;
    use tempfile::tempdir;

    fn sample_result() -> AnnotationResult {
        let mut annotation = Annotation::new(EntityCategory::Email, "j.jnsen@email.com", 9, 26);
        annotation.placeholder = Some("[EMAIL-1]".to_string());
        AnnotationResult::new("Contact: [EMAIL-1]".to_string(), vec![annotation], 3)
    }

    #[test]
    fn test_audit_logger_creation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("test_audit.log");

        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();
        assert!(logger.is_enabled());
        assert!(log_path.parent().unwrap().exists());
    }

    #[test]
    fn test_hash_value() {
        let dir = tempdir().unwrap();
        let logger = AuditLogger::new(dir.path().join("a.log"), true, true).unwrap();

        let hash1 = logger.hash_value("Jansen");
        let hash2 = logger.hash_value("Jansen");
        let hash3 = logger.hash_value("Peters");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_log_result_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test_audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();

        logger.log_result(Some("note-1"), &sample_result()).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("note-1"));
        assert!(content.contains("EMAIL"));
        assert!(!content.contains("j.jnsen@email.com"));

        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["annotations_count"], 1);
    }

    #[test]
    fn test_log_result_plain() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("plain.log");
        let logger = AuditLogger::new(log_path.clone(), false, true).unwrap();

        logger.log_result(None, &sample_result()).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Record: - | Annotations: 1"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("off.log");
        let logger = AuditLogger::new(log_path.clone(), true, false).unwrap();

        logger.log_result(Some("note-1"), &sample_result()).unwrap();
        assert!(!log_path.exists());
    }
}
