//! Line-by-line de-identification of tab-delimited input
//!
//! Reads one record per line, de-identifies its free text, and writes one
//! output line per processed record in input order.

use super::summary::{BatchSummary, LineFailure};
use crate::anonymization::adapter::{DeidentifiedRecord, Deidentifier};
use crate::config::{OnError, OutputFormat};
use crate::domain::record::FIELD_SEPARATOR;
use crate::domain::{ClinicalRecord, DeidError, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::time::Instant;
use tokio::sync::watch;

/// One output object in `jsonl` format
#[derive(Debug, Serialize)]
struct JsonlLine<'a> {
    hash_id: &'a str,
    note_id: &'a str,
    note_category: &'a str,
    text: &'a str,
}

/// Drives de-identification over a line-oriented input
pub struct BatchProcessor {
    deidentifier: Deidentifier,
    on_error: OnError,
    output_format: OutputFormat,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl BatchProcessor {
    /// Create a processor with default policy (`skip`) and `text` output
    pub fn new(deidentifier: Deidentifier) -> Self {
        Self {
            deidentifier,
            on_error: OnError::default(),
            output_format: OutputFormat::default(),
            shutdown_signal: None,
        }
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Stop reading new lines once the signal turns `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Process every line of `reader`, writing results to `writer`
    ///
    /// A line that is not valid UTF-8 fails like a malformed record and
    /// follows the same policy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input cannot be read or the output cannot be written
    /// - A line fails and the policy is [`OnError::Abort`]
    pub fn process<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<BatchSummary> {
        let start = Instant::now();
        let mut summary = BatchSummary::new();
        let mut buffer = Vec::new();

        loop {
            let line_number = summary.total_lines + 1;

            // Checked before reading so an interrupt never drops a consumed line
            if self.shutdown_requested() {
                tracing::warn!(line = line_number, "Shutdown requested, stopping batch");
                summary.interrupted = true;
                break;
            }

            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            summary.total_lines += 1;

            let outcome = decode_line(&buffer).and_then(|line| {
                if is_blank(&line) {
                    Ok(None)
                } else {
                    self.process_line(&line).map(Some)
                }
            });

            match outcome {
                Ok(None) => summary.blank_lines += 1,
                Ok(Some(deidentified)) => {
                    self.write_record(&mut writer, &deidentified)?;
                    summary.processed += 1;
                    summary.annotations += deidentified.annotations;
                }
                Err(e) => {
                    crate::log_record_failure!(line_number, e);
                    match self.on_error {
                        OnError::Skip => {
                            summary.add_failure(LineFailure::new(line_number, e.to_string()));
                        }
                        OnError::Abort => {
                            writer.flush()?;
                            return Err(DeidError::Batch {
                                line: line_number,
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        writer.flush()?;
        Ok(summary.with_duration(start.elapsed()))
    }

    fn process_line(&self, line: &str) -> Result<DeidentifiedRecord> {
        let record = ClinicalRecord::parse_line(line)?;
        self.deidentifier.deidentify_record(record)
    }

    fn write_record<W: Write>(&self, writer: &mut W, deidentified: &DeidentifiedRecord) -> Result<()> {
        match self.output_format {
            OutputFormat::Text => writeln!(writer, "{}", deidentified.text)?,
            OutputFormat::Appended => {
                let separator = FIELD_SEPARATOR.to_string();
                let mut columns = deidentified.record.fields().to_vec();
                columns.push(deidentified.text.as_str());
                writeln!(writer, "{}", columns.join(separator.as_str()))?;
            }
            OutputFormat::Jsonl => {
                let record = &deidentified.record;
                let line = serde_json::to_string(&JsonlLine {
                    hash_id: record.hash_id(),
                    note_id: record.note_id(),
                    note_category: record.note_category(),
                    text: &deidentified.text,
                })?;
                writeln!(writer, "{line}")?;
            }
        }
        Ok(())
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| *signal.borrow())
    }
}

/// Line content without its `\n` or `\r\n` terminator
fn decode_line(raw: &[u8]) -> Result<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8(raw.to_vec())
        .map_err(|e| DeidError::Other(format!("Line is not valid UTF-8: {e}")))
}

/// Whitespace only and no field separator; empty columns still form a record
fn is_blank(line: &str) -> bool {
    !line.contains(FIELD_SEPARATOR) && line.trim().is_empty()
}
