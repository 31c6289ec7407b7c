//! Batch summary and reporting
//!
//! This module defines structures for tracking and reporting file-mode results.

use std::time::Duration;

/// A line that could not be de-identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-based line number in the input
    pub line: usize,

    /// Error message
    pub message: String,
}

impl LineFailure {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Summary of a file-mode run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Lines read from the input
    pub total_lines: usize,

    /// Lines de-identified and written
    pub processed: usize,

    /// Blank lines skipped
    pub blank_lines: usize,

    /// Spans replaced across all processed lines
    pub annotations: usize,

    /// Lines that failed and were skipped
    pub failures: Vec<LineFailure>,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl BatchSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a failed line
    pub fn add_failure(&mut self, failure: LineFailure) {
        self.failures.push(failure);
    }

    /// Number of failed lines
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Check if every non-blank line was processed
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    /// Get success rate over non-blank lines as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.processed + self.failed();
        if attempted == 0 {
            return 100.0;
        }
        (self.processed as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_batch_complete!(self.processed, self.failed(), self.duration);

        tracing::debug!(
            total_lines = self.total_lines,
            blank_lines = self.blank_lines,
            annotations = self.annotations,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Batch statistics"
        );

        if self.interrupted {
            tracing::warn!("Batch interrupted before end of input");
        }

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Batch completed with failed lines"
            );
        }
    }
}
