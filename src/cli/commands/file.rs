//! File command implementation
//!
//! This module implements the `file` command, which de-identifies a
//! tab-delimited file. De-identified output goes to stdout (or `--output`);
//! progress lines go to stderr.

use crate::anonymization::adapter::Deidentifier;
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK, EXIT_PARTIAL};
use crate::config::{DeidConfig, OnError, OutputFormat};
use crate::core::batch::{BatchProcessor, BatchSummary};
use crate::domain::DeidError;
use anyhow::Context;
use chrono::Local;
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the file command
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Path to a tab-delimited file (UTF-8)
    #[arg(long = "file_name")]
    pub file_name: PathBuf,

    /// Write output here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the failure policy (skip or abort)
    #[arg(long, value_name = "POLICY")]
    pub on_error: Option<OnError>,

    /// Override the output format (text, appended or jsonl)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Category groups to leave untouched (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub disabled: Vec<String>,
}

impl FileArgs {
    /// Arguments for `path` with every override left to the configuration
    pub fn new(file_name: PathBuf) -> Self {
        Self {
            file_name,
            output: None,
            on_error: None,
            format: None,
            disabled: Vec::new(),
        }
    }

    /// Execute the file command
    pub async fn execute(
        &self,
        config: DeidConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let on_error = self.on_error.unwrap_or(config.batch.on_error);
        let output_format = self.format.unwrap_or(config.batch.output_format);

        let deidentifier = match Deidentifier::from_config(&config.engine, &config.audit) {
            Ok(d) => d.with_disabled(self.disabled.iter().cloned()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build annotation engine");
                eprintln!("❌ Failed to build annotation engine: {e:#}");
                return Ok(EXIT_CONFIG);
            }
        };

        let input = File::open(&self.file_name)
            .with_context(|| format!("Failed to open input file: {}", self.file_name.display()))?;

        let processor = BatchProcessor::new(deidentifier)
            .with_on_error(on_error)
            .with_output_format(output_format)
            .with_shutdown_signal(shutdown_signal);

        eprintln!("Processing file: {}", self.file_name.display());
        eprintln!("Start time: {}", Local::now());
        crate::log_batch_start!(self.file_name.display());

        let output = self.output.clone();
        let result = tokio::task::spawn_blocking(move || -> crate::domain::Result<BatchSummary> {
            let reader = BufReader::new(input);
            match output {
                Some(path) => {
                    let file = File::create(&path)?;
                    processor.process(reader, BufWriter::new(file))
                }
                None => {
                    let stdout = io::stdout();
                    processor.process(reader, BufWriter::new(stdout.lock()))
                }
            }
        })
        .await
        .context("Batch task failed")?;

        eprintln!("End time:   {}", Local::now());

        match result {
            Ok(summary) => {
                summary.log_summary();
                Ok(Self::report(&summary))
            }
            Err(DeidError::Batch { line, message }) => {
                eprintln!("❌ Aborted at line {line}: {message}");
                Ok(EXIT_PARTIAL)
            }
            Err(e) => {
                tracing::error!(error = %e, "Batch failed");
                eprintln!("❌ Batch failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Print a short summary to stderr and pick the exit code
    fn report(summary: &BatchSummary) -> i32 {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "Processed: {} | Failed: {} | Blank: {}",
            summary.processed,
            summary.failed(),
            summary.blank_lines
        );
        for failure in &summary.failures {
            let _ = writeln!(stderr, "   line {}: {}", failure.line, failure.message);
        }

        if summary.is_successful() {
            EXIT_OK
        } else {
            EXIT_PARTIAL
        }
    }
}
