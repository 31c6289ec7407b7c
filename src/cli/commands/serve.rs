//! Serve command implementation
//!
//! Runs the HTTP service until Ctrl+C or SIGTERM.

use crate::anonymization::adapter::Deidentifier;
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::config::DeidConfig;
use crate::server::{serve, AppState};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind_address)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config: DeidConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let bind_address = self
            .bind
            .clone()
            .unwrap_or_else(|| config.server.bind_address.clone());

        let deidentifier = match Deidentifier::from_config(&config.engine, &config.audit) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build annotation engine");
                eprintln!("❌ Failed to build annotation engine: {e:#}");
                return Ok(EXIT_CONFIG);
            }
        };

        tracing::info!(
            bind_address = %bind_address,
            max_bulk_texts = config.server.max_bulk_texts,
            engine = deidentifier.engine_name(),
            "Starting de-identification service"
        );

        let state = AppState::new(deidentifier, config.server.max_bulk_texts);
        match serve(state, &bind_address, shutdown_signal).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                eprintln!("❌ {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
