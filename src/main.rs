// deid - Clinical Note De-identification Service
// Copyright (c) 2025 Deid Contributors
// Licensed under the MIT License

use deid::cli::{Cli, Commands, EXIT_CONFIG, EXIT_FATAL};
use deid::config::{DeidConfig, LoggingConfig};
use deid::domain::Result;
use deid::logging::init_logging;
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.load_config();
    let config_file_name = cli.config_file_name.clone();
    let cli_log_level = cli.log_level.clone();
    let command = match cli.into_command() {
        Ok(command) => command,
        Err(e) => e.exit(),
    };

    // Fall back to console-only logging when the configuration is unusable
    let (config_level, logging_config) = match &config {
        Ok(c) => (c.application.log_level.clone(), c.logging.clone()),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli_log_level.unwrap_or(config_level);

    let _logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "deid - Clinical Note De-identification Service"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                }
            }
            eprintln!("\n⚠️  Shutdown signal received, finishing in-flight work...");
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                eprintln!("\n⚠️  Shutdown signal received, finishing in-flight work...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&command, config_file_name.as_deref(), config, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            EXIT_FATAL
        }
    };

    drop(_logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(
    command: &Commands,
    config_file_name: Option<&str>,
    config: Result<DeidConfig>,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    match command {
        Commands::ValidateConfig(args) => args.execute(config_file_name, config).await,
        Commands::Init(args) => args.execute().await,
        Commands::File(args) => match config {
            Ok(config) => args.execute(config, shutdown_signal).await,
            Err(e) => config_failure(e),
        },
        Commands::Serve(args) => match config {
            Ok(config) => args.execute(config, shutdown_signal).await,
            Err(e) => config_failure(e),
        },
    }
}

fn config_failure(error: deid::domain::DeidError) -> anyhow::Result<i32> {
    tracing::error!(error = %error, "Failed to load configuration");
    eprintln!("❌ {error}");
    Ok(EXIT_CONFIG)
}
