//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for deid using clap.

pub mod commands;

use crate::config::{load_config, load_default_config, DeidConfig};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use commands::file::FileArgs;
use std::path::PathBuf;

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: the batch finished but some lines failed
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code: configuration error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: fatal error
pub const EXIT_FATAL: i32 = 5;

/// deid - clinical note de-identification
#[derive(Parser, Debug)]
#[command(name = "deid")]
#[command(version, about, long_about = None)]
#[command(author = "Deid Contributors")]
pub struct Cli {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(
        long = "config_file_name",
        visible_alias = "config",
        global = true,
        env = "DEID_CONFIG"
    )]
    pub config_file_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "DEID_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Tab-delimited file to de-identify with configured settings
    /// (shorthand for `deid file --file_name <PATH>`)
    #[arg(long = "file_name", value_name = "PATH")]
    pub file_name: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Load the configuration named on the command line, or the defaults
    pub fn load_config(&self) -> crate::domain::Result<DeidConfig> {
        match self.config_file_name.as_deref() {
            Some(path) => load_config(path),
            None => load_default_config(),
        }
    }

    /// The command to run, where a bare `--file_name` means `file`
    ///
    /// # Errors
    ///
    /// Returns a usage error when `--file_name` is combined with a
    /// subcommand, or when neither is given.
    pub fn into_command(self) -> Result<Commands, clap::Error> {
        match (self.command, self.file_name) {
            (Some(command), None) => Ok(command),
            (None, Some(file_name)) => Ok(Commands::File(FileArgs::new(file_name))),
            (Some(_), Some(_)) => Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--file_name cannot be combined with a subcommand",
            )),
            (None, None) => Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "either --file_name <PATH> or a subcommand is required",
            )),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// De-identify a tab-delimited file
    File(commands::file::FileArgs),

    /// Run the HTTP service
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
