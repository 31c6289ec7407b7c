//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "deid.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing deid configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!(
                    "  2. Validate configuration: deid --config_file_name {} validate-config",
                    self.output
                );
                println!(
                    "  3. De-identify a file: deid --config_file_name {} file --file_name notes.tsv",
                    self.output
                );
                println!("  4. Or run the service: deid --config_file_name {} serve", self.output);
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate a commented configuration with every default spelled out
    fn generate_config() -> String {
        r#"# deid Configuration File
# De-identification of clinical notes

[application]
# trace | debug | info | warn | error
log_level = "info"

[engine]
# Category groups never replaced, on top of per-request settings:
# names, dates, ages, phone_numbers, email_addresses, urls, identifiers, locations
disabled = []

# numbered ([DATUM-1]) or redact ([DATUM])
strategy = "numbered"

# Custom pattern library (TOML); the built-in library is used when unset
# pattern_library = "./patterns/deid_patterns.toml"

# Largest text accepted, in bytes
max_text_bytes = 1048576

[batch]
# skip: log failing lines and continue | abort: stop at the first failing line
on_error = "skip"

# text | appended | jsonl
output_format = "text"

[server]
bind_address = "127.0.0.1:5000"
max_bulk_texts = 1000

[audit]
# Hashes of replaced values, never plaintext
enabled = false
log_path = "./audit/deidentification.log"
json_format = true

[logging]
# JSON log files in addition to console output on stderr
local_enabled = false
local_path = "./logs"

# daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
