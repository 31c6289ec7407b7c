//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the deid configuration file.

use crate::anonymization::detector::patterns::PatternRegistry;
use crate::anonymization::models::EntityCategory;
use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::DeidConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        config: Result<DeidConfig>,
    ) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("<built-in defaults>");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match config {
            Ok(c) => {
                println!("✅ Configuration loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let registry = match config.engine.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let registry = match registry {
            Ok(r) => {
                println!("✅ Pattern library compiled");
                r
            }
            Err(e) => {
                println!("❌ Pattern library failed to compile");
                println!("   Error: {e:#}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Disabled Groups: {:?}", config.engine.disabled);
        println!("  Placeholder Style: {:?}", config.engine.strategy);
        println!(
            "  Pattern Library: {}",
            config
                .engine
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        println!("  Compiled Patterns: {}", registry.all_patterns().len());
        for (category, count) in patterns_per_category(&registry) {
            println!("    {} ({}): {count}", category.label(), category.group());
        }
        println!("  On Error: {}", config.batch.on_error);
        println!("  Output Format: {}", config.batch.output_format);
        println!("  Bind Address: {}", config.server.bind_address);
        println!("  Max Bulk Texts: {}", config.server.max_bulk_texts);
        println!("  Audit Enabled: {}", config.audit.enabled);
        println!();
        Ok(EXIT_OK)
    }
}

/// Pattern counts for every category the library covers
fn patterns_per_category(registry: &PatternRegistry) -> Vec<(EntityCategory, usize)> {
    EntityCategory::ALL
        .into_iter()
        .map(|category| (category, registry.patterns_for_category(category).len()))
        .filter(|(_, count)| *count > 0)
        .collect()
}
