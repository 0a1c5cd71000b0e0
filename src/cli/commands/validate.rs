//! Validate config command implementation
//!
//! Implements the `validate-config` command for validating the Mendel
//! configuration file.

use crate::config::load_config;
use crate::config::schema::RulebaseSourceKind;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Datastore: {}", config.datastore.base_url);
        println!("  Storage: {}", config.storage.base_url);
        println!("  Storage Bucket: {}", config.storage.bucket);

        match config.rulebase.source {
            RulebaseSourceKind::File => {
                println!(
                    "  Rulebase: file ({})",
                    config.rulebase.path.as_deref().unwrap_or("-")
                );
            }
            RulebaseSourceKind::Datastore => {
                println!("  Rulebase: datastore");
            }
        }

        println!("  Render Service: {}", config.reporting.render_url);
        println!("  Clinic: {}", config.reporting.clinic_name);
        println!();
        Ok(0)
    }
}
