//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Mailshift configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Operation Mode: {}", config.application.operation_mode);
        println!("  Directory: {}", config.directory.url);
        println!("  Base DN: {}", config.directory.base_dn);
        println!(
            "  Bind: {}",
            config.directory.bind_dn.as_deref().unwrap_or("anonymous")
        );
        println!(
            "  Attributes: {}",
            config.directory.attributes.projection().join(", ")
        );
        println!("  Working Directory: {}", config.export.working_directory);
        println!(
            "  Search Scope: {}",
            config
                .export
                .search_scope
                .as_deref()
                .unwrap_or("(interactive)")
        );
        println!(
            "  Legacy Marker: {} ({})",
            config.export.legacy_marker,
            if config.export.marker_case_sensitive {
                "case-sensitive"
            } else {
                "case-insensitive"
            }
        );
        println!();
        Ok(0)
    }
}
