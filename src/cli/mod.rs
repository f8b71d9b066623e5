//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Mailshift using clap.

pub mod commands;
pub mod prompt;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Mailshift - directory mailbox routing export tool
#[derive(Parser, Debug)]
#[command(name = "mailshift")]
#[command(version, about, long_about = None)]
#[command(author = "Mailshift Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "mailshift.toml", env = "MAILSHIFT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MAILSHIFT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export account attributes and routing addresses (GET)
    Export(commands::export::ExportArgs),

    /// Re-import previously exported files (PUT, not implemented)
    Import(commands::import::ImportArgs),

    /// List the organizational scopes available for export
    Scopes(commands::scopes::ScopesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Log level and logging settings for this invocation
    ///
    /// The `[logging]` section applies when the configuration file loads;
    /// otherwise output stays on the console. `--log-level` takes precedence
    /// over `application.log_level`.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        match load_config(&self.config) {
            Ok(config) => (
                self.log_level.clone().unwrap_or(config.application.log_level),
                config.logging,
            ),
            Err(_) => (
                self.log_level.clone().unwrap_or_else(|| "info".to_string()),
                console_only(),
            ),
        }
    }
}

/// Logging settings without the file layer
pub fn console_only() -> LoggingConfig {
    LoggingConfig {
        local_enabled: false,
        ..Default::default()
    }
}
