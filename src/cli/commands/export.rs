//! Export command implementation
//!
//! This module implements the `export` command, which runs the GET pipeline
//! against the configured directory and writes the export files.

use crate::adapters::directory::{DirectoryService, LdapDirectory};
use crate::cli::prompt::PromptSelector;
use crate::config::{load_config, OperationMode};
use crate::core::export::{ExportCoordinator, RunState, RunSummary};
use crate::core::scope::{NonInteractive, ScopeSelector};
use crate::domain::MailshiftError;
use clap::Args;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Distinguished name of the organizational unit to export
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Override the working directory receiving the export files
    #[arg(short, long)]
    pub working_dir: Option<String>,

    /// Never prompt; fail if the scope does not resolve
    #[arg(short, long)]
    pub yes: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(scope) = &self.scope {
            tracing::info!(scope = %scope, "Overriding search scope from CLI");
            config.export.search_scope = Some(scope.clone());
        }

        if let Some(dir) = &self.working_dir {
            tracing::info!(working_directory = %dir, "Overriding working directory from CLI");
            config.export.working_directory = dir.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.operation_mode == OperationMode::Put {
            eprintln!("Operation mode PUT is not implemented; use 'mailshift import' for details.");
            return Ok(2);
        }

        if let Err(e) = std::fs::create_dir_all(&config.export.working_directory) {
            tracing::error!(
                working_directory = %config.export.working_directory,
                error = %e,
                "Cannot create working directory"
            );
            eprintln!(
                "Cannot create working directory {}: {e}",
                config.export.working_directory
            );
            return Ok(5);
        }

        // Connect to the directory
        tracing::info!(url = %config.directory.url, "Connecting to directory");
        let directory = match LdapDirectory::connect(&config.directory).await {
            Ok(d) => Arc::new(d),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to directory");
                eprintln!("Failed to connect to directory: {e}");
                return Ok(connect_failure_code(&e));
            }
        };

        let mut selector: Box<dyn ScopeSelector> = if self.yes {
            Box::new(NonInteractive)
        } else {
            Box::new(PromptSelector::stdio())
        };

        let coordinator = ExportCoordinator::new(config, directory.clone());
        let summary = coordinator.execute(selector.as_mut()).await;

        if let Err(e) = directory.close().await {
            tracing::warn!(error = %e, "Failed to close directory connection");
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        Ok(summary.exit_code())
    }
}

fn connect_failure_code(error: &MailshiftError) -> i32 {
    if error.is_directory_unavailable() {
        3
    } else if error.is_timeout() {
        4
    } else {
        5
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Export Summary:");
    println!("  Run: {}", summary.run_id);
    println!("  Scope: {}", summary.scope.as_deref().unwrap_or("-"));
    println!("  Accounts: {}", summary.accounts);
    println!("  Address columns: {}", summary.width);
    println!("  Legacy addresses excluded: {}", summary.addresses_excluded);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.files.is_empty() {
        println!("  Files:");
        for file in &summary.files {
            println!("    - {} ({})", file.path.display(), file.kind);
            println!("      sha256 {}", file.sha256);
        }
    }
    println!();

    if !summary.errors.is_empty() {
        println!("Errors encountered:");
        for error in &summary.errors {
            println!(
                "  - {:?} in {}: {}",
                error.error_type,
                error.stage.map_or("run", |s| s.as_str()),
                error.message
            );
        }
        println!();
    }

    match summary.state {
        RunState::Written if summary.is_successful() => {
            println!("Export completed successfully.")
        }
        RunState::Cancelled => println!("Export cancelled; only the run log was written."),
        RunState::PartiallyWritten => {
            println!("Export terminated after writing some files; they were left in place.")
        }
        _ if summary.exit_code() == 3 => println!(
            "The directory query capability is unavailable; the legacy single-file export is not supported by this tool."
        ),
        _ => println!("Export failed."),
    }
}
