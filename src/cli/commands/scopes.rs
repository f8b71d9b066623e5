//! Scopes command implementation
//!
//! This module implements the `scopes` command, which prints the scope
//! catalog so an operator can pick a distinguished name for `export --scope`.

use crate::adapters::directory::{DirectoryService, LdapDirectory};
use crate::config::load_config;
use crate::core::scope::ScopeCatalog;
use clap::Args;

/// Arguments for the scopes command
#[derive(Args, Debug)]
pub struct ScopesArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScopesArgs {
    /// Execute the scopes command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let directory = match LdapDirectory::connect(&config.directory).await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to directory");
                eprintln!("Failed to connect to directory: {e}");
                return Ok(if e.is_timeout() { 4 } else { 3 });
            }
        };

        let catalog = ScopeCatalog::discover(&directory).await;
        if let Err(e) = directory.close().await {
            tracing::warn!(error = %e, "Failed to close directory connection");
        }

        let catalog = match catalog {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Scope discovery failed: {e}");
                return Ok(if e.is_timeout() { 4 } else { 3 });
            }
        };

        if self.json {
            let scopes: Vec<_> = catalog
                .iter()
                .map(|scope| {
                    serde_json::json!({
                        "token": scope.token().as_str(),
                        "distinguished_path": scope.distinguished_path().as_str(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&scopes)?);
        } else if catalog.is_empty() {
            println!("No organizational units found below {}", config.directory.base_dn);
        } else {
            for scope in catalog.iter() {
                println!("  [{}] {}", scope.token(), scope);
            }
        }

        Ok(0)
    }
}
