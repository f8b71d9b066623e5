//! Import command implementation
//!
//! Re-importing export files into the target system (PUT) is not
//! implemented. The command exists so the operation mode has an entry point
//! and reports that clearly.

use clap::Args;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Attributes table to import
    #[arg(long)]
    pub attributes: Option<String>,

    /// Proxies table to import
    #[arg(long)]
    pub proxies: Option<String>,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::warn!(
            attributes = self.attributes.as_deref().unwrap_or("-"),
            proxies = self.proxies.as_deref().unwrap_or("-"),
            "PUT requested but re-import is not implemented"
        );

        eprintln!("Re-import (PUT) is not implemented.");
        eprintln!("Export files can be verified with the sha256 values recorded in the run log.");
        Ok(2)
    }
}
