//! Core business logic for Mailshift.
//!
//! This module contains the directory-to-table pipeline.
//!
//! # Modules
//!
//! - [`scope`] - Scope catalog, resolution and interactive selection
//! - [`query`] - Bulk account query
//! - [`transform`] - Routing address normalization and fixed-width shaping
//! - [`export`] - File naming, writers, run log and run coordination
//! - [`verification`] - SHA-256 checksums of written files
//!
//! # GET Workflow
//!
//! 1. **Discover**: enumerate organizational units and assign tokens
//! 2. **Resolve**: match the requested scope, or ask a [`scope::ScopeSelector`]
//! 3. **Query**: read every account below the scope (four attributes)
//! 4. **Normalize**: drop legacy X.400 routing addresses
//! 5. **Shape**: pad addresses to the run-wide width
//! 6. **Write**: attributes table, proxies table, then the run log
//!
//! # Example
//!
//! ```rust,no_run
//! use mailshift::adapters::directory::LdapDirectory;
//! use mailshift::config::load_config;
//! use mailshift::core::export::ExportCoordinator;
//! use mailshift::core::scope::NonInteractive;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("mailshift.toml")?;
//! let directory = Arc::new(LdapDirectory::connect(&config.directory).await?);
//!
//! let coordinator = ExportCoordinator::new(config, directory);
//! let summary = coordinator.execute(&mut NonInteractive).await;
//!
//! println!("Accounts: {}", summary.accounts);
//! println!("Width: {}", summary.width);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod query;
pub mod scope;
pub mod transform;
pub mod verification;
