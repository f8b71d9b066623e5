// Mailshift - directory mailbox routing export tool
// Copyright (c) 2025 Mailshift Contributors
// Licensed under the MIT License

//! # Mailshift - directory mailbox routing export
//!
//! Mailshift extracts identity and mailbox routing attributes for the accounts
//! below an organizational unit of a directory, reshapes the variable-length
//! routing address lists into fixed-width rows, and writes versioned CSV
//! files for a later re-import into another directory-backed system.
//!
//! ## Overview
//!
//! A GET run:
//! - **Discovers** the organizational units and labels each with a token
//! - **Resolves** the requested scope, prompting when it does not match
//! - **Queries** every account below the scope for four attributes
//! - **Normalizes** routing addresses by dropping legacy X.400 entries
//! - **Shapes** the addresses to one run-wide column width
//! - **Writes** an attributes table, a proxies table and a run log
//!
//! ## Architecture
//!
//! Mailshift follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages and run coordination
//! - [`adapters`] - Directory service integration (LDAP)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mailshift::adapters::directory::LdapDirectory;
//! use mailshift::config::load_config;
//! use mailshift::core::export::ExportCoordinator;
//! use mailshift::core::scope::NonInteractive;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("mailshift.toml")?;
//!     let directory = Arc::new(LdapDirectory::connect(&config.directory).await?);
//!
//!     let summary = ExportCoordinator::new(config, directory)
//!         .execute(&mut NonInteractive)
//!         .await;
//!
//!     println!("Exported {} accounts", summary.accounts);
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Output Files
//!
//! Each file is named `<prefix>_<date>_<seq>.<ext>`, where `seq` is one more
//! than the number of files with the same prefix and date already present:
//!
//! - `ExportedAttributes_2024-01-01_1.csv`: `accountId,primaryEmail,displayAlias`
//! - `ExportedProxies_2024-01-01_1.csv`: `accountId,address_0,...`
//! - `ExportLog_2024-01-01_1.txt`: run log with file checksums
//!
//! ## Error Handling
//!
//! All fallible library calls return [`domain::Result`]. Pipeline failures
//! carry the stage they happened in, and the run summary maps them to exit
//! codes.
//!
//! ## Logging
//!
//! Mailshift uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::info;
//!
//! info!(scope = "OU=Staff,DC=example,DC=com", accounts = 42, "Account query completed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
