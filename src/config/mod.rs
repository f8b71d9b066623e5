//! Configuration management for Mailshift.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Mailshift uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MAILSHIFT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and operation mode (get or put)
//! - [`DirectoryConfig`] - Directory connection, filters and attribute projection
//! - [`ExportConfig`] - Working directory, search scope, file naming and address filtering
//! - [`LoggingConfig`] - Diagnostic log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! operation_mode = "get"
//!
//! [directory]
//! url = "ldaps://dc01.example.com:636"
//! bind_dn = "CN=svc-mailshift,OU=Service Accounts,DC=example,DC=com"
//! bind_password = "${MAILSHIFT_BIND_PASSWORD}"
//! base_dn = "DC=example,DC=com"
//!
//! [export]
//! working_directory = "/srv/mailshift/exports"
//! search_scope = "OU=Staff,DC=example,DC=com"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mailshift::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("mailshift.toml")?;
//! println!("Directory: {}", config.directory.url);
//! println!("Working directory: {}", config.export.working_directory);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AttributeMapping, DirectoryConfig, Environment, ExportConfig,
    LoggingConfig, MailshiftConfig, OperationMode,
};
pub use secret::{secret_string, SecretString, SecretValue};
