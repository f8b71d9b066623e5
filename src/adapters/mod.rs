//! External system integrations for Mailshift.
//!
//! - [`directory`] - Directory service access (trait-based, LDAP implementation)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! pipeline can be exercised against in-memory implementations.
//!
//! ```rust,no_run
//! use mailshift::adapters::directory::{DirectoryService, LdapDirectory};
//! use mailshift::config::DirectoryConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DirectoryConfig {
//!     url: "ldaps://dc01.example.com:636".to_string(),
//!     base_dn: "DC=example,DC=com".to_string(),
//!     ..DirectoryConfig::default()
//! };
//!
//! let directory = LdapDirectory::connect(&config).await?;
//! let units = directory.list_organizational_units().await?;
//! println!("{} organizational units", units.len());
//! # Ok(())
//! # }
//! ```

pub mod directory;
