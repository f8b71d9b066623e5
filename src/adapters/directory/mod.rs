//! Directory service integration
//!
//! - [`traits`] - The [`DirectoryService`] trait the pipeline consumes
//! - [`ldap`] - LDAP / Active Directory implementation

pub mod ldap;
pub mod traits;

pub use ldap::LdapDirectory;
pub use traits::DirectoryService;
