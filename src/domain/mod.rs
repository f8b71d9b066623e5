//! Domain models and types for Mailshift.
//!
//! This module contains the core domain models, types, and error hierarchy.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DistinguishedPath`], [`ScopeToken`])
//! - **Domain models** ([`OrganizationalScope`], [`AccountRecord`], [`NormalizedAddressSet`])
//! - **Error types** ([`MailshiftError`], [`DirectoryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MailshiftError>`]. Pipeline
//! failures carry the [`RunStage`] they happened in:
//!
//! ```rust
//! use mailshift::domain::{DirectoryError, MailshiftError, RunStage};
//!
//! let err = MailshiftError::from(DirectoryError::Timeout("120s".to_string()))
//!     .in_stage(RunStage::AccountQuery);
//! assert!(err.is_timeout());
//! assert_eq!(err.stage(), Some(RunStage::AccountQuery));
//! ```

pub mod account;
pub mod errors;
pub mod ids;
pub mod result;
pub mod scope;

// Re-export commonly used types for convenience
pub use account::{AccountRecord, AttributeRow, NormalizedAddressSet};
pub use errors::{DirectoryError, MailshiftError, RunStage};
pub use ids::{DistinguishedPath, ScopeToken};
pub use result::Result;
pub use scope::OrganizationalScope;
