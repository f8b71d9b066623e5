//! Domain error types
//!
//! This module defines the error hierarchy for Mailshift. All errors are
//! domain-specific and don't expose third-party types.

use std::fmt;
use thiserror::Error;

/// Main Mailshift error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MailshiftError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Directory service errors
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// I/O errors (unwritable export target, unreadable working directory)
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A pipeline stage failed; carries the stage for the run log
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: RunStage,
        #[source]
        source: Box<MailshiftError>,
    },
}

impl MailshiftError {
    /// Wraps this error with the pipeline stage it occurred in
    pub fn in_stage(self, stage: RunStage) -> Self {
        match self {
            // Keep the innermost stage; re-wrapping would hide where it failed
            MailshiftError::Stage { .. } => self,
            other => MailshiftError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Returns the stage the error was raised in, if known
    pub fn stage(&self) -> Option<RunStage> {
        match self {
            MailshiftError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns the underlying error with any stage context stripped
    pub fn root(&self) -> &MailshiftError {
        match self {
            MailshiftError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// The directory could not be reached or lacks the query capability
    pub fn is_directory_unavailable(&self) -> bool {
        matches!(
            self.root(),
            MailshiftError::Directory(DirectoryError::Unavailable(_))
        )
    }

    /// The bulk query did not complete in time
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.root(),
            MailshiftError::Directory(DirectoryError::Timeout(_))
        )
    }

    /// An export target could not be written
    pub fn is_io_failure(&self) -> bool {
        matches!(self.root(), MailshiftError::Io(_))
    }
}

/// Directory service errors
///
/// Errors that occur when talking to the directory. These errors don't
/// expose the LDAP client's types.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Directory unreachable, bind rejected, or query capability missing
    #[error("Directory service unavailable: {0}")]
    Unavailable(String),

    /// Operation did not complete within the configured timeout
    #[error("Directory query timed out: {0}")]
    Timeout(String),

    /// Directory answered the query with a failure result
    #[error("Directory query failed: {0}")]
    QueryFailed(String),
}

/// Stage of a GET run, used to label failures and run log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStage {
    /// Enumerating organizational scopes
    ScopeDiscovery,
    /// Matching the requested scope against the catalog
    ScopeResolution,
    /// Bulk account query
    AccountQuery,
    /// Routing address filtering
    Normalization,
    /// Column width computation and row shaping
    Shaping,
    /// Writing export files
    Writing,
}

impl RunStage {
    /// Returns the stage name as written to the run log
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStage::ScopeDiscovery => "scope-discovery",
            RunStage::ScopeResolution => "scope-resolution",
            RunStage::AccountQuery => "account-query",
            RunStage::Normalization => "normalization",
            RunStage::Shaping => "shaping",
            RunStage::Writing => "writing",
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MailshiftError {
    fn from(err: std::io::Error) -> Self {
        MailshiftError::Io(err.to_string())
    }
}

// Conversion from csv::Error; writer failures are I/O failures unless they
// are pure serialization problems
impl From<csv::Error> for MailshiftError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            MailshiftError::Io(err.to_string())
        } else {
            MailshiftError::Serialization(err.to_string())
        }
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MailshiftError {
    fn from(err: serde_json::Error) -> Self {
        MailshiftError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MailshiftError {
    fn from(err: toml::de::Error) -> Self {
        MailshiftError::Configuration(format!("TOML parse error: {err}"))
    }
}
