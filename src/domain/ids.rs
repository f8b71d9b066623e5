//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for directory identifiers.
//! Each type ensures type safety and provides validation for format compliance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distinguished path of a directory object
///
/// Identifies an organizational unit (and therefore a search scope) in the
/// directory, e.g. `OU=Staff,DC=example,DC=com`. Comparison against
/// operator input is case-insensitive, matching directory semantics.
///
/// # Examples
///
/// ```
/// use mailshift::domain::ids::DistinguishedPath;
/// use std::str::FromStr;
///
/// let path = DistinguishedPath::from_str("OU=Staff,DC=example,DC=com").unwrap();
/// assert!(path.matches("ou=staff,dc=example,dc=com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistinguishedPath(String);

impl DistinguishedPath {
    /// Creates a new DistinguishedPath from a string
    ///
    /// # Arguments
    ///
    /// * `path` - The distinguished name string
    ///
    /// # Returns
    ///
    /// Returns `Ok(DistinguishedPath)` if the path is non-empty and made of
    /// `attr=value` components, `Err` otherwise
    pub fn new(path: impl Into<String>) -> Result<Self, String> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err("Distinguished path cannot be empty".to_string());
        }

        if !path.contains('=') {
            return Err(format!(
                "Invalid distinguished path '{path}'. Expected components like OU=Name,DC=example,DC=com"
            ));
        }

        Ok(Self(path))
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Exact, case-insensitive comparison with a candidate string
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.eq_ignore_ascii_case(candidate.trim())
    }
}

impl fmt::Display for DistinguishedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DistinguishedPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DistinguishedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Selection token assigned to a scope during one catalog pass
///
/// Tokens are 1-based positions in discovery order. They are only meaningful
/// within the catalog that produced them and must never be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeToken(String);

impl ScopeToken {
    /// Creates the token for the scope at `index` (0-based) in discovery order
    pub fn from_index(index: usize) -> Self {
        Self((index + 1).to_string())
    }

    /// Returns the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
