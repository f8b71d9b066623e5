//! Organizational scope domain model
//!
//! This module defines the search scope an account query is bounded by.

use super::ids::{DistinguishedPath, ScopeToken};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directory subtree that bounds an account query
///
/// Identity is the distinguished path; the token is a label assigned by the
/// catalog pass that discovered the scope and is only used for interactive
/// selection.
///
/// # Examples
///
/// ```
/// use mailshift::domain::scope::OrganizationalScope;
/// use mailshift::domain::ids::{DistinguishedPath, ScopeToken};
///
/// let scope = OrganizationalScope::new(
///     ScopeToken::from_index(0),
///     DistinguishedPath::new("OU=Staff,DC=example,DC=com").unwrap(),
/// );
/// assert_eq!(scope.token().as_str(), "1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationalScope {
    token: ScopeToken,
    distinguished_path: DistinguishedPath,
}

impl OrganizationalScope {
    /// Creates a scope from its catalog token and distinguished path
    pub fn new(token: ScopeToken, distinguished_path: DistinguishedPath) -> Self {
        Self {
            token,
            distinguished_path,
        }
    }

    /// Catalog-pass-local selection token
    pub fn token(&self) -> &ScopeToken {
        &self.token
    }

    /// Distinguished path identifying the scope
    pub fn distinguished_path(&self) -> &DistinguishedPath {
        &self.distinguished_path
    }
}

// Scopes are the same scope when they name the same subtree, whatever token
// the catalog pass handed out
impl PartialEq for OrganizationalScope {
    fn eq(&self, other: &Self) -> bool {
        self.distinguished_path == other.distinguished_path
    }
}

impl Eq for OrganizationalScope {}

impl fmt::Display for OrganizationalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.distinguished_path)
    }
}
