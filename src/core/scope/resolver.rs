//! Scope resolution
//!
//! Validates a requested scope against the catalog. Resolution never invents
//! a default: when nothing matches, the caller has to ask the operator.

use super::catalog::ScopeCatalog;
use crate::domain::OrganizationalScope;

/// Outcome of resolving a requested scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate names a catalog scope
    Resolved(OrganizationalScope),

    /// No candidate was given, or it matched nothing
    NeedsInteractiveSelection {
        /// The candidate that failed to match, if one was given
        rejected: Option<String>,
    },
}

/// Resolves `candidate` against the catalog's distinguished paths
///
/// The comparison is exact apart from ASCII case and surrounding whitespace.
/// The first matching catalog entry wins.
pub fn resolve(candidate: Option<&str>, catalog: &ScopeCatalog) -> Resolution {
    let Some(candidate) = candidate.filter(|c| !c.trim().is_empty()) else {
        return Resolution::NeedsInteractiveSelection { rejected: None };
    };

    match catalog
        .iter()
        .find(|scope| scope.distinguished_path().matches(candidate))
    {
        Some(scope) => Resolution::Resolved(scope.clone()),
        None => {
            tracing::debug!(candidate = %candidate, "Requested scope is not in the catalog");
            Resolution::NeedsInteractiveSelection {
                rejected: Some(candidate.to_string()),
            }
        }
    }
}
