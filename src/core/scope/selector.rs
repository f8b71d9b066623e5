//! Interactive scope selection
//!
//! The pipeline never prompts by itself. When a requested scope does not
//! resolve it hands the catalog to a [`ScopeSelector`], which returns either a
//! new candidate or a cancellation. The candidate is resolved again, so a
//! selector can never inject a scope that is not in the catalog.

use super::catalog::ScopeCatalog;
use super::resolver::{resolve, Resolution};
use crate::domain::{MailshiftError, OrganizationalScope, Result};

/// Answer from a scope selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A selection token or distinguished path to resolve
    Candidate(String),

    /// The operator abandoned the run
    Cancelled,
}

/// Source of a scope when the requested one does not resolve
pub trait ScopeSelector {
    /// Asks for a scope from `catalog`
    ///
    /// `rejected` carries the previous candidate when it failed to match.
    fn select(&mut self, catalog: &ScopeCatalog, rejected: Option<&str>) -> Result<Selection>;
}

/// Selector for unattended runs; refuses to pick a scope
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl ScopeSelector for NonInteractive {
    fn select(&mut self, _catalog: &ScopeCatalog, rejected: Option<&str>) -> Result<Selection> {
        Err(MailshiftError::Validation(match rejected {
            Some(candidate) => format!(
                "search scope '{candidate}' is not an organizational unit in the directory"
            ),
            None => "no search scope configured and interactive selection is disabled".to_string(),
        }))
    }
}

/// Resolves `requested`, consulting `selector` until a catalog scope matches
///
/// Returns `Ok(None)` when the selector cancels.
///
/// # Errors
///
/// Fails when the catalog is empty or the selector fails.
pub fn select_scope(
    requested: Option<&str>,
    catalog: &ScopeCatalog,
    selector: &mut dyn ScopeSelector,
) -> Result<Option<OrganizationalScope>> {
    let mut candidate = requested.map(str::to_string);

    loop {
        let rejected = match resolve(candidate.as_deref(), catalog) {
            Resolution::Resolved(scope) => return Ok(Some(scope)),
            Resolution::NeedsInteractiveSelection { rejected } => rejected,
        };

        if catalog.is_empty() {
            return Err(MailshiftError::Validation(
                "the directory reported no organizational units to select from".to_string(),
            ));
        }

        match selector.select(catalog, rejected.as_deref())? {
            Selection::Cancelled => {
                tracing::info!("Scope selection cancelled");
                return Ok(None);
            }
            Selection::Candidate(answer) => {
                // A token is shorthand for its distinguished path
                candidate = Some(match catalog.by_token(&answer) {
                    Some(scope) => scope.distinguished_path().to_string(),
                    None => answer,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted {
        answers: VecDeque<Selection>,
        rejected: Vec<Option<String>>,
    }

    impl Scripted {
        fn new(answers: Vec<Selection>) -> Self {
            Self {
                answers: answers.into(),
                rejected: Vec::new(),
            }
        }
    }

    impl ScopeSelector for Scripted {
        fn select(&mut self, _catalog: &ScopeCatalog, rejected: Option<&str>) -> Result<Selection> {
            self.rejected.push(rejected.map(str::to_string));
            Ok(self.answers.pop_front().unwrap_or(Selection::Cancelled))
        }
    }

    fn catalog() -> ScopeCatalog {
        ScopeCatalog::from_paths(vec![
            "OU=Staff,DC=example,DC=com",
            "OU=Contractors,DC=example,DC=com",
        ])
    }

    #[test]
    fn test_resolved_request_skips_selector() {
        let mut selector = Scripted::new(vec![]);
        let scope = select_scope(Some("ou=staff,dc=example,dc=com"), &catalog(), &mut selector)
            .unwrap()
            .unwrap();

        assert_eq!(scope.token().as_str(), "1");
        assert!(selector.rejected.is_empty());
    }

    #[test]
    fn test_token_selection() {
        let mut selector = Scripted::new(vec![Selection::Candidate("2".to_string())]);
        let scope = select_scope(None, &catalog(), &mut selector).unwrap().unwrap();

        assert_eq!(
            scope.distinguished_path().as_str(),
            "OU=Contractors,DC=example,DC=com"
        );
        assert_eq!(selector.rejected, vec![None]);
    }

    #[test]
    fn test_reprompts_until_match() {
        let mut selector = Scripted::new(vec![
            Selection::Candidate("OU=Nowhere,DC=example,DC=com".to_string()),
            Selection::Candidate("OU=Staff,DC=example,DC=com".to_string()),
        ]);
        let scope = select_scope(Some("bogus"), &catalog(), &mut selector)
            .unwrap()
            .unwrap();

        assert_eq!(scope.token().as_str(), "1");
        assert_eq!(
            selector.rejected,
            vec![
                Some("bogus".to_string()),
                Some("OU=Nowhere,DC=example,DC=com".to_string())
            ]
        );
    }

    #[test]
    fn test_cancellation() {
        let mut selector = Scripted::new(vec![Selection::Cancelled]);
        assert!(select_scope(None, &catalog(), &mut selector).unwrap().is_none());
    }

    #[test]
    fn test_non_interactive_rejects_unknown_scope() {
        let err = select_scope(Some("OU=Gone,DC=example,DC=com"), &catalog(), &mut NonInteractive)
            .unwrap_err();

        assert!(matches!(err, MailshiftError::Validation(ref msg) if msg.contains("OU=Gone")));
    }

    #[test]
    fn test_empty_catalog_fails() {
        let mut selector = Scripted::new(vec![]);
        let result = select_scope(None, &ScopeCatalog::default(), &mut selector);

        assert!(result.is_err());
        assert!(selector.rejected.is_empty());
    }
}
