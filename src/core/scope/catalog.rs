//! Scope catalog
//!
//! Enumerates the organizational units a run may be scoped to and labels
//! each with a selection token.

use crate::adapters::directory::DirectoryService;
use crate::domain::{DistinguishedPath, OrganizationalScope, Result, ScopeToken};

/// Scopes discovered in one catalog pass, in directory order
#[derive(Debug, Clone, Default)]
pub struct ScopeCatalog {
    scopes: Vec<OrganizationalScope>,
}

impl ScopeCatalog {
    /// Enumerates every organizational unit in the directory
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory cannot be reached.
    pub async fn discover(directory: &dyn DirectoryService) -> Result<Self> {
        let paths = directory.list_organizational_units().await?;
        let catalog = Self::from_paths(paths);

        tracing::info!(scopes = catalog.len(), "Discovered organizational scopes");
        Ok(catalog)
    }

    /// Builds a catalog from distinguished paths in discovery order
    ///
    /// Paths that are not distinguished names are skipped; tokens are assigned
    /// to the remaining scopes, starting at 1.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scopes = paths
            .into_iter()
            .filter_map(|path| match DistinguishedPath::new(path) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping directory entry without a usable path");
                    None
                }
            })
            .enumerate()
            .map(|(index, path)| OrganizationalScope::new(ScopeToken::from_index(index), path))
            .collect();

        Self { scopes }
    }

    /// Looks a scope up by its selection token
    pub fn by_token(&self, token: &str) -> Option<&OrganizationalScope> {
        let token = token.trim();
        self.scopes.iter().find(|scope| scope.token().as_str() == token)
    }

    /// Scopes in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &OrganizationalScope> {
        self.scopes.iter()
    }

    /// Number of scopes
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true when the directory reported no organizational units
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
