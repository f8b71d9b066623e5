//! Bulk account query
//!
//! Issues the single account read of a run against the resolved scope.

use crate::adapters::directory::DirectoryService;
use crate::config::AttributeMapping;
use crate::domain::{AccountRecord, OrganizationalScope, Result, RunStage};
use std::sync::Arc;
use std::time::Instant;

/// Account query bound to a directory and an attribute projection
pub struct AccountQuery {
    directory: Arc<dyn DirectoryService>,
    projection: AttributeMapping,
}

impl AccountQuery {
    /// Creates a query requesting the attributes named in `projection`
    pub fn new(directory: Arc<dyn DirectoryService>, projection: AttributeMapping) -> Self {
        Self {
            directory,
            projection,
        }
    }

    /// Reads every account below `scope`
    ///
    /// An empty scope yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns a directory error wrapped in the `account-query` stage.
    pub async fn execute(&self, scope: &OrganizationalScope) -> Result<Vec<AccountRecord>> {
        let start = Instant::now();
        tracing::info!(
            scope = %scope,
            attributes = ?self.projection.projection(),
            "Querying accounts"
        );

        let records = self
            .directory
            .search_accounts(scope.distinguished_path(), &self.projection)
            .await
            .map_err(|e| e.in_stage(RunStage::AccountQuery))?;

        tracing::info!(
            scope = %scope,
            accounts = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Account query completed"
        );

        Ok(records)
    }
}
