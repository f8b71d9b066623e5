//! Directory service abstraction
//!
//! This module defines the trait a directory backend must implement to feed
//! the export pipeline. The pipeline only ever issues two kinds of calls: one
//! enumeration of organizational units and one bulk account read per run.

use crate::config::AttributeMapping;
use crate::domain::{AccountRecord, DistinguishedPath, Result};
use async_trait::async_trait;

/// Directory service consumed by the scope catalog and the account query
///
/// Implementations must map transport failures onto
/// [`DirectoryError`](crate::domain::DirectoryError) so that callers can tell
/// an unreachable directory from a query that ran out of time.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Distinguished paths of every organizational unit, in directory order
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the directory cannot be reached.
    async fn list_organizational_units(&self) -> Result<Vec<String>>;

    /// Reads every account below `base`, requesting only the attributes named
    /// by `projection`
    ///
    /// An empty subtree yields an empty vector. Absent attributes map to empty
    /// strings, an absent routing address list to an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` or `DirectoryError::Timeout`.
    async fn search_accounts(
        &self,
        base: &DistinguishedPath,
        projection: &AttributeMapping,
    ) -> Result<Vec<AccountRecord>>;

    /// Releases the connection; the default does nothing
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
