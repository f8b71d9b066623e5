//! Checksum calculation for export files
//!
//! The re-import side receives the export files out of band; the SHA-256 of
//! each file is recorded in the run log so it can check them before loading.

use crate::domain::{MailshiftError, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use mailshift::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"accountId,primaryEmail,displayAlias\r\n");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    format!("{result:x}")
}

/// Calculate SHA-256 checksum of a file on disk
///
/// # Errors
///
/// Returns `MailshiftError::Io` if the file cannot be read.
pub fn checksum_file(path: &Path) -> Result<String> {
    let data = std::fs::read(path)
        .map_err(|e| MailshiftError::Io(format!("{}: {e}", path.display())))?;
    Ok(calculate_checksum_bytes(&data))
}

/// Returns true if the file at `path` still hashes to `expected`
///
/// # Errors
///
/// Returns `MailshiftError::Io` if the file cannot be read.
pub fn verify_file(path: &Path, expected: &str) -> Result<bool> {
    Ok(checksum_file(path)?.eq_ignore_ascii_case(expected))
}
