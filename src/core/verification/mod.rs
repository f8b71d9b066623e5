//! Export file verification
//!
//! SHA-256 checksums of written export files.

pub mod checksum;

pub use checksum::{calculate_checksum_bytes, checksum_file, verify_file};
