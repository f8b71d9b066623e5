//! Routing address normalization
//!
//! Drops legacy X.400-style entries from an account's routing addresses and
//! keeps everything else in source order.

use crate::domain::{AccountRecord, NormalizedAddressSet};

/// Marker identifying legacy routing addresses
pub const DEFAULT_LEGACY_MARKER: &str = "X400";

/// Exclusion rule for routing addresses
///
/// An address is excluded when it contains the marker anywhere in its value.
/// Without case sensitivity only ASCII letters are folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFilter {
    marker: String,
    case_sensitive: bool,
}

impl AddressFilter {
    /// Creates a filter for `marker`
    pub fn new(marker: impl Into<String>, case_sensitive: bool) -> Self {
        let marker = marker.into();
        let marker = if case_sensitive {
            marker
        } else {
            marker.to_ascii_lowercase()
        };

        Self {
            marker,
            case_sensitive,
        }
    }

    /// Returns true if `address` matches the exclusion rule
    pub fn excludes(&self, address: &str) -> bool {
        if self.case_sensitive {
            address.contains(&self.marker)
        } else {
            address.to_ascii_lowercase().contains(&self.marker)
        }
    }

    /// Filters one record's routing addresses
    pub fn normalize(&self, record: &AccountRecord) -> NormalizedAddressSet {
        NormalizedAddressSet {
            account_id: record.account_id.clone(),
            addresses: record
                .routing_addresses
                .iter()
                .filter(|address| !self.excludes(address))
                .cloned()
                .collect(),
        }
    }

    /// Filters every record, returning the sets and the number of excluded addresses
    pub fn normalize_all(&self, records: &[AccountRecord]) -> (Vec<NormalizedAddressSet>, usize) {
        let mut excluded = 0;
        let sets = records
            .iter()
            .map(|record| {
                let set = self.normalize(record);
                excluded += record.routing_addresses.len() - set.len();
                set
            })
            .collect();

        (sets, excluded)
    }
}

impl Default for AddressFilter {
    fn default() -> Self {
        Self::new(DEFAULT_LEGACY_MARKER, true)
    }
}
