//! Fixed-width shaping of routing addresses
//!
//! The proxies table has one column per address slot. The number of slots is
//! the largest kept address count in the run, so every row can be written
//! with the same header.

use crate::domain::NormalizedAddressSet;

/// Name of the account column in the proxies table
pub const ACCOUNT_COLUMN: &str = "accountId";

/// One proxies table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRow {
    /// Account identifier
    pub account_id: String,

    /// Exactly `width` fields, kept addresses first, then empty strings
    pub fields: Vec<String>,
}

impl ProxyRow {
    /// The non-empty address fields in column order
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(String::as_str)
            .filter(|field| !field.is_empty())
    }

    /// Account id followed by the address fields, as written to the table
    pub fn record(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.account_id.as_str()).chain(self.fields.iter().map(String::as_str))
    }
}

/// Proxies table with a uniform column count
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxyTable {
    width: usize,
    rows: Vec<ProxyRow>,
}

impl ProxyTable {
    /// Number of address columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in account order
    pub fn rows(&self) -> &[ProxyRow] {
        &self.rows
    }

    /// Header row: `accountId,address_0,...,address_{width-1}`
    pub fn header(&self) -> Vec<String> {
        std::iter::once(ACCOUNT_COLUMN.to_string())
            .chain((0..self.width).map(|i| format!("address_{i}")))
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the run had no accounts
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Computes the column width over all sets, then pads every row to it
///
/// The width is fixed before the first row is built. An empty input has
/// width 0.
pub fn shape(sets: &[NormalizedAddressSet]) -> ProxyTable {
    let width = sets.iter().map(NormalizedAddressSet::len).max().unwrap_or(0);

    let rows = sets
        .iter()
        .map(|set| {
            let mut fields = set.addresses.clone();
            fields.resize(width, String::new());
            ProxyRow {
                account_id: set.account_id.clone(),
                fields,
            }
        })
        .collect();

    ProxyTable { width, rows }
}
