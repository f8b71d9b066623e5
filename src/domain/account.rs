//! Account domain models
//!
//! This module defines the account record returned by the directory, the
//! normalized routing address set derived from it, and the attribute row
//! written to the attributes export table.

use serde::{Deserialize, Serialize};

/// One account as returned by the directory query
///
/// Carries exactly the four projected attributes. Routing addresses keep the
/// order the directory returned them in; each entry is tagged by a type
/// prefix such as `SMTP:`, `smtp:` or `X400:`.
///
/// # Examples
///
/// ```
/// use mailshift::domain::account::AccountRecord;
///
/// let record = AccountRecord::new("jsmith", "j@x.com", "jsmith")
///     .with_routing_addresses(vec!["SMTP:j@x.com".to_string()]);
/// assert_eq!(record.routing_addresses.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account identifier (logon name)
    pub account_id: String,

    /// Primary email address
    pub primary_email: String,

    /// Display alias (mail nickname)
    pub display_alias: String,

    /// Routing addresses in directory order; absent lists are empty
    #[serde(default)]
    pub routing_addresses: Vec<String>,
}

impl AccountRecord {
    /// Creates a record with no routing addresses
    pub fn new(
        account_id: impl Into<String>,
        primary_email: impl Into<String>,
        display_alias: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            primary_email: primary_email.into(),
            display_alias: display_alias.into(),
            routing_addresses: Vec::new(),
        }
    }

    /// Sets the routing addresses
    pub fn with_routing_addresses(mut self, addresses: Vec<String>) -> Self {
        self.routing_addresses = addresses;
        self
    }

    /// Projects the record onto the attributes table row
    pub fn attribute_row(&self) -> AttributeRow {
        AttributeRow {
            account_id: self.account_id.clone(),
            primary_email: self.primary_email.clone(),
            display_alias: self.display_alias.clone(),
        }
    }
}

/// Routing addresses of one account after the exclusion rule was applied
///
/// `addresses` is always a subsequence of the source record's routing
/// addresses, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddressSet {
    /// Account identifier the addresses belong to
    pub account_id: String,

    /// Kept addresses in source order
    pub addresses: Vec<String>,
}

impl NormalizedAddressSet {
    /// Number of kept addresses
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns true if every address was excluded or none existed
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Row of the attributes export table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRow {
    #[serde(rename = "accountId")]
    pub account_id: String,

    #[serde(rename = "primaryEmail")]
    pub primary_email: String,

    #[serde(rename = "displayAlias")]
    pub display_alias: String,
}

impl AttributeRow {
    /// Header of the attributes table
    pub const HEADER: [&'static str; 3] = ["accountId", "primaryEmail", "displayAlias"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_record_defaults_to_no_addresses() {
        let record = AccountRecord::new("jsmith", "j@x.com", "jsmith");
        assert!(record.routing_addresses.is_empty());
    }

    #[test]
    fn test_attribute_row_projection() {
        let record = AccountRecord::new("jsmith", "j@x.com", "John S")
            .with_routing_addresses(vec!["SMTP:j@x.com".to_string()]);
        let row = record.attribute_row();

        assert_eq!(row.account_id, "jsmith");
        assert_eq!(row.primary_email, "j@x.com");
        assert_eq!(row.display_alias, "John S");
    }

    #[test]
    fn test_record_without_address_field_deserializes_empty() {
        let json = r#"{"account_id":"a","primary_email":"","display_alias":""}"#;
        let record: AccountRecord = serde_json::from_str(json).unwrap();
        assert!(record.routing_addresses.is_empty());
    }
}
