//! Data transformation logic
//!
//! Two pure steps turn queried accounts into table rows:
//!
//! - **Normalize**: drop legacy routing addresses from each account
//! - **Shape**: pad every account's addresses to the run-wide column width
//!
//! # Examples
//!
//! ```
//! use mailshift::core::transform::{shape, AddressFilter};
//! use mailshift::domain::AccountRecord;
//!
//! let records = vec![AccountRecord::new("jsmith", "j@x.com", "jsmith")
//!     .with_routing_addresses(vec![
//!         "SMTP:j@x.com".to_string(),
//!         "X400:c=US;a=;p=Foo;".to_string(),
//!     ])];
//!
//! let (sets, excluded) = AddressFilter::default().normalize_all(&records);
//! let table = shape(&sets);
//!
//! assert_eq!(excluded, 1);
//! assert_eq!(table.width(), 1);
//! ```

pub mod normalize;
pub mod shape;

pub use normalize::{AddressFilter, DEFAULT_LEGACY_MARKER};
pub use shape::{shape, ProxyRow, ProxyTable};
