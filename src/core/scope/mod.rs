//! Scope discovery, resolution and selection

pub mod catalog;
pub mod resolver;
pub mod selector;

pub use catalog::ScopeCatalog;
pub use resolver::{resolve, Resolution};
pub use selector::{select_scope, NonInteractive, ScopeSelector, Selection};
