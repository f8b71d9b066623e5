//! Result type alias for Mailshift
//!
//! This module provides a convenient Result type alias that uses
//! MailshiftError as the error type.

use super::errors::MailshiftError;

/// Result type alias for Mailshift operations
///
/// # Examples
///
/// ```
/// use mailshift::domain::result::Result;
/// use mailshift::domain::errors::MailshiftError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MailshiftError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MailshiftError>;
