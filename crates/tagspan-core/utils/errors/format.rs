//! Parameter value error constructors
//!
//! Helpers that build `CoreError` values with the offending text and a short
//! reason, used by the typed parameter conversions in `tags::values`.

use super::CoreError;
use core::fmt;

/// Create color format error
///
/// # Examples
///
/// ```rust
/// use tagspan_core::utils::errors::{invalid_color, CoreError};
///
/// let error = invalid_color("#12", "expected 3, 6 or 8 hex digits");
/// assert!(matches!(error, CoreError::InvalidColor(_)));
/// ```
pub fn invalid_color<T: fmt::Display>(value: T, reason: &str) -> CoreError {
    CoreError::InvalidColor(format!("'{value}': {reason}"))
}

/// Create numeric parsing error with value and reason
pub fn invalid_numeric<T: fmt::Display>(value: T, reason: &str) -> CoreError {
    CoreError::InvalidNumeric(format!("'{value}': {reason}"))
}

/// Create boolean parsing error
pub fn invalid_bool<T: fmt::Display>(value: T) -> CoreError {
    CoreError::InvalidBool(format!("'{value}'"))
}

/// Create vector parsing error with value and reason
pub fn invalid_vector<T: fmt::Display>(value: T, reason: &str) -> CoreError {
    CoreError::InvalidVector(format!("'{value}': {reason}"))
}
