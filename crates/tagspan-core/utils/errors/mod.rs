//! Error types for tagspan and cross-module error handling
//!
//! Provides the main `CoreError` enum, its categorization and the
//! constructors used when converting tag parameter values.
//!
//! # Examples
//!
//! ```rust
//! use tagspan_core::utils::errors::{CoreError, ErrorCategory};
//!
//! let err = CoreError::invalid_numeric("abc", "not a number");
//! assert_eq!(err.category(), ErrorCategory::Format);
//! assert!(err.suggestion().is_some());
//! ```

mod category;
mod core;
mod format;

pub use self::category::ErrorCategory;
pub use self::core::{CoreError, Result};
pub use self::format::{invalid_bool, invalid_color, invalid_numeric, invalid_vector};

impl CoreError {
    /// Create color error from invalid format
    pub fn invalid_color<T: ::core::fmt::Display>(value: T, reason: &str) -> Self {
        format::invalid_color(value, reason)
    }

    /// Create numeric error from parsing failure
    pub fn invalid_numeric<T: ::core::fmt::Display>(value: T, reason: &str) -> Self {
        format::invalid_numeric(value, reason)
    }
}

/// Convert from integer parse errors
impl From<::core::num::ParseIntError> for CoreError {
    fn from(err: ::core::num::ParseIntError) -> Self {
        Self::InvalidNumeric(format!("Integer parse error: {err}"))
    }
}

/// Convert from float parse errors
impl From<::core::num::ParseFloatError> for CoreError {
    fn from(err: ::core::num::ParseFloatError) -> Self {
        Self::InvalidNumeric(format!("Float parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_creation_methods() {
        assert!(matches!(CoreError::config("m"), CoreError::Config(_)));
        assert!(matches!(
            CoreError::invalid_color("#zz", "bad digit"),
            CoreError::InvalidColor(_)
        ));
        assert!(matches!(
            CoreError::invalid_numeric("x", "nan"),
            CoreError::InvalidNumeric(_)
        ));
    }

    #[test]
    fn error_display() {
        let error = CoreError::invalid_color("#zz", "bad digit");
        let display_str = format!("{error}");
        assert!(display_str.contains("Invalid color format"));
        assert!(display_str.contains("#zz"));
    }

    #[test]
    fn error_conversion() {
        let parse_int_err = "abc".parse::<i32>().unwrap_err();
        let core_err: CoreError = parse_int_err.into();
        assert!(matches!(core_err, CoreError::InvalidNumeric(_)));

        let parse_float_err = "xyz".parse::<f32>().unwrap_err();
        let core_err: CoreError = parse_float_err.into();
        assert!(matches!(core_err, CoreError::InvalidNumeric(_)));
    }

    #[test]
    fn error_properties() {
        let error = CoreError::invalid_color("#zz", "bad digit");
        assert_eq!(error.category(), ErrorCategory::Format);
        assert!(error.suggestion().is_some());
        assert_eq!(
            CoreError::MissingParameter("amp".to_string()).category(),
            ErrorCategory::Format
        );
    }
}
