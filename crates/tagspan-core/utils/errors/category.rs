//! Error categorization for tagspan errors
//!
//! Groups errors for filtering and for deciding how to surface them to the
//! author of the markup.

use super::CoreError;
use core::fmt;

/// Error category for filtering and user interface organization
///
/// # Examples
///
/// ```rust
/// use tagspan_core::utils::errors::{CoreError, ErrorCategory};
///
/// let error = CoreError::config("empty verbatim tag");
/// assert_eq!(error.category(), ErrorCategory::Configuration);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Parameter value conversion problems
    ///
    /// The tag was well formed but one of its values has the wrong shape.
    Format,

    /// Configuration and category registration problems
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ErrorCategory {
    /// Get human-readable category name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Configuration => "configuration",
        }
    }
}

impl CoreError {
    /// Get error category for filtering/grouping
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidNumeric(_)
            | Self::InvalidColor(_)
            | Self::InvalidBool(_)
            | Self::InvalidVector(_)
            | Self::MissingParameter(_) => ErrorCategory::Format,
            Self::Config(_) | Self::Category(_) => ErrorCategory::Configuration,
        }
    }

    /// Get suggested action for this error
    ///
    /// Returns `None` for errors that don't have a standard fix.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidColor(_) => Some("Use '#RRGGBB', '#RRGGBBAA' or a color name"),
            Self::InvalidNumeric(_) => Some("Check numeric format and range"),
            Self::InvalidBool(_) => Some("Use one of true/false, 1/0, yes/no"),
            Self::InvalidVector(_) => Some("Use '(x,y)' or 'x,y'"),
            Self::Category(_) => Some("Register each category under a unique name"),
            _ => None,
        }
    }
}
