//! Core error type for tagspan operations
//!
//! Provides the main `CoreError` enum shared by the tokenizer, parameter
//! conversion, configuration and policy registration layers.
//!
//! # Error Philosophy
//!
//! - Use `thiserror` for structured error handling (no `anyhow` bloat)
//! - Malformed or rejected tags are never errors: they become literal text
//! - Registry contract violations panic instead of returning an error
//! - Every `CoreError` is caller-fixable: a bad parameter value or a bad config

use core::fmt;
use thiserror::Error;

/// Main error type for tagspan core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Numeric parameter value could not be converted
    #[error("Invalid numeric value: {0}")]
    InvalidNumeric(String),

    /// Color parameter value could not be converted
    #[error("Invalid color format: {0}")]
    InvalidColor(String),

    /// Boolean parameter value could not be converted
    #[error("Invalid boolean value: {0}")]
    InvalidBool(String),

    /// Vector parameter value could not be converted
    #[error("Invalid vector value: {0}")]
    InvalidVector(String),

    /// A required parameter is absent from a tag
    #[error("Missing parameter '{0}'")]
    MissingParameter(String),

    /// Preprocessor or pipeline configuration is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Category registration errors
    #[error("Category error: {0}")]
    Category(String),
}

impl CoreError {
    /// Create configuration error from message
    pub fn config<T: fmt::Display>(message: T) -> Self {
        Self::Config(message.to_string())
    }

    /// Create category registration error from message
    pub fn category_error<T: fmt::Display>(message: T) -> Self {
        Self::Category(message.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;
