//! Utility functions and shared types for tagspan core
//!
//! Contains the error types, the hashing helpers used for lookup tables and
//! the position-unit conversion shared by the preprocessor and the
//! reconciler.

pub mod errors;
pub mod hashers;
pub mod text;

pub use errors::CoreError;
pub use hashers::{create_hash_map, FastHashMap};
pub use text::PositionEncoding;
