//! Tag resolution over raw text
//!
//! The parser turns raw markup into clean text plus per-category tag lists:
//!
//! - [`TagMatcher`]: pairs open/close tokens of one category
//! - [`CategoryMultiplexer`]: routes tokens to matchers by prefix
//! - [`TextPreprocessor`]: drives one left-to-right pass over the text
//! - [`PreprocessorConfig`]: position unit, verbatim and style macros
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::parser::TextPreprocessor;
//! use tagspan_core::plugin::TagSet;
//! use tagspan_core::tags::TagSpan;
//!
//! let mut preprocessor = TextPreprocessor::new();
//! let effects = preprocessor.register(None, TagSet::new("effects").with_block("wave"))?;
//!
//! let output = preprocessor.process("Hi <wave>there</wave>!");
//! assert_eq!(output.clean_text(), "Hi there!");
//! assert_eq!(output.tags(effects)[0].span, TagSpan::closed(3, 8, 0));
//! # Ok::<(), tagspan_core::utils::CoreError>(())
//! ```

pub mod config;
mod macros;
pub mod matcher;
pub mod multiplexer;
pub mod preprocessor;

pub use config::{PreprocessorConfig, StyleDefinition, StyleSheet};
pub use macros::STYLE_TAG;
pub use matcher::TagMatcher;
pub use multiplexer::CategoryMultiplexer;
pub use preprocessor::{ProcessedText, TextPreprocessor};
