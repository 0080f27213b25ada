//! Inline tag tokenizer
//!
//! Stateless, zero-copy scanning of `<...>` tags in raw text. The scanner
//! returns one validated [`RawTagToken`] at a time with byte offsets and
//! `&str` slices into the source; [`decode_parameters`] turns a token's raw
//! parameter text into a key/value map.
//!
//! # Well-formedness
//!
//! - exactly one `<` before the matching `>`
//! - `</` marks a close tag
//! - an optional non-letter prefix character follows the marker
//! - the name runs up to whitespace, `=` or `>`; open tags need one
//!
//! Anything else is left in place as literal text.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::tokenizer::{decode_parameters, TagScanner};
//!
//! for token in TagScanner::new("Hi <wave amp=2>there</wave>") {
//!     let params = decode_parameters(token.parameter_text);
//!     println!("{} {:?} {}", token, token.kind, params.len());
//! }
//! ```

pub mod params;
pub mod scanner;
pub mod tokens;

pub use params::decode_parameters;
pub use scanner::{scan_next, TagScanner};
pub use tokens::{RawTagToken, TagKind, CLOSE_ALL_KEYWORD};

#[cfg(test)]
mod tests;
