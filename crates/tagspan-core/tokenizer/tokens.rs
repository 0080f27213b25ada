//! Token definitions for inline tag scanning
//!
//! A [`RawTagToken`] is a zero-copy view of one well-formed `<...>` tag in
//! the source text. Tokens are transient: the preprocessor consumes each one
//! immediately and only the resolved `TagIdentity`/`TagSpan` pair survives.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::tokenizer::{scan_next, TagKind};
//!
//! let token = scan_next("A<!wait=1>B", 0).unwrap();
//! assert_eq!(token.kind, TagKind::Open);
//! assert_eq!(token.prefix, Some('!'));
//! assert_eq!(token.name, "wait");
//! assert_eq!(token.parameter_text, "=1");
//! assert_eq!((token.start, token.end), (1, 9));
//! ```

use core::fmt;

/// Name of the close keyword that closes every open tag of a category
pub const CLOSE_ALL_KEYWORD: &str = "all";

/// Whether a tag opens or closes a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
}

/// One well-formed tag found by the scanner
///
/// `start` and `end` are byte offsets into the scanned text; `end` is
/// inclusive and always points at the closing `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTagToken<'a> {
    /// Byte offset of the opening `<`
    pub start: usize,
    /// Byte offset of the closing `>` (inclusive)
    pub end: usize,
    /// Open or close tag
    pub kind: TagKind,
    /// Optional category prefix character (`!`, `?`, `#`, ...)
    pub prefix: Option<char>,
    /// Tag name; empty only for close tags
    pub name: &'a str,
    /// Unparsed text between the name and the closing `>`
    pub parameter_text: &'a str,
    /// The complete tag text including both brackets
    pub span: &'a str,
}

impl<'a> RawTagToken<'a> {
    /// Length of the raw tag text in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    /// Always `false`: the smallest valid tag is `</>`
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Byte range covered by the tag, exclusive end
    #[must_use]
    pub const fn byte_range(&self) -> core::ops::Range<usize> {
        self.start..self.end + 1
    }

    /// Check if this is an open tag
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.kind, TagKind::Open)
    }

    /// Check if this is a close tag
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self.kind, TagKind::Close)
    }

    /// `</>`: closes the most recently opened tag regardless of its name
    #[must_use]
    pub fn closes_most_recent(&self) -> bool {
        self.is_close() && self.name.is_empty()
    }

    /// `</all>`: closes every open tag
    #[must_use]
    pub fn closes_all(&self) -> bool {
        self.is_close() && self.name == CLOSE_ALL_KEYWORD
    }
}

impl fmt::Display for RawTagToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..={} '{}'", self.kind, self.start, self.end, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TagKind, name: &'static str) -> RawTagToken<'static> {
        RawTagToken {
            start: 4,
            end: 9,
            kind,
            prefix: None,
            name,
            parameter_text: "",
            span: "<wave>",
        }
    }

    #[test]
    fn token_length_is_inclusive() {
        let t = token(TagKind::Open, "wave");
        assert_eq!(t.len(), 6);
        assert_eq!(t.byte_range(), 4..10);
        assert!(!t.is_empty());
    }

    #[test]
    fn keyword_detection() {
        assert!(token(TagKind::Close, "").closes_most_recent());
        assert!(token(TagKind::Close, "all").closes_all());
        assert!(!token(TagKind::Open, "all").closes_all());
        assert!(!token(TagKind::Close, "wave").closes_most_recent());
    }

    #[test]
    fn token_display() {
        let shown = token(TagKind::Open, "wave").to_string();
        assert!(shown.contains("Open@4..=9"));
        assert!(shown.contains("<wave>"));
    }
}
