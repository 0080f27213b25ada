//! Tag spans and registry entries

use super::TagIdentity;
use core::fmt;
use std::sync::Arc;

/// Sort key of a span: start position, then tie-break rank
///
/// Ordering derives lexicographically from the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanKey {
    /// Start position
    pub start_index: usize,
    /// Rank among spans sharing `start_index`
    pub order_at_index: usize,
}

impl SpanKey {
    /// Create key from its parts
    #[must_use]
    pub const fn new(start_index: usize, order_at_index: usize) -> Self {
        Self {
            start_index,
            order_at_index,
        }
    }
}

/// Position of a resolved tag
///
/// `end_index` is exclusive; `None` means the tag was never closed and is
/// active until the end of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSpan {
    /// First affected position
    pub start_index: usize,
    /// First unaffected position, `None` while open
    pub end_index: Option<usize>,
    /// Tie-break rank among tags with the same `start_index`
    pub order_at_index: usize,
}

impl TagSpan {
    /// Span that is still open
    #[must_use]
    pub const fn open(start_index: usize, order_at_index: usize) -> Self {
        Self {
            start_index,
            end_index: None,
            order_at_index,
        }
    }

    /// Span closed at `end_index`
    #[must_use]
    pub const fn closed(start_index: usize, end_index: usize, order_at_index: usize) -> Self {
        Self {
            start_index,
            end_index: Some(end_index),
            order_at_index,
        }
    }

    /// Sort key
    #[must_use]
    pub const fn key(&self) -> SpanKey {
        SpanKey::new(self.start_index, self.order_at_index)
    }

    /// Check if the span has not been closed
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_index.is_none()
    }

    /// Check if the span has been closed
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.end_index.is_some()
    }

    /// Close the span at `end_index`
    pub fn close_at(&mut self, end_index: usize) {
        self.end_index = Some(end_index);
    }

    /// Check if the tag is active at `index`
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && self.end_index.map_or(true, |end| index < end)
    }

    /// Number of affected positions, `None` while open
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.end_index
            .map(|end| end.saturating_sub(self.start_index))
    }

    /// Check if the span is closed and covers nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl fmt::Display for TagSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end_index {
            Some(end) => write!(f, "[{}, {})#{}", self.start_index, end, self.order_at_index),
            None => write!(f, "[{}, ..)#{}", self.start_index, self.order_at_index),
        }
    }
}

/// A resolved tag: where it applies and what it is
///
/// The identity is shared so that mirroring an entry into the union
/// registry, a change journal or a cache does not copy the parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Position of the tag
    pub span: TagSpan,
    /// Immutable tag identity
    pub identity: Arc<TagIdentity>,
}

impl TagEntry {
    /// Create entry from a span and an identity
    pub fn new(span: TagSpan, identity: impl Into<Arc<TagIdentity>>) -> Self {
        Self {
            span,
            identity: identity.into(),
        }
    }

    /// Sort key of the span
    #[must_use]
    pub const fn key(&self) -> SpanKey {
        self.span.key()
    }

    /// Same identity with a different span
    #[must_use]
    pub fn with_span(&self, span: TagSpan) -> Self {
        Self {
            span,
            identity: Arc::clone(&self.identity),
        }
    }
}

impl fmt::Display for TagEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.identity, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_orders_by_start_then_order() {
        let a = TagSpan::open(1, 3).key();
        let b = TagSpan::closed(2, 4, 0).key();
        let c = TagSpan::closed(2, 3, 1).key();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn contains_uses_exclusive_end() {
        let span = TagSpan::closed(2, 5, 0);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
    }

    #[test]
    fn open_span_extends_to_end_of_text() {
        let mut span = TagSpan::open(3, 0);
        assert!(span.is_open());
        assert!(!span.contains(2));
        assert!(span.contains(10_000));
        assert_eq!(span.len(), None);

        span.close_at(3);
        assert!(span.is_closed());
        assert!(span.is_empty());
    }

    #[test]
    fn display_formats() {
        assert_eq!(TagSpan::closed(1, 2, 0).to_string(), "[1, 2)#0");
        assert_eq!(TagSpan::open(4, 1).to_string(), "[4, ..)#1");
        let entry = TagEntry::new(TagSpan::open(0, 0), TagIdentity::bare("wave", None));
        assert_eq!(entry.to_string(), "<wave> [0, ..)#0");
    }
}
