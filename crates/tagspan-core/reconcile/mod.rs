//! Remapping of tag positions onto rendered text
//!
//! A renderer shaping the clean text may insert or drop characters
//! (ligatures, soft hyphens, synthetic line breaks). It reports, for every
//! rendered character, the clean-text position it came from. The
//! reconciler moves every span boundary to the first rendered character
//! whose origin is at or after that boundary.
//!
//! The mapping must be monotonic non-decreasing; a mapping that goes
//! backwards yields unspecified (but memory-safe) positions.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::reconcile::reconcile_spans;
//! use tagspan_core::tags::TagSpan;
//!
//! // "ffi x" rendered as "\u{FB03} x": the ligature swallows two characters
//! let origins: Vec<usize> = vec![0, 3, 4];
//! let mut spans = [TagSpan::closed(1, 4, 0)];
//! reconcile_spans(spans.iter_mut(), &origins);
//! assert_eq!(spans[0], TagSpan::closed(1, 2, 0));
//! ```

use crate::tags::{SpanKey, TagEntry, TagSpan};
use tracing::debug;

/// Rendered-to-clean position lookup supplied by the renderer
pub trait CharacterMapping {
    /// Number of rendered characters
    fn rendered_len(&self) -> usize;

    /// Clean-text position of rendered character `rendered`
    ///
    /// Only called with `rendered < self.rendered_len()`.
    fn original_index(&self, rendered: usize) -> usize;
}

impl CharacterMapping for [usize] {
    fn rendered_len(&self) -> usize {
        self.len()
    }

    fn original_index(&self, rendered: usize) -> usize {
        self[rendered]
    }
}

impl CharacterMapping for Vec<usize> {
    fn rendered_len(&self) -> usize {
        self.len()
    }

    fn original_index(&self, rendered: usize) -> usize {
        self[rendered]
    }
}

impl<M: CharacterMapping + ?Sized> CharacterMapping for &M {
    fn rendered_len(&self) -> usize {
        (**self).rendered_len()
    }

    fn original_index(&self, rendered: usize) -> usize {
        (**self).original_index(rendered)
    }
}

/// Mapping where every rendered character is the clean character at the
/// same position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityMapping {
    /// Length of both texts
    len: usize,
}

impl IdentityMapping {
    /// Identity over `len` characters
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len }
    }
}

impl CharacterMapping for IdentityMapping {
    fn rendered_len(&self) -> usize {
        self.len
    }

    fn original_index(&self, rendered: usize) -> usize {
        rendered
    }
}

/// Mapping backed by a lookup closure
///
/// ```rust
/// use tagspan_core::reconcile::{CharacterMapping, MappingFn};
///
/// // every clean character rendered twice
/// let doubled = MappingFn::new(6, |i| i / 2);
/// assert_eq!(doubled.original_index(5), 2);
/// ```
#[derive(Clone, Copy)]
pub struct MappingFn<F> {
    /// Number of rendered characters
    len: usize,
    /// Rendered position to clean position
    lookup: F,
}

impl<F: Fn(usize) -> usize> MappingFn<F> {
    /// Wrap `lookup` covering `len` rendered characters
    pub const fn new(len: usize, lookup: F) -> Self {
        Self { len, lookup }
    }
}

impl<F: Fn(usize) -> usize> CharacterMapping for MappingFn<F> {
    fn rendered_len(&self) -> usize {
        self.len
    }

    fn original_index(&self, rendered: usize) -> usize {
        (self.lookup)(rendered)
    }
}

impl<F> core::fmt::Debug for MappingFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MappingFn").field("len", &self.len).finish()
    }
}

/// Summary of one reconcile run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Spans visited
    pub spans: usize,
    /// Spans whose start or end changed
    pub moved: usize,
    /// Boundaries with no rendered character at or after them, placed at
    /// the rendered length
    pub clamped: usize,
}

/// Boundary awaiting resolution
#[derive(Debug, Clone, Copy)]
struct Target {
    /// Clean-text position
    value: usize,
    /// Index of the owning span
    slot: usize,
    /// End boundary rather than start
    is_end: bool,
}

/// Remap span boundaries through `mapping` in place
///
/// All boundaries are resolved in a single forward scan over the rendered
/// characters. Open ends stay open. Orders are untouched; see
/// [`relevel_orders`] for spans that collapse onto the same start.
pub fn reconcile_spans<'a, I, M>(spans: I, mapping: &M) -> ReconcileReport
where
    I: IntoIterator<Item = &'a mut TagSpan>,
    M: CharacterMapping + ?Sized,
{
    let mut spans: Vec<&'a mut TagSpan> = spans.into_iter().collect();
    let before: Vec<TagSpan> = spans.iter().map(|span| **span).collect();

    let mut targets = Vec::with_capacity(spans.len() * 2);
    for (slot, span) in before.iter().enumerate() {
        targets.push(Target {
            value: span.start_index,
            slot,
            is_end: false,
        });
        if let Some(end) = span.end_index {
            targets.push(Target {
                value: end,
                slot,
                is_end: true,
            });
        }
    }
    targets.sort_by_key(|target| target.value);

    let rendered_len = mapping.rendered_len();
    let mut cursor = 0;
    let mut clamped = 0;

    for target in &targets {
        while cursor < rendered_len && mapping.original_index(cursor) < target.value {
            cursor += 1;
        }
        if cursor == rendered_len {
            clamped += 1;
        }

        let span = &mut spans[target.slot];
        if target.is_end {
            span.end_index = Some(cursor);
        } else {
            span.start_index = cursor;
        }
    }

    let moved = spans
        .iter()
        .zip(&before)
        .filter(|(now, was)| ***now != **was)
        .count();

    let report = ReconcileReport {
        spans: spans.len(),
        moved,
        clamped,
    };
    debug!(
        spans = report.spans,
        moved = report.moved,
        clamped = report.clamped,
        rendered_len,
        "reconciled spans"
    );
    report
}

/// Restore unique orders after spans collapsed onto the same start
///
/// `spans` must be visited in their pre-reconcile `(start, order)` order.
/// Whenever a span shares its start with the previous one without ranking
/// after it, its order becomes the previous order plus one. Returns the
/// number of spans renumbered.
pub fn relevel_orders<'a, I>(spans: I) -> usize
where
    I: IntoIterator<Item = &'a mut TagSpan>,
{
    let mut previous: Option<SpanKey> = None;
    let mut bumped = 0;

    for span in spans {
        if let Some(prev) = previous {
            if prev.start_index == span.start_index && span.order_at_index <= prev.order_at_index
            {
                span.order_at_index = prev.order_at_index + 1;
                bumped += 1;
            }
        }
        previous = Some(span.key());
    }

    bumped
}

/// Reconcile per-category tag lists in one pass
///
/// Every list must be sorted by `(start, order)`; each stays sorted with
/// unique keys afterwards.
pub fn reconcile_lists<M>(lists: &mut [Vec<TagEntry>], mapping: &M) -> ReconcileReport
where
    M: CharacterMapping + ?Sized,
{
    let report = reconcile_spans(
        lists
            .iter_mut()
            .flat_map(|list| list.iter_mut().map(|entry| &mut entry.span)),
        mapping,
    );
    for list in lists.iter_mut() {
        relevel_orders(list.iter_mut().map(|entry| &mut entry.span));
    }
    report
}

#[cfg(test)]
mod tests;
