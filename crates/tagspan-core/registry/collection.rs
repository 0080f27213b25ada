//! Sorted registry of resolved tags for one category

use super::changes::{ChangeJournal, JournalCursor, RegistryChange, DEFAULT_JOURNAL_LIMIT};
use crate::{
    reconcile::{reconcile_spans, relevel_orders, CharacterMapping, ReconcileReport},
    tags::{SpanKey, TagEntry, TagIdentity, TagSpan},
};
use core::ops::Range;
use std::sync::Arc;
use tracing::trace;

/// Ordered collection of tag entries keyed by `(start, order)`
///
/// Keys are unique. Inserting an entry whose key is taken renumbers the
/// occupant and every later entry with the same start, so the new entry
/// ranks before them. Every mutation is recorded in the change journal.
///
/// # Example
///
/// ```rust
/// use tagspan_core::registry::TagRegistry;
/// use tagspan_core::tags::{TagIdentity, TagSpan};
///
/// let mut registry = TagRegistry::new();
/// registry.insert(TagIdentity::bare("wave", None), TagSpan::closed(0, 4, 0));
/// registry.insert(TagIdentity::bare("shake", None), TagSpan::open(2, 0));
///
/// let active: Vec<_> = registry.tags_at(3).map(|e| e.identity.name()).collect();
/// assert_eq!(active, ["wave", "shake"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    /// Entries sorted by key
    entries: Vec<TagEntry>,
    /// Mutation history
    journal: ChangeJournal,
}

impl TagRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::with_journal_limit(DEFAULT_JOURNAL_LIMIT)
    }

    /// Create an empty registry whose journal retains at least `limit` changes
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[must_use]
    pub fn with_journal_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            journal: ChangeJournal::with_limit(limit),
        }
    }

    /// All entries in key order
    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> core::slice::Iter<'_, TagEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the given key
    #[must_use]
    pub fn get(&self, start_index: usize, order_at_index: usize) -> Option<&TagEntry> {
        self.position_of(SpanKey::new(start_index, order_at_index))
            .map(|position| &self.entries[position])
    }

    /// Position of the entry with `key`
    #[must_use]
    pub fn position_of(&self, key: SpanKey) -> Option<usize> {
        self.entries.binary_search_by_key(&key, TagEntry::key).ok()
    }

    /// Check if an entry with `key` exists
    #[must_use]
    pub fn contains(&self, key: SpanKey) -> bool {
        self.position_of(key).is_some()
    }

    /// Entries starting exactly at `start_index`, in order
    #[must_use]
    pub fn starting_at(&self, start_index: usize) -> &[TagEntry] {
        &self.entries[self.start_range(start_index)]
    }

    /// Entries active at `index`, in key order
    ///
    /// An entry is active if it starts at or before `index` and either ends
    /// after it or is still open.
    pub fn tags_at(&self, index: usize) -> impl Iterator<Item = &TagEntry> + '_ {
        let candidates = self.entries.partition_point(|e| e.span.start_index <= index);
        self.entries[..candidates]
            .iter()
            .filter(move |e| e.span.contains(index))
    }

    /// First entry that was never closed
    #[must_use]
    pub fn first_open(&self) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.span.is_open())
    }

    /// Position of an entry with `identity`, and exactly `span` if given
    #[must_use]
    pub fn find(&self, identity: &TagIdentity, span: Option<&TagSpan>) -> Option<usize> {
        match span {
            Some(span) => self
                .position_of(span.key())
                .filter(|&p| self.entries[p].span == *span && *self.entries[p].identity == *identity),
            None => self.entries.iter().position(|e| *e.identity == *identity),
        }
    }

    /// Insert a tag, renumbering ties
    ///
    /// Returns the position of the new entry.
    pub fn insert(&mut self, identity: impl Into<Arc<TagIdentity>>, span: TagSpan) -> usize {
        for position in self.collision_group(span.key()).rev() {
            self.bump_order(position);
        }
        self.place(TagEntry::new(span, identity))
    }

    /// Remove the entry at `start_index` with `order_at_index`
    ///
    /// Without an order the lowest-ranked entry at that start is removed.
    /// Returns `false` if nothing matched.
    pub fn remove_at(&mut self, start_index: usize, order_at_index: Option<usize>) -> bool {
        let position = match order_at_index {
            Some(order) => self.position_of(SpanKey::new(start_index, order)),
            None => {
                let range = self.start_range(start_index);
                (!range.is_empty()).then_some(range.start)
            }
        };
        position.map(|p| self.remove_entry(p)).is_some()
    }

    /// Remove every entry starting at `start_index`
    ///
    /// Returns the number of removed entries.
    pub fn remove_all_at(&mut self, start_index: usize) -> usize {
        let range = self.start_range(start_index);
        let removed = range.len();
        for position in range.rev() {
            self.remove_entry(position);
        }
        removed
    }

    /// Remove an entry by identity, and by exact span if given
    ///
    /// Without a span the first entry with that identity is removed.
    pub fn remove(&mut self, identity: &TagIdentity, span: Option<&TagSpan>) -> bool {
        self.find(identity, span)
            .map(|position| self.remove_entry(position))
            .is_some()
    }

    /// Remove and return the entry at `position`
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn remove_entry(&mut self, position: usize) -> TagEntry {
        assert!(
            position < self.entries.len(),
            "removal position {position} out of bounds for {} entries",
            self.entries.len()
        );
        let entry = self.entries.remove(position);
        self.record(RegistryChange::Removed {
            entry: entry.clone(),
            position,
        });
        entry
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.journal.reset();
        trace!("registry cleared");
    }

    /// Replace all entries with an already sorted list
    ///
    /// Records a single reset.
    ///
    /// # Panics
    ///
    /// Panics if `entries` is not strictly sorted by key.
    pub fn reset_with(&mut self, entries: Vec<TagEntry>) {
        assert!(
            entries.windows(2).all(|pair| pair[0].key() < pair[1].key()),
            "registry entries must be strictly sorted by (start, order)"
        );
        self.entries = entries;
        self.journal.reset();
        trace!(entries = self.entries.len(), "registry reset");
    }

    /// Remap every span through `mapping`
    ///
    /// Spans collapsing onto the same start are renumbered in their previous
    /// order. Every changed entry is reported as replaced.
    pub fn reconcile<M: CharacterMapping + ?Sized>(&mut self, mapping: &M) -> ReconcileReport {
        let mut spans: Vec<TagSpan> = self.entries.iter().map(|e| e.span).collect();
        let report = reconcile_spans(spans.iter_mut(), mapping);
        relevel_orders(spans.iter_mut());
        self.rewrite_spans(&spans);
        report
    }

    /// Cursor just past the latest recorded change
    #[must_use]
    pub fn journal_end(&self) -> JournalCursor {
        self.journal.end()
    }

    /// Changes recorded since `cursor`
    ///
    /// # Panics
    ///
    /// Panics if `cursor` came from another registry.
    #[must_use]
    pub fn changes_since(&self, cursor: JournalCursor) -> &[RegistryChange] {
        self.journal.since(cursor)
    }

    /// Check if `cursor` can be read from this registry's journal
    #[must_use]
    pub fn accepts_cursor(&self, cursor: JournalCursor) -> bool {
        self.journal.accepts(cursor)
    }

    /// Discard journal history before `cursor`
    ///
    /// Consumers still behind `cursor` will see a reset.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` came from another registry.
    pub fn trim_journal(&mut self, cursor: JournalCursor) {
        self.journal.trim(cursor);
    }

    /// Number of changes currently retained by the journal
    #[must_use]
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Number of changes the journal retains before dropping old history
    #[must_use]
    pub const fn journal_limit(&self) -> usize {
        self.journal.limit()
    }

    /// Bound the journal to at least `limit` and at most twice `limit` changes
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn set_journal_limit(&mut self, limit: usize) {
        self.journal.set_limit(limit);
    }

    /// Range of positions holding entries that start at `start_index`
    fn start_range(&self, start_index: usize) -> Range<usize> {
        let first = self.entries.partition_point(|e| e.span.start_index < start_index);
        let last = self.entries.partition_point(|e| e.span.start_index <= start_index);
        first..last
    }

    /// Positions that must be renumbered before `key` can be inserted
    ///
    /// Empty unless `key` is taken; otherwise the occupant and every later
    /// entry with the same start.
    pub(crate) fn collision_group(&self, key: SpanKey) -> Range<usize> {
        let position = self.entries.partition_point(|e| e.key() < key);
        match self.entries.get(position) {
            Some(entry) if entry.key() == key => position..self.start_range(key.start_index).end,
            _ => position..position,
        }
    }

    /// Insert `entry` at its sorted position
    ///
    /// # Panics
    ///
    /// Panics if the key is already taken.
    pub(crate) fn place(&mut self, entry: TagEntry) -> usize {
        let key = entry.key();
        let position = self.entries.partition_point(|e| e.key() < key);
        assert!(
            self.entries.get(position).map_or(true, |e| e.key() != key),
            "duplicate tag key ({}, {}) inserted without renumbering",
            key.start_index,
            key.order_at_index
        );
        self.entries.insert(position, entry.clone());
        self.record(RegistryChange::Added { entry, position });
        position
    }

    /// Raise the order of the entry at `position` by one
    ///
    /// Callers renumber from the back of a group so keys never collide.
    pub(crate) fn bump_order(&mut self, position: usize) -> TagSpan {
        let mut span = self.entries[position].span;
        span.order_at_index += 1;
        self.set_span(position, span);
        span
    }

    /// Overwrite the span at `position`, keeping the identity
    pub(crate) fn set_span(&mut self, position: usize, span: TagSpan) {
        let new = self.entries[position].with_span(span);
        let old = core::mem::replace(&mut self.entries[position], new.clone());
        self.record(RegistryChange::Replaced { old, new, position });
    }

    /// Overwrite every span at once, reporting the changed ones
    ///
    /// # Panics
    ///
    /// Panics if `spans` has the wrong length or breaks the key order.
    pub(crate) fn rewrite_spans(&mut self, spans: &[TagSpan]) {
        assert_eq!(spans.len(), self.entries.len(), "one span per entry required");
        assert!(
            spans.windows(2).all(|pair| pair[0].key() < pair[1].key()),
            "rewritten spans must stay strictly sorted by (start, order)"
        );
        for (position, span) in spans.iter().enumerate() {
            if self.entries[position].span != *span {
                self.set_span(position, *span);
            }
        }
    }

    /// Append a change to the journal
    fn record(&mut self, change: RegistryChange) {
        trace!(%change, "registry change");
        self.journal.record(change);
    }
}

impl<'a> IntoIterator for &'a TagRegistry {
    type Item = &'a TagEntry;
    type IntoIter = core::slice::Iter<'a, TagEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
