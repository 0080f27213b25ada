//! Incremental caches derived from a registry
//!
//! A [`DerivedCache`] keeps one application value per registry entry (an
//! animation object, a command handle, ...) built by an
//! [`InvokableFactory`]. It follows the registry through its change
//! journal: added entries are built, removed ones dropped, replaced ones
//! rebuilt in place, and a reset rebuilds everything. Nothing else is ever
//! rebuilt.
//!
//! The cache only holds a shared borrow of the registry while syncing and
//! the factory never sees the registry at all, so a factory cannot mutate
//! the registry it is observing.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::cache::DerivedCache;
//! use tagspan_core::registry::TagRegistry;
//! use tagspan_core::tags::{TagIdentity, TagSpan};
//!
//! let mut registry = TagRegistry::new();
//! let mut labels = DerivedCache::new(|identity: &TagIdentity, span: &TagSpan| {
//!     format!("{}@{}", identity.name(), span.start_index)
//! });
//!
//! registry.insert(TagIdentity::bare("wave", None), TagSpan::open(3, 0));
//! labels.sync(&registry);
//! assert_eq!(labels.values().collect::<Vec<_>>(), ["wave@3"]);
//! ```

use crate::{
    registry::{JournalCursor, RegistryChange, TagSource},
    tags::{TagEntry, TagIdentity, TagSpan},
};
use core::fmt;
use tracing::trace;

/// Builds the cached value for a registry entry
pub trait InvokableFactory<T> {
    /// Build the value for `identity` at `span`
    fn create(&mut self, identity: &TagIdentity, span: &TagSpan) -> T;
}

impl<T, F> InvokableFactory<T> for F
where
    F: FnMut(&TagIdentity, &TagSpan) -> T,
{
    fn create(&mut self, identity: &TagIdentity, span: &TagSpan) -> T {
        self(identity, span)
    }
}

/// Cached value together with the entry it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry<T> {
    /// Registry entry at build time
    pub entry: TagEntry,
    /// Value produced by the factory
    pub value: T,
}

/// What one sync did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Changes consumed from the journal
    pub changes: usize,
    /// Factory invocations
    pub created: usize,
    /// Values dropped
    pub dropped: usize,
    /// The cache was rebuilt from scratch
    pub rebuilt: bool,
}

/// Values mirroring a registry one-to-one
pub struct DerivedCache<T, F> {
    /// Value builder
    factory: F,
    /// Values in registry order
    items: Vec<CachedEntry<T>>,
    /// Journal position consumed so far
    cursor: JournalCursor,
}

impl<T, F: InvokableFactory<T>> DerivedCache<T, F> {
    /// Create an empty cache
    ///
    /// The first [`sync`](Self::sync) replays the registry's journal from
    /// the start, or rebuilds if that history was trimmed.
    pub const fn new(factory: F) -> Self {
        Self {
            factory,
            items: Vec::new(),
            cursor: JournalCursor::START,
        }
    }

    /// Bring the cache up to date with `source`
    ///
    /// # Panics
    ///
    /// Panics if `source` is not the registry the cache was first synced
    /// with. A new cache binds to whichever registry it syncs first.
    pub fn sync<S: TagSource + ?Sized>(&mut self, source: &S) -> SyncSummary {
        assert!(
            source.accepts_cursor(self.cursor),
            "cache out of sync: it follows another registry"
        );
        let changes = source.changes_since(self.cursor);
        let mut summary = SyncSummary {
            changes: changes.len(),
            ..SyncSummary::default()
        };

        if changes.iter().any(RegistryChange::is_reset) {
            summary.dropped = self.items.len();
            self.rebuild(source.entries());
            summary.created = self.items.len();
            summary.rebuilt = true;
        } else {
            for change in changes {
                self.apply(change, &mut summary);
            }
        }

        self.cursor = source.journal_end();
        assert_eq!(
            self.items.len(),
            source.entries().len(),
            "cache out of sync with its registry"
        );
        if summary.changes > 0 {
            trace!(
                changes = summary.changes,
                created = summary.created,
                dropped = summary.dropped,
                rebuilt = summary.rebuilt,
                "cache synced"
            );
        }
        summary
    }

    /// Rebuild every value from `entries`
    fn rebuild(&mut self, entries: &[TagEntry]) {
        let factory = &mut self.factory;
        self.items = entries
            .iter()
            .map(|entry| CachedEntry {
                value: factory.create(&entry.identity, &entry.span),
                entry: entry.clone(),
            })
            .collect();
    }

    /// Apply one incremental change
    fn apply(&mut self, change: &RegistryChange, summary: &mut SyncSummary) {
        match change {
            RegistryChange::Added { entry, position } => {
                let value = self.factory.create(&entry.identity, &entry.span);
                self.items.insert(
                    *position,
                    CachedEntry {
                        entry: entry.clone(),
                        value,
                    },
                );
                summary.created += 1;
            }
            RegistryChange::Removed { position, .. } => {
                self.items.remove(*position);
                summary.dropped += 1;
            }
            RegistryChange::Replaced { new, position, .. } => {
                let value = self.factory.create(&new.identity, &new.span);
                self.items[*position] = CachedEntry {
                    entry: new.clone(),
                    value,
                };
                summary.created += 1;
                summary.dropped += 1;
            }
            RegistryChange::Reset => unreachable!("resets are handled by rebuilding"),
        }
    }
}

impl<T, F> DerivedCache<T, F> {
    /// Number of cached values
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cached value at registry `position`
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position).map(|item| &item.value)
    }

    /// Cached values with their entries, in registry order
    #[must_use]
    pub fn items(&self) -> &[CachedEntry<T>] {
        &self.items
    }

    /// Cached values in registry order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|item| &item.value)
    }

    /// Values whose entry is active at `index`
    pub fn active_at(&self, index: usize) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .take_while(move |item| item.entry.span.start_index <= index)
            .filter(move |item| item.entry.span.contains(index))
            .map(|item| &item.value)
    }

    /// Journal position consumed so far
    #[must_use]
    pub const fn cursor(&self) -> JournalCursor {
        self.cursor
    }
}

impl<T: fmt::Debug, F> fmt::Debug for DerivedCache<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedCache")
            .field("items", &self.items)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
