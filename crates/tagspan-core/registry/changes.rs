//! Change notifications and the journal that stores them
//!
//! Every registry mutation is recorded as a [`RegistryChange`]. Consumers
//! do not register callbacks; each keeps a [`JournalCursor`] and pulls the
//! changes recorded since its last visit. This keeps notification delivery
//! out of the mutation path, so a consumer can never re-enter the registry
//! while it is being modified.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::registry::{RegistryChange, TagRegistry};
//! use tagspan_core::tags::{TagIdentity, TagSpan};
//!
//! let mut registry = TagRegistry::new();
//! let cursor = registry.journal_end();
//! registry.insert(TagIdentity::bare("wave", None), TagSpan::open(0, 0));
//!
//! for change in registry.changes_since(cursor) {
//!     match change {
//!         RegistryChange::Added { entry, position } => {
//!             assert_eq!((entry.identity.name(), *position), ("wave", 0));
//!         }
//!         RegistryChange::Removed { .. }
//!         | RegistryChange::Replaced { .. }
//!         | RegistryChange::Reset => unreachable!(),
//!     }
//! }
//! ```

use crate::tags::TagEntry;
use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// One registry mutation
///
/// Positions are indices into the registry's entry list at the moment the
/// change was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryChange {
    /// Entry inserted at `position`
    Added {
        /// The new entry
        entry: TagEntry,
        /// Index it was inserted at
        position: usize,
    },

    /// Entry removed from `position`
    Removed {
        /// The removed entry
        entry: TagEntry,
        /// Index it was removed from
        position: usize,
    },

    /// Entry at `position` changed its span
    ///
    /// Produced by tie renumbering and by reconciliation. The identity is
    /// unchanged and the entry keeps its position.
    Replaced {
        /// Entry before the change
        old: TagEntry,
        /// Entry after the change
        new: TagEntry,
        /// Index of the entry
        position: usize,
    },

    /// All entries were replaced at once
    ///
    /// Consumers must rebuild from the current entry list and ignore any
    /// other change delivered with it.
    Reset,
}

impl RegistryChange {
    /// Position affected by the change, `None` for [`Self::Reset`]
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Added { position, .. }
            | Self::Removed { position, .. }
            | Self::Replaced { position, .. } => Some(*position),
            Self::Reset => None,
        }
    }

    /// Check if this is a reset
    #[must_use]
    pub const fn is_reset(&self) -> bool {
        matches!(self, Self::Reset)
    }
}

impl fmt::Display for RegistryChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { entry, position } => write!(f, "added {entry} at {position}"),
            Self::Removed { entry, position } => write!(f, "removed {entry} at {position}"),
            Self::Replaced { old, new, position } => {
                write!(f, "replaced {} with {} at {position}", old.span, new.span)
            }
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Source of journal ids, 0 is reserved for [`JournalCursor::START`]
static NEXT_JOURNAL_ID: AtomicU64 = AtomicU64::new(1);

/// Number of changes a journal retains unless configured otherwise
pub const DEFAULT_JOURNAL_LIMIT: usize = 4096;

/// Read position of one consumer in a change journal
///
/// A cursor belongs to the journal that produced it. Only
/// [`JournalCursor::START`] is accepted by every journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JournalCursor {
    /// Id of the journal that produced the cursor, 0 for `START`
    journal: u64,
    /// Sequence number of the next unread change
    sequence: usize,
}

impl JournalCursor {
    /// Cursor before any change of any journal
    pub const START: Self = Self {
        journal: 0,
        sequence: 0,
    };

    /// Sequence number of the next unread change
    #[must_use]
    pub const fn sequence(self) -> usize {
        self.sequence
    }

    /// Check if the cursor is not bound to a journal yet
    #[must_use]
    pub const fn is_start(self) -> bool {
        self.journal == 0
    }
}

/// Batch handed to consumers whose history was discarded
static RESYNC: [RegistryChange; 1] = [RegistryChange::Reset];

/// Ordered history of registry changes
///
/// Changes are numbered by a sequence that never restarts. Only the tail
/// starting at `base` is retained. Once more than twice `limit` changes
/// pile up, the oldest are dropped down to `limit` and consumers still
/// reading them receive a [`RegistryChange::Reset`] instead.
#[derive(Debug)]
pub struct ChangeJournal {
    /// Unique id stamped into every cursor this journal hands out
    id: u64,
    /// Retained changes
    changes: Vec<RegistryChange>,
    /// Sequence number of `changes[0]`
    base: usize,
    /// Number of changes guaranteed to survive automatic trimming
    limit: usize,
}

impl ChangeJournal {
    /// Create an empty journal with [`DEFAULT_JOURNAL_LIMIT`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_JOURNAL_LIMIT)
    }

    /// Create an empty journal retaining at least `limit` changes
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        assert!(limit > 0, "journal limit must be positive");
        Self {
            id: NEXT_JOURNAL_ID.fetch_add(1, Ordering::Relaxed),
            changes: Vec::new(),
            base: 0,
            limit,
        }
    }

    /// Number of changes guaranteed to survive automatic trimming
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Change the retention limit, trimming immediately if exceeded
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn set_limit(&mut self, limit: usize) {
        assert!(limit > 0, "journal limit must be positive");
        self.limit = limit;
        self.enforce_limit();
    }

    /// Append a change
    pub fn record(&mut self, change: RegistryChange) {
        self.changes.push(change);
        self.enforce_limit();
    }

    /// Drop all history and record a single reset
    pub fn reset(&mut self) {
        self.base += self.changes.len();
        self.changes.clear();
        self.changes.push(RegistryChange::Reset);
    }

    /// Cursor just past the latest change
    #[must_use]
    pub fn end(&self) -> JournalCursor {
        JournalCursor {
            journal: self.id,
            sequence: self.base + self.changes.len(),
        }
    }

    /// Check if `cursor` can be read from this journal
    #[must_use]
    pub fn accepts(&self, cursor: JournalCursor) -> bool {
        cursor.is_start() || cursor.journal == self.id
    }

    /// Changes recorded at or after `cursor`
    ///
    /// A cursor older than the retained history yields a lone
    /// [`RegistryChange::Reset`].
    ///
    /// # Panics
    ///
    /// Panics if `cursor` was produced by another journal.
    #[must_use]
    pub fn since(&self, cursor: JournalCursor) -> &[RegistryChange] {
        self.check_owner(cursor);
        if cursor.sequence < self.base {
            return &RESYNC;
        }
        self.changes.get(cursor.sequence - self.base..).unwrap_or(&[])
    }

    /// Discard history before `cursor`
    ///
    /// # Panics
    ///
    /// Panics if `cursor` was produced by another journal.
    pub fn trim(&mut self, cursor: JournalCursor) {
        self.check_owner(cursor);
        let upto = cursor
            .sequence
            .clamp(self.base, self.base + self.changes.len());
        self.changes.drain(..upto - self.base);
        self.base = upto;
    }

    /// Number of retained changes
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if no changes are retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn check_owner(&self, cursor: JournalCursor) {
        assert!(
            self.accepts(cursor),
            "journal cursor belongs to another registry (journal {}, cursor of journal {})",
            self.id,
            cursor.journal
        );
    }

    fn enforce_limit(&mut self) {
        if self.changes.len() > self.limit.saturating_mul(2) {
            let excess = self.changes.len() - self.limit;
            self.changes.drain(..excess);
            self.base += excess;
        }
    }
}

impl Default for ChangeJournal {
    fn default() -> Self {
        Self::new()
    }
}

/// A clone is a separate journal: cursors of the original do not apply
impl Clone for ChangeJournal {
    fn clone(&self) -> Self {
        Self {
            id: NEXT_JOURNAL_ID.fetch_add(1, Ordering::Relaxed),
            changes: self.changes.clone(),
            base: self.base,
            limit: self.limit,
        }
    }
}
