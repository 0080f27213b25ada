//! Indexed tag registries with change journals
//!
//! - [`TagRegistry`]: sorted entries of one category
//! - [`UnionRegistry`]: all categories plus their merged view
//! - [`RegistryChange`] / [`JournalCursor`]: pull-based change stream
//! - [`TagSource`]: read access shared by both registries, used by caches
//!
//! Entries are ordered by `(start_index, order_at_index)` and keys never
//! repeat. Breaking that invariant through the API is impossible; internal
//! inconsistencies fail fast with a panic.

pub mod changes;
pub mod collection;
pub mod union;

pub use changes::{ChangeJournal, JournalCursor, RegistryChange, DEFAULT_JOURNAL_LIMIT};
pub use collection::TagRegistry;
pub use union::UnionRegistry;

use crate::tags::TagEntry;

/// Read-only view of a registry and its change stream
pub trait TagSource {
    /// Entries in key order
    fn entries(&self) -> &[TagEntry];

    /// Cursor just past the latest change
    fn journal_end(&self) -> JournalCursor;

    /// Changes recorded since `cursor`
    fn changes_since(&self, cursor: JournalCursor) -> &[RegistryChange];

    /// Check if `cursor` was produced by this source or is unbound
    fn accepts_cursor(&self, cursor: JournalCursor) -> bool;
}

impl TagSource for TagRegistry {
    fn entries(&self) -> &[TagEntry] {
        Self::entries(self)
    }

    fn journal_end(&self) -> JournalCursor {
        Self::journal_end(self)
    }

    fn changes_since(&self, cursor: JournalCursor) -> &[RegistryChange] {
        Self::changes_since(self, cursor)
    }

    fn accepts_cursor(&self, cursor: JournalCursor) -> bool {
        Self::accepts_cursor(self, cursor)
    }
}

impl TagSource for UnionRegistry {
    fn entries(&self) -> &[TagEntry] {
        Self::entries(self)
    }

    fn journal_end(&self) -> JournalCursor {
        Self::journal_end(self)
    }

    fn changes_since(&self, cursor: JournalCursor) -> &[RegistryChange] {
        Self::changes_since(self, cursor)
    }

    fn accepts_cursor(&self, cursor: JournalCursor) -> bool {
        Self::accepts_cursor(self, cursor)
    }
}
