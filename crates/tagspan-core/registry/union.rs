//! Merged view over per-category registries
//!
//! [`UnionRegistry`] owns one [`TagRegistry`] per category plus a merged
//! registry holding every entry of every category. All mutation goes
//! through the union so that each change lands in both the category
//! registry and the merged one, each with its own change journal.
//!
//! Keys are unique across the whole union: a tie between categories is
//! renumbered exactly like a tie inside one category, and the new orders
//! are written back to the affected category registries.

use super::{
    changes::{JournalCursor, RegistryChange},
    collection::TagRegistry,
};
use crate::{
    reconcile::{reconcile_spans, relevel_orders, CharacterMapping, ReconcileReport},
    tags::{CategoryId, SpanKey, TagEntry, TagIdentity, TagSpan},
};
use std::sync::Arc;
use tracing::debug;

/// One category's registry
#[derive(Debug, Clone)]
struct CategorySlot {
    /// Category name
    name: String,
    /// Entries of this category
    registry: TagRegistry,
}

/// Per-category registries kept in sync with a merged registry
///
/// # Example
///
/// ```rust
/// use tagspan_core::registry::UnionRegistry;
/// use tagspan_core::tags::{TagIdentity, TagSpan};
///
/// let mut union = UnionRegistry::new();
/// let effects = union.add_category("effects");
/// let commands = union.add_category("commands");
///
/// union.insert(effects, TagIdentity::bare("wave", None), TagSpan::open(0, 0));
/// union.insert(commands, TagIdentity::bare("wait", Some('!')), TagSpan::closed(0, 1, 0));
///
/// // the later insertion ranks first at the shared start
/// assert_eq!(union.category(effects).entries()[0].span.order_at_index, 1);
/// assert_eq!(union.owner_at(0), commands);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnionRegistry {
    /// Category registries indexed by id
    categories: Vec<CategorySlot>,
    /// Every entry of every category
    merged: TagRegistry,
    /// Category of each merged entry
    owners: Vec<CategoryId>,
}

impl UnionRegistry {
    /// Create a union without categories
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            merged: TagRegistry::new(),
            owners: Vec::new(),
        }
    }

    /// Add an empty category
    ///
    /// Its journal takes the union's current journal limit.
    pub fn add_category(&mut self, name: impl Into<String>) -> CategoryId {
        let id = CategoryId::from_index(self.categories.len());
        self.categories.push(CategorySlot {
            name: name.into(),
            registry: TagRegistry::with_journal_limit(self.merged.journal_limit()),
        });
        id
    }

    /// Journal limit shared by the merged and category registries
    #[must_use]
    pub const fn journal_limit(&self) -> usize {
        self.merged.journal_limit()
    }

    /// Bound every journal of the union, including categories added later
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn set_journal_limit(&mut self, limit: usize) {
        self.merged.set_journal_limit(limit);
        for slot in &mut self.categories {
            slot.registry.set_journal_limit(limit);
        }
    }

    /// Number of categories
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Registry of one category
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this union.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> &TagRegistry {
        &self.slot(id).registry
    }

    /// Name of one category
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this union.
    #[must_use]
    pub fn category_name(&self, id: CategoryId) -> &str {
        &self.slot(id).name
    }

    /// Iterate over `(id, name, registry)` in registration order
    pub fn categories(&self) -> impl Iterator<Item = (CategoryId, &str, &TagRegistry)> {
        self.categories.iter().enumerate().map(|(index, slot)| {
            (
                CategoryId::from_index(index),
                slot.name.as_str(),
                &slot.registry,
            )
        })
    }

    /// The merged registry
    #[must_use]
    pub const fn merged(&self) -> &TagRegistry {
        &self.merged
    }

    /// All entries in global key order
    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        self.merged.entries()
    }

    /// Total number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    /// Check if no category has entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Category of the merged entry at `position`
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    #[must_use]
    pub fn owner_at(&self, position: usize) -> CategoryId {
        self.owners[position]
    }

    /// Entries of all categories active at `index`, with their category
    pub fn tags_at(&self, index: usize) -> impl Iterator<Item = (CategoryId, &TagEntry)> + '_ {
        let candidates = self
            .merged
            .entries()
            .partition_point(|e| e.span.start_index <= index);
        self.merged.entries()[..candidates]
            .iter()
            .zip(&self.owners)
            .filter(move |(entry, _)| entry.span.contains(index))
            .map(|(entry, owner)| (*owner, entry))
    }

    /// Insert a tag into `category`, renumbering ties across categories
    ///
    /// Returns the position in the merged registry.
    ///
    /// # Panics
    ///
    /// Panics if `category` does not belong to this union.
    pub fn insert(
        &mut self,
        category: CategoryId,
        identity: impl Into<Arc<TagIdentity>>,
        span: TagSpan,
    ) -> usize {
        assert!(
            category.index() < self.categories.len(),
            "unknown {category} in union of {}",
            self.categories.len()
        );

        for position in self.merged.collision_group(span.key()).rev() {
            let old_key = self.merged.entries()[position].key();
            let bumped = self.merged.bump_order(position);
            let owner = self.owners[position];
            let registry = &mut self.categories[owner.index()].registry;
            let mirror = mirrored_position(registry, old_key);
            registry.set_span(mirror, bumped);
        }

        let entry = TagEntry::new(span, identity);
        let position = self.merged.place(entry.clone());
        self.owners.insert(position, category);
        self.categories[category.index()].registry.place(entry);
        position
    }

    /// Remove the entry of `category` at `start_index` with `order_at_index`
    ///
    /// Without an order the lowest-ranked entry of that category at that
    /// start is removed.
    pub fn remove_at(
        &mut self,
        category: CategoryId,
        start_index: usize,
        order_at_index: Option<usize>,
    ) -> bool {
        let registry = self.category(category);
        let key = match order_at_index {
            Some(order) => registry.get(start_index, order).map(TagEntry::key),
            None => registry.starting_at(start_index).first().map(TagEntry::key),
        };
        key.and_then(|key| self.remove_key(category, key)).is_some()
    }

    /// Remove every entry of `category` starting at `start_index`
    pub fn remove_all_at(&mut self, category: CategoryId, start_index: usize) -> usize {
        let keys: Vec<SpanKey> = self
            .category(category)
            .starting_at(start_index)
            .iter()
            .map(TagEntry::key)
            .collect();
        for key in keys.iter().rev() {
            self.remove_key(category, *key);
        }
        keys.len()
    }

    /// Remove an entry of `category` by identity, and by exact span if given
    pub fn remove(
        &mut self,
        category: CategoryId,
        identity: &TagIdentity,
        span: Option<&TagSpan>,
    ) -> bool {
        let registry = self.category(category);
        let key = registry
            .find(identity, span)
            .map(|position| registry.entries()[position].key());
        key.and_then(|key| self.remove_key(category, key)).is_some()
    }

    /// Remove the merged entry at `position` from its category
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn remove_entry(&mut self, position: usize) -> (CategoryId, TagEntry) {
        assert!(
            position < self.merged.len(),
            "removal position {position} out of bounds for {} entries",
            self.merged.len()
        );
        let owner = self.owners[position];
        let key = self.merged.entries()[position].key();
        let registry = &mut self.categories[owner.index()].registry;
        let mirror = mirrored_position(registry, key);
        registry.remove_entry(mirror);
        self.owners.remove(position);
        (owner, self.merged.remove_entry(position))
    }

    /// Remove every entry of every category
    pub fn clear(&mut self) {
        for slot in &mut self.categories {
            slot.registry.clear();
        }
        self.merged.clear();
        self.owners.clear();
    }

    /// Replace all entries from per-category lists
    ///
    /// `lists[i]` holds the entries of the category with index `i`, each
    /// sorted by key; missing trailing lists count as empty. Ties across
    /// categories are renumbered in registration order. Every registry
    /// records a single reset.
    ///
    /// # Panics
    ///
    /// Panics if there are more lists than categories or a list is not
    /// strictly sorted.
    pub fn populate(&mut self, lists: Vec<Vec<TagEntry>>) {
        assert!(
            lists.len() <= self.categories.len(),
            "{} tag lists for {} categories",
            lists.len(),
            self.categories.len()
        );

        let mut combined: Vec<(CategoryId, TagEntry)> = Vec::new();
        for (index, list) in lists.into_iter().enumerate() {
            assert!(
                list.windows(2).all(|pair| pair[0].key() < pair[1].key()),
                "tag list of category {index} is not strictly sorted"
            );
            let id = CategoryId::from_index(index);
            combined.extend(list.into_iter().map(|entry| (id, entry)));
        }
        combined.sort_by_key(|(_, entry)| entry.key());
        relevel_orders(combined.iter_mut().map(|(_, entry)| &mut entry.span));

        let mut per_category = vec![Vec::new(); self.categories.len()];
        for (id, entry) in &combined {
            per_category[id.index()].push(entry.clone());
        }
        for (slot, entries) in self.categories.iter_mut().zip(per_category) {
            slot.registry.reset_with(entries);
        }

        self.owners = combined.iter().map(|(id, _)| *id).collect();
        self.merged
            .reset_with(combined.into_iter().map(|(_, entry)| entry).collect());

        debug!(
            entries = self.merged.len(),
            categories = self.categories.len(),
            "union registry populated"
        );
    }

    /// Remap every span of every category through `mapping`
    ///
    /// Ties created by the mapping are renumbered globally and the result is
    /// written back to each category. Changed entries are reported as
    /// replaced in every affected journal.
    pub fn reconcile<M: CharacterMapping + ?Sized>(&mut self, mapping: &M) -> ReconcileReport {
        let mut spans: Vec<TagSpan> = self.merged.entries().iter().map(|e| e.span).collect();
        let report = reconcile_spans(spans.iter_mut(), mapping);
        relevel_orders(spans.iter_mut());

        let mut per_category = vec![Vec::new(); self.categories.len()];
        for (span, owner) in spans.iter().zip(&self.owners) {
            per_category[owner.index()].push(*span);
        }
        for (slot, category_spans) in self.categories.iter_mut().zip(&per_category) {
            slot.registry.rewrite_spans(category_spans);
        }
        self.merged.rewrite_spans(&spans);
        report
    }

    /// Cursor just past the latest change of the merged registry
    #[must_use]
    pub fn journal_end(&self) -> JournalCursor {
        self.merged.journal_end()
    }

    /// Changes of the merged registry since `cursor`
    #[must_use]
    pub fn changes_since(&self, cursor: JournalCursor) -> &[RegistryChange] {
        self.merged.changes_since(cursor)
    }

    /// Check if `cursor` can be read from the merged journal
    #[must_use]
    pub fn accepts_cursor(&self, cursor: JournalCursor) -> bool {
        self.merged.accepts_cursor(cursor)
    }

    /// Discard merged-registry history before `cursor`
    pub fn trim_journal(&mut self, cursor: JournalCursor) {
        self.merged.trim_journal(cursor);
    }

    /// Discard history of one category before `cursor`
    pub fn trim_category_journal(&mut self, category: CategoryId, cursor: JournalCursor) {
        self.slot_mut(category).registry.trim_journal(cursor);
    }

    /// Remove the entry with `key` from `category` and from the merged view
    fn remove_key(&mut self, category: CategoryId, key: SpanKey) -> Option<TagEntry> {
        let registry = &mut self.slot_mut(category).registry;
        let position = registry.position_of(key)?;
        registry.remove_entry(position);

        let merged_position = mirrored_position(&self.merged, key);
        self.owners.remove(merged_position);
        Some(self.merged.remove_entry(merged_position))
    }

    /// Slot of a category
    fn slot(&self, id: CategoryId) -> &CategorySlot {
        self.categories
            .get(id.index())
            .unwrap_or_else(|| panic!("unknown {id} in union of {}", self.categories.len()))
    }

    /// Mutable slot of a category
    fn slot_mut(&mut self, id: CategoryId) -> &mut CategorySlot {
        let count = self.categories.len();
        self.categories
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("unknown {id} in union of {count}"))
    }
}

/// Position of `key` in a registry that must mirror it
fn mirrored_position(registry: &TagRegistry, key: SpanKey) -> usize {
    registry.position_of(key).unwrap_or_else(|| {
        panic!(
            "union out of sync: no entry ({}, {}) in mirror",
            key.start_index, key.order_at_index
        )
    })
}
