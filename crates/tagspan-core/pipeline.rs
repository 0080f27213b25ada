//! End-to-end tag pipeline
//!
//! [`TagPipeline`] ties a [`TextPreprocessor`] to a [`UnionRegistry`]: each
//! category registered with the pipeline gets a matcher and a registry
//! under the same [`CategoryId`]. Setting new text strips and resolves the
//! tags, then repopulates every registry with a single reset.
//!
//! Runtime edits and reconciliation grow the registry journals between
//! texts. Each journal drops its oldest history past its limit (see
//! [`UnionRegistry::set_journal_limit`]), so caches that sync rarely fall
//! back to a rebuild instead of the journal growing without bound.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::{TagPipeline, TagSet};
//!
//! let mut pipeline = TagPipeline::new();
//! let effects = pipeline.register(None, TagSet::new("effects").with_block("wave"))?;
//! let commands = pipeline.register(Some('!'), TagSet::new("commands").with_point("wait"))?;
//!
//! assert_eq!(pipeline.set_text("Hi <wave>there</wave><!wait=2>!"), "Hi there!");
//! assert_eq!(pipeline.tags(effects)[0].span.end_index, Some(8));
//! assert_eq!(pipeline.tags(commands)[0].span.start_index, 8);
//! # Ok::<(), tagspan_core::CoreError>(())
//! ```

use crate::{
    parser::{PreprocessorConfig, TextPreprocessor},
    plugin::CategoryPolicy,
    reconcile::{CharacterMapping, ReconcileReport},
    registry::UnionRegistry,
    tags::{CategoryId, TagEntry},
    Result,
};
use tracing::debug;

/// Preprocessor and registry driven together
#[derive(Debug, Default)]
pub struct TagPipeline {
    /// Tag stripping and resolution
    preprocessor: TextPreprocessor,
    /// Resolved tags of the current text
    registry: UnionRegistry,
    /// Text of the last pass with accepted tags removed
    clean_text: String,
    /// Length of `clean_text` in the configured position unit
    clean_len: usize,
}

impl TagPipeline {
    /// Create a pipeline with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with a custom preprocessor configuration
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if the configuration does not validate.
    pub fn with_config(config: PreprocessorConfig) -> Result<Self> {
        Ok(Self {
            preprocessor: TextPreprocessor::with_config(config)?,
            ..Self::default()
        })
    }

    /// Register a category for tags with `prefix`
    ///
    /// Categories registered first win when several accept the same tag.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Category` if a category with the same name exists.
    pub fn register<P>(&mut self, prefix: Option<char>, policy: P) -> Result<CategoryId>
    where
        P: CategoryPolicy + 'static,
    {
        let name = policy.name().to_owned();
        let id = self.preprocessor.register(prefix, policy)?;
        let slot = self.registry.add_category(name);
        assert_eq!(id, slot, "matcher and registry ids diverged");
        Ok(id)
    }

    /// Replace the text, returning the clean text
    ///
    /// Every registry receives exactly one reset. Tags added at runtime
    /// since the previous call are discarded.
    pub fn set_text(&mut self, raw: &str) -> &str {
        let processed = self.preprocessor.process(raw);
        self.clean_len = processed.clean_len();
        let (clean_text, lists) = processed.into_parts();
        self.clean_text = clean_text;
        self.registry.populate(lists);
        debug!(
            raw_len = raw.len(),
            clean_len = self.clean_len,
            tags = self.registry.len(),
            "pipeline text set"
        );
        &self.clean_text
    }

    /// Remap every tag onto rendered text
    pub fn reconcile<M: CharacterMapping + ?Sized>(&mut self, mapping: &M) -> ReconcileReport {
        self.registry.reconcile(mapping)
    }

    /// Clean text of the last pass
    #[must_use]
    pub fn clean_text(&self) -> &str {
        &self.clean_text
    }

    /// Length of the clean text in the configured position unit
    #[must_use]
    pub const fn clean_len(&self) -> usize {
        self.clean_len
    }

    /// Entries of one category
    ///
    /// # Panics
    ///
    /// Panics if `category` was not registered with this pipeline.
    #[must_use]
    pub fn tags(&self, category: CategoryId) -> &[TagEntry] {
        self.registry.category(category).entries()
    }

    /// Entries of every category active at `index`, in merged order
    pub fn tags_at(&self, index: usize) -> impl Iterator<Item = (CategoryId, &TagEntry)> + '_ {
        self.registry.tags_at(index)
    }

    /// Category registered under `name`
    #[must_use]
    pub fn category(&self, name: &str) -> Option<CategoryId> {
        self.preprocessor.multiplexer().find(name)
    }

    /// Registries of the current text
    #[must_use]
    pub const fn registry(&self) -> &UnionRegistry {
        &self.registry
    }

    /// Registries for runtime insertion and removal
    pub fn registry_mut(&mut self) -> &mut UnionRegistry {
        &mut self.registry
    }

    /// Preprocessor settings and categories
    #[must_use]
    pub const fn preprocessor(&self) -> &TextPreprocessor {
        &self.preprocessor
    }
}
