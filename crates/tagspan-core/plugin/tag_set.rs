//! Name-keyed tag definitions acting as a category policy
//!
//! `TagSet` is the built-in stand-in for an effect database: each known tag
//! name maps to how its span closes and an optional parameter check.
//!
//! # Example
//!
//! ```rust
//! use tagspan_core::plugin::{CategoryPolicy, SpanClosing, TagSet};
//! use tagspan_core::tags::{FromParam, TagIdentity};
//!
//! let commands = TagSet::new("commands")
//!     .with_point("wait")
//!     .with_validator("wait", |params| {
//!         params.unnamed().map_or(false, |v| f32::from_param(v).is_ok())
//!     });
//!
//! let ok = TagIdentity::new("wait", Some('!'), [("", "1")].into_iter().collect());
//! let bad = TagIdentity::new("wait", Some('!'), [("", "soon")].into_iter().collect());
//! assert_eq!(commands.validate_open(&ok), Some(SpanClosing::POINT));
//! assert_eq!(commands.validate_open(&bad), None);
//! ```

use super::{CategoryPolicy, PolicyCapabilities, SpanClosing};
use crate::{
    tags::{TagIdentity, TagParameters},
    utils::{create_hash_map, CoreError, FastHashMap},
    Result,
};
use core::fmt;

/// Parameter check attached to a tag definition
pub type ParameterValidator = Box<dyn Fn(&TagParameters) -> bool + Send + Sync>;

/// Definition of one known tag
pub struct TagDefinition {
    /// How spans of this tag end
    closing: SpanClosing,
    /// Optional parameter check
    validator: Option<ParameterValidator>,
}

impl TagDefinition {
    /// Definition without a parameter check
    #[must_use]
    pub const fn new(closing: SpanClosing) -> Self {
        Self {
            closing,
            validator: None,
        }
    }

    /// How spans of this tag end
    #[must_use]
    pub const fn closing(&self) -> SpanClosing {
        self.closing
    }

    /// Run the parameter check, accepting everything if there is none
    #[must_use]
    pub fn accepts(&self, parameters: &TagParameters) -> bool {
        self.validator
            .as_ref()
            .map_or(true, |validate| validate(parameters))
    }
}

impl fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDefinition")
            .field("closing", &self.closing)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// Policy accepting a fixed set of tag names
pub struct TagSet {
    /// Category name
    name: String,
    /// Known tags by name
    definitions: FastHashMap<String, TagDefinition>,
}

impl TagSet {
    /// Create an empty set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definitions: create_hash_map(),
        }
    }

    /// Add or replace a block tag (open until closed)
    #[must_use]
    pub fn with_block(mut self, tag: impl Into<String>) -> Self {
        self.definitions
            .insert(tag.into(), TagDefinition::new(SpanClosing::UntilClosed));
        self
    }

    /// Add or replace a point tag (covers one position)
    #[must_use]
    pub fn with_point(mut self, tag: impl Into<String>) -> Self {
        self.definitions
            .insert(tag.into(), TagDefinition::new(SpanClosing::POINT));
        self
    }

    /// Attach a parameter check to an already defined tag
    ///
    /// Unknown names are ignored.
    #[must_use]
    pub fn with_validator<F>(mut self, tag: &str, validator: F) -> Self
    where
        F: Fn(&TagParameters) -> bool + Send + Sync + 'static,
    {
        if let Some(definition) = self.definitions.get_mut(tag) {
            definition.validator = Some(Box::new(validator));
        }
        self
    }

    /// Define a new tag
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Category` if `tag` is already defined.
    pub fn define(&mut self, tag: impl Into<String>, definition: TagDefinition) -> Result<()> {
        let tag = tag.into();
        if self.definitions.contains_key(&tag) {
            return Err(CoreError::category_error(format!(
                "tag '{tag}' already defined in '{}'",
                self.name
            )));
        }
        self.definitions.insert(tag, definition);
        Ok(())
    }

    /// Remove a tag definition
    pub fn remove(&mut self, tag: &str) -> Option<TagDefinition> {
        self.definitions.remove(tag)
    }

    /// Check if a tag name is defined
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Definition for a tag name
    #[must_use]
    pub fn definition(&self, tag: &str) -> Option<&TagDefinition> {
        self.definitions.get(tag)
    }

    /// Number of defined tags
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if no tags are defined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Sorted list of defined tag names
    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl CategoryPolicy for TagSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> PolicyCapabilities {
        let has_blocks = self
            .definitions
            .values()
            .any(|d| d.closing == SpanClosing::UntilClosed);
        if has_blocks {
            PolicyCapabilities::all()
        } else {
            PolicyCapabilities::VALIDATE_OPEN
        }
    }

    fn validate_open(&self, tag: &TagIdentity) -> Option<SpanClosing> {
        let definition = self.definitions.get(tag.name())?;
        definition
            .accepts(tag.parameters())
            .then_some(definition.closing)
    }

    fn validate_close(&self, tag: &TagIdentity) -> bool {
        // Point tags close themselves, so only block tags take a close tag
        self.definitions
            .get(tag.name())
            .is_some_and(|d| d.closing == SpanClosing::UntilClosed)
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSet")
            .field("name", &self.name)
            .field("tags", &self.tag_names())
            .finish()
    }
}
