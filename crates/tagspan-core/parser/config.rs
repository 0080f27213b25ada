//! Preprocessor configuration and style sheets
//!
//! Configuration is plain data; with the `serde` feature enabled it can be
//! loaded from any serde format by the host application.

use crate::{
    utils::{create_hash_map, CoreError, FastHashMap, PositionEncoding},
    Result,
};

/// Default name of the verbatim toggle tag
pub const DEFAULT_VERBATIM_TAG: &str = "noparse";

/// Default budget of style expansions per preprocessing pass
pub const DEFAULT_MAX_STYLE_EXPANSIONS: usize = 256;

/// Markup inserted in place of `<style=Name>` and `</style>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleDefinition {
    /// Replacement for the opening style tag
    pub opening: String,
    /// Replacement for the matching `</style>`
    pub closing: String,
}

impl StyleDefinition {
    /// Create a definition from its two replacement texts
    pub fn new(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            closing: closing.into(),
        }
    }
}

/// Named style definitions used by the style macro
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StyleSheet {
    /// Definitions by style name
    styles: FastHashMap<String, StyleDefinition>,
}

impl StyleSheet {
    /// Create an empty style sheet
    #[must_use]
    pub fn new() -> Self {
        Self {
            styles: create_hash_map(),
        }
    }

    /// Add or replace a style
    #[must_use]
    pub fn with_style(mut self, name: impl Into<String>, style: StyleDefinition) -> Self {
        self.insert(name, style);
        self
    }

    /// Add or replace a style, returning the previous definition
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        style: StyleDefinition,
    ) -> Option<StyleDefinition> {
        self.styles.insert(name.into(), style)
    }

    /// Look up a style by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    /// Remove a style
    pub fn remove(&mut self, name: &str) -> Option<StyleDefinition> {
        self.styles.remove(name)
    }

    /// Number of styles
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the sheet has no styles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over `(name, definition)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleDefinition)> {
        self.styles.iter().map(|(name, style)| (name.as_str(), style))
    }
}

/// Settings for [`TextPreprocessor`](super::TextPreprocessor)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreprocessorConfig {
    /// Unit of clean-text positions
    pub position_encoding: PositionEncoding,
    /// Name of the verbatim toggle tag, `None` disables the macro
    pub verbatim_tag: Option<String>,
    /// Copy the verbatim toggles into the clean text instead of consuming them
    pub emit_verbatim_markers: bool,
    /// Styles available to `<style=Name>`
    pub style_sheet: StyleSheet,
    /// Maximum style expansions per pass
    pub max_style_expansions: usize,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            position_encoding: PositionEncoding::default(),
            verbatim_tag: Some(DEFAULT_VERBATIM_TAG.to_string()),
            emit_verbatim_markers: false,
            style_sheet: StyleSheet::new(),
            max_style_expansions: DEFAULT_MAX_STYLE_EXPANSIONS,
        }
    }
}

impl PreprocessorConfig {
    /// Set the position unit
    #[must_use]
    pub const fn with_position_encoding(mut self, encoding: PositionEncoding) -> Self {
        self.position_encoding = encoding;
        self
    }

    /// Set or disable the verbatim toggle tag
    #[must_use]
    pub fn with_verbatim_tag(mut self, tag: Option<&str>) -> Self {
        self.verbatim_tag = tag.map(str::to_string);
        self
    }

    /// Keep verbatim toggles in the clean text
    #[must_use]
    pub const fn with_verbatim_markers(mut self, emit: bool) -> Self {
        self.emit_verbatim_markers = emit;
        self
    }

    /// Use a style sheet
    #[must_use]
    pub fn with_style_sheet(mut self, sheet: StyleSheet) -> Self {
        self.style_sheet = sheet;
        self
    }

    /// Set the style expansion budget
    #[must_use]
    pub const fn with_max_style_expansions(mut self, limit: usize) -> Self {
        self.max_style_expansions = limit;
        self
    }

    /// Check that tag names in the configuration can actually be scanned
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if the verbatim tag or a style name is
    /// empty, contains whitespace or brackets, or the verbatim tag starts
    /// with a character that the scanner would read as a prefix.
    pub fn validate(&self) -> Result<()> {
        if let Some(tag) = &self.verbatim_tag {
            validate_tag_name(tag)
                .map_err(|reason| CoreError::config(format!("verbatim tag '{tag}' {reason}")))?;
            if tag.starts_with(|c: char| !c.is_alphabetic()) {
                return Err(CoreError::config(format!(
                    "verbatim tag '{tag}' must start with a letter"
                )));
            }
        }

        for (name, _) in self.style_sheet.iter() {
            validate_tag_name(name)
                .map_err(|reason| CoreError::config(format!("style name '{name}' {reason}")))?;
        }

        Ok(())
    }
}

/// Reason a name cannot appear inside a scanned tag, if any
fn validate_tag_name(name: &str) -> core::result::Result<(), &'static str> {
    if name.is_empty() {
        return Err("is empty");
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '=' | '"'))
    {
        return Err("contains whitespace, brackets, quotes or '='");
    }
    Ok(())
}
