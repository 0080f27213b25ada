//! Single-pass tag stripping
//!
//! [`TextPreprocessor`] scans raw text left to right, hands every tag to the
//! category multiplexer and builds the clean text from everything that was
//! not accepted. Accepted tags are recorded at their clean-text position,
//! measured in the configured [`PositionEncoding`](crate::utils::PositionEncoding).
//!
//! Tags discovered at the same clean position are ranked by discovery
//! order. The rank restarts at zero whenever literal text is emitted
//! between two tags; rejected tags and verbatim content do not restart it.

use super::{
    config::PreprocessorConfig,
    macros::{MacroAction, MacroState},
    multiplexer::CategoryMultiplexer,
};
use crate::{
    plugin::CategoryPolicy,
    tags::{CategoryId, TagEntry},
    tokenizer::scan_next,
    Result,
};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Output of one preprocessing pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedText {
    /// Raw text minus every accepted tag
    clean_text: String,
    /// Length of `clean_text` in the configured position unit
    clean_len: usize,
    /// Resolved entries indexed by category
    tags: Vec<Vec<TagEntry>>,
}

impl ProcessedText {
    /// Text handed to the renderer
    #[must_use]
    pub fn clean_text(&self) -> &str {
        &self.clean_text
    }

    /// Length of the clean text in the configured position unit
    #[must_use]
    pub const fn clean_len(&self) -> usize {
        self.clean_len
    }

    /// Entries of one category, sorted by start then order
    ///
    /// Unknown categories have no entries.
    #[must_use]
    pub fn tags(&self, category: CategoryId) -> &[TagEntry] {
        self.tags.get(category.index()).map_or(&[], Vec::as_slice)
    }

    /// Entries of every category, in registration order
    pub fn categories(&self) -> impl Iterator<Item = (CategoryId, &[TagEntry])> {
        self.tags
            .iter()
            .enumerate()
            .map(|(index, tags)| (CategoryId::from_index(index), tags.as_slice()))
    }

    /// Total number of accepted open tags
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.iter().map(Vec::len).sum()
    }

    /// Split into clean text and per-category entries
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Vec<TagEntry>>) {
        (self.clean_text, self.tags)
    }
}

/// Strips tags from raw text and resolves them per category
///
/// # Example
///
/// ```rust
/// use tagspan_core::parser::TextPreprocessor;
/// use tagspan_core::plugin::TagSet;
///
/// let mut preprocessor = TextPreprocessor::new();
/// let commands = preprocessor
///     .register(Some('!'), TagSet::new("commands").with_point("wait"))?;
/// let events = preprocessor
///     .register(Some('?'), TagSet::new("events").with_point("event"))?;
///
/// let output = preprocessor.process("A<!wait=1>B<?event>C");
/// assert_eq!(output.clean_text(), "ABC");
/// assert_eq!(output.tags(commands)[0].span.start_index, 1);
/// assert_eq!(output.tags(events)[0].span.start_index, 2);
/// # Ok::<(), tagspan_core::utils::CoreError>(())
/// ```
#[derive(Debug, Default)]
pub struct TextPreprocessor {
    /// Pass settings
    config: PreprocessorConfig,
    /// Category matchers
    multiplexer: CategoryMultiplexer,
}

impl TextPreprocessor {
    /// Create a preprocessor with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preprocessor with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if the configuration does not validate.
    pub fn with_config(config: PreprocessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            multiplexer: CategoryMultiplexer::new(),
        })
    }

    /// Register a category for tags with `prefix`
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Category` if a category with the same name exists.
    pub fn register<P>(&mut self, prefix: Option<char>, policy: P) -> Result<CategoryId>
    where
        P: CategoryPolicy + 'static,
    {
        self.multiplexer.register(prefix, Box::new(policy))
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Registered categories
    #[must_use]
    pub const fn multiplexer(&self) -> &CategoryMultiplexer {
        &self.multiplexer
    }

    /// Run one pass over `raw`
    ///
    /// Matchers are reset first, so every pass starts from scratch.
    pub fn process(&mut self, raw: &str) -> ProcessedText {
        let encoding = self.config.position_encoding;
        let emit_markers = self.config.emit_verbatim_markers;

        // Borrowed until a style macro rewrites the raw text
        let mut text = Cow::Borrowed(raw);
        let mut clean = String::with_capacity(raw.len());
        let mut position = 0;
        let mut order = 0;
        let mut search = 0;
        let mut macros = MacroState::default();
        let (mut accepted, mut rejected) = (0_usize, 0_usize);

        self.multiplexer.reset();

        loop {
            let Some(token) = scan_next(&text, search) else {
                break;
            };
            let literal = &text[search..token.start];
            if !literal.is_empty() {
                clean.push_str(literal);
                position += encoding.measure(literal);
                order = 0;
            }

            let range = token.byte_range();
            match macros.apply(&token, &self.config) {
                Some(MacroAction::Expand(replacement)) => {
                    text.to_mut().replace_range(range.clone(), &replacement);
                    search = range.start;
                    continue;
                }
                Some(MacroAction::EnterVerbatim | MacroAction::ExitVerbatim) => {
                    if emit_markers {
                        clean.push_str(token.span);
                        position += encoding.measure(token.span);
                    }
                }
                None if macros.in_verbatim() => {
                    clean.push_str(token.span);
                    position += encoding.measure(token.span);
                }
                None => {
                    if self.multiplexer.dispatch(&token, position, order).is_some() {
                        accepted += 1;
                        order += 1;
                    } else {
                        trace!(tag = token.span, position, "tag rejected, kept as text");
                        rejected += 1;
                        clean.push_str(token.span);
                        position += encoding.measure(token.span);
                    }
                }
            }

            search = range.end;
        }

        let trailing = &text[search..];
        clean.push_str(trailing);
        position += encoding.measure(trailing);

        debug!(
            raw_len = raw.len(),
            clean_len = position,
            accepted,
            rejected,
            expansions = macros.expansions(),
            "preprocessed text"
        );

        ProcessedText {
            clean_text: clean,
            clean_len: position,
            tags: self.multiplexer.take_entries(),
        }
    }
}

#[cfg(test)]
mod tests;
