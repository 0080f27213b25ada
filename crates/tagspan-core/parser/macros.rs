//! Pass-through markup macros applied before category dispatch
//!
//! - `<noparse>` ... `</noparse>`: everything in between is literal text
//! - `<style=Name>` ... `</style>`: replaced in the raw text by the opening
//!   and closing markup of a style sheet entry, then rescanned
//!
//! Both only react to unprefixed tags.

use super::config::PreprocessorConfig;
use crate::tokenizer::{decode_parameters, RawTagToken};
use tracing::warn;

/// Name of the style macro tag
pub const STYLE_TAG: &str = "style";

/// What the preprocessor must do with a macro tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum MacroAction {
    /// Start of a verbatim region
    EnterVerbatim,
    /// End of a verbatim region
    ExitVerbatim,
    /// Replace the tag in the raw text and rescan from its start
    Expand(String),
}

/// Macro state for one preprocessing pass
#[derive(Debug, Default)]
pub(super) struct MacroState {
    /// Inside `<noparse>`
    verbatim: bool,
    /// Closing markup of styles not yet closed, innermost last
    open_styles: Vec<String>,
    /// Expansions performed so far
    expansions: usize,
    /// Budget warning already emitted
    exhausted: bool,
}

impl MacroState {
    /// Check if the scan is inside a verbatim region
    pub const fn in_verbatim(&self) -> bool {
        self.verbatim
    }

    /// Expansions performed so far
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// Classify `token`, updating the macro state
    ///
    /// `None` means the token is not a macro and goes through normal
    /// handling.
    pub fn apply(
        &mut self,
        token: &RawTagToken<'_>,
        config: &PreprocessorConfig,
    ) -> Option<MacroAction> {
        if token.prefix.is_some() {
            return None;
        }

        if config.verbatim_tag.as_deref() == Some(token.name) {
            if token.is_open() && !self.verbatim {
                self.verbatim = true;
                return Some(MacroAction::EnterVerbatim);
            }
            if token.is_close() && self.verbatim {
                self.verbatim = false;
                return Some(MacroAction::ExitVerbatim);
            }
        }

        if self.verbatim || token.name != STYLE_TAG {
            return None;
        }

        if token.is_open() {
            let parameters = decode_parameters(token.parameter_text);
            let style = config.style_sheet.get(parameters.unnamed()?)?;
            if !self.take_budget(config) {
                return None;
            }
            self.open_styles.push(style.closing.clone());
            Some(MacroAction::Expand(style.opening.clone()))
        } else {
            if self.open_styles.is_empty() || !self.take_budget(config) {
                return None;
            }
            self.open_styles.pop().map(MacroAction::Expand)
        }
    }

    /// Count one expansion against the budget
    fn take_budget(&mut self, config: &PreprocessorConfig) -> bool {
        if self.expansions < config.max_style_expansions {
            self.expansions += 1;
            return true;
        }
        if !self.exhausted {
            self.exhausted = true;
            warn!(
                limit = config.max_style_expansions,
                "style expansion budget exhausted, remaining style tags left as text"
            );
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parser::config::{StyleDefinition, StyleSheet},
        tokenizer::scan_next,
    };

    fn config() -> PreprocessorConfig {
        PreprocessorConfig::default().with_style_sheet(
            StyleSheet::new().with_style("loud", StyleDefinition::new("<wave><b>", "</b></wave>")),
        )
    }

    fn apply(state: &mut MacroState, config: &PreprocessorConfig, tag: &str) -> Option<MacroAction> {
        let token = scan_next(tag, 0).unwrap();
        state.apply(&token, config)
    }

    #[test]
    fn verbatim_toggles() {
        let config = config();
        let mut state = MacroState::default();
        assert_eq!(apply(&mut state, &config, "</noparse>"), None);
        assert_eq!(
            apply(&mut state, &config, "<noparse>"),
            Some(MacroAction::EnterVerbatim)
        );
        assert!(state.in_verbatim());
        assert_eq!(apply(&mut state, &config, "<noparse>"), None);
        assert_eq!(apply(&mut state, &config, "<style=loud>"), None);
        assert_eq!(
            apply(&mut state, &config, "</noparse>"),
            Some(MacroAction::ExitVerbatim)
        );
        assert!(!state.in_verbatim());
    }

    #[test]
    fn disabled_verbatim_tag() {
        let config = config().with_verbatim_tag(None);
        let mut state = MacroState::default();
        assert_eq!(apply(&mut state, &config, "<noparse>"), None);
    }

    #[test]
    fn prefixed_tags_are_never_macros() {
        let config = config();
        let mut state = MacroState::default();
        assert_eq!(apply(&mut state, &config, "<!noparse>"), None);
        assert_eq!(apply(&mut state, &config, "<#style=loud>"), None);
    }

    #[test]
    fn style_expands_and_closes() {
        let config = config();
        let mut state = MacroState::default();
        assert_eq!(
            apply(&mut state, &config, "<style=loud>"),
            Some(MacroAction::Expand("<wave><b>".into()))
        );
        assert_eq!(
            apply(&mut state, &config, "</style>"),
            Some(MacroAction::Expand("</b></wave>".into()))
        );
        assert_eq!(apply(&mut state, &config, "</style>"), None);
        assert_eq!(state.expansions(), 2);
    }

    #[test]
    fn unknown_style_passes_through() {
        let config = config();
        let mut state = MacroState::default();
        assert_eq!(apply(&mut state, &config, "<style=quiet>"), None);
        assert_eq!(apply(&mut state, &config, "<style>"), None);
        assert_eq!(state.expansions(), 0);
    }

    #[test]
    fn budget_limits_expansions() {
        let config = config().with_max_style_expansions(1);
        let mut state = MacroState::default();
        assert!(apply(&mut state, &config, "<style=loud>").is_some());
        assert_eq!(apply(&mut state, &config, "</style>"), None);
        assert_eq!(apply(&mut state, &config, "<style=loud>"), None);
        assert_eq!(state.expansions(), 1);
    }
}
