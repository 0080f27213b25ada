//! Routing of tokens to category matchers by prefix character

use super::matcher::TagMatcher;
use crate::{
    plugin::CategoryPolicy,
    tags::{CategoryId, TagEntry},
    tokenizer::RawTagToken,
    utils::{create_hash_map, CoreError, FastHashMap},
    Result,
};
use tracing::trace;

/// Owns every category matcher and routes tokens to them
///
/// Several categories may share a prefix; they are tried in registration
/// order and the first one accepting a token wins.
#[derive(Debug, Default)]
pub struct CategoryMultiplexer {
    /// Matchers indexed by category id
    matchers: Vec<TagMatcher>,
    /// Category ids per prefix, in priority order
    routes: FastHashMap<Option<char>, Vec<CategoryId>>,
}

impl CategoryMultiplexer {
    /// Create a multiplexer without categories
    #[must_use]
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
            routes: create_hash_map(),
        }
    }

    /// Register a category for tags with `prefix`
    ///
    /// Categories registered earlier for the same prefix take priority.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Category` if a category with the same policy name
    /// is already registered.
    pub fn register(
        &mut self,
        prefix: Option<char>,
        policy: Box<dyn CategoryPolicy>,
    ) -> Result<CategoryId> {
        if self.find(policy.name()).is_some() {
            return Err(CoreError::category_error(format!(
                "category '{}' is already registered",
                policy.name()
            )));
        }

        let id = CategoryId::from_index(self.matchers.len());
        self.matchers.push(TagMatcher::new(id, prefix, policy));
        self.routes.entry(prefix).or_default().push(id);
        Ok(id)
    }

    /// Offer `token` to the matchers of its prefix
    ///
    /// Returns the category that accepted it, or `None` if no category is
    /// registered for the prefix or all of them rejected the token.
    pub fn dispatch(
        &mut self,
        token: &RawTagToken<'_>,
        position: usize,
        order: usize,
    ) -> Option<CategoryId> {
        let route = self.routes.get(&token.prefix)?;

        for &id in route {
            if self.matchers[id.index()].process(token, position, order) {
                trace!(category = %id, tag = token.span, position, order, "tag accepted");
                return Some(id);
            }
        }
        None
    }

    /// Look up a category by policy name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<CategoryId> {
        self.matchers
            .iter()
            .find(|m| m.policy().name() == name)
            .map(TagMatcher::id)
    }

    /// Matcher of a category
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this multiplexer.
    #[must_use]
    pub fn matcher(&self, id: CategoryId) -> &TagMatcher {
        &self.matchers[id.index()]
    }

    /// All matchers in registration order
    #[must_use]
    pub fn matchers(&self) -> &[TagMatcher] {
        &self.matchers
    }

    /// Number of registered categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Check if no categories are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Reset every matcher
    pub fn reset(&mut self) {
        for matcher in &mut self.matchers {
            matcher.reset();
        }
    }

    /// Move resolved entries out of every matcher, indexed by category
    pub fn take_entries(&mut self) -> Vec<Vec<TagEntry>> {
        self.matchers.iter_mut().map(TagMatcher::take_entries).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{plugin::TagSet, tokenizer::scan_next};

    fn multiplexer() -> (CategoryMultiplexer, CategoryId, CategoryId, CategoryId) {
        let mut mux = CategoryMultiplexer::new();
        let effects = mux
            .register(None, Box::new(TagSet::new("effects").with_block("wave")))
            .unwrap();
        let styles = mux
            .register(
                None,
                Box::new(TagSet::new("styles").with_block("wave").with_block("b")),
            )
            .unwrap();
        let commands = mux
            .register(Some('!'), Box::new(TagSet::new("commands").with_point("wait")))
            .unwrap();
        (mux, effects, styles, commands)
    }

    fn dispatch(mux: &mut CategoryMultiplexer, tag: &str) -> Option<CategoryId> {
        let token = scan_next(tag, 0).unwrap();
        mux.dispatch(&token, 0, 0)
    }

    #[test]
    fn routes_by_prefix() {
        let (mut mux, _, _, commands) = multiplexer();
        assert_eq!(dispatch(&mut mux, "<!wait>"), Some(commands));
        assert_eq!(dispatch(&mut mux, "<?event>"), None);
    }

    #[test]
    fn first_registered_wins() {
        let (mut mux, effects, styles, _) = multiplexer();
        assert_eq!(dispatch(&mut mux, "<wave>"), Some(effects));
        assert_eq!(dispatch(&mut mux, "<b>"), Some(styles));
        assert_eq!(mux.matcher(effects).entries().len(), 1);
        assert_eq!(mux.matcher(styles).entries().len(), 1);
    }

    #[test]
    fn falls_through_to_next_matcher() {
        let (mut mux, effects, styles, _) = multiplexer();
        dispatch(&mut mux, "<b>");
        // `effects` has no open `b`, `styles` does
        assert_eq!(dispatch(&mut mux, "</b>"), Some(styles));
        assert!(mux.matcher(effects).entries().is_empty());
    }

    #[test]
    fn duplicate_category_name_is_rejected() {
        let (mut mux, ..) = multiplexer();
        let err = mux
            .register(Some('#'), Box::new(TagSet::new("effects")))
            .unwrap_err();
        assert!(err.to_string().contains("effects"));
        assert_eq!(mux.len(), 3);
    }

    #[test]
    fn find_reset_and_take() {
        let (mut mux, effects, _, commands) = multiplexer();
        assert_eq!(mux.find("commands"), Some(commands));
        assert_eq!(mux.find("missing"), None);

        dispatch(&mut mux, "<wave>");
        let taken = mux.take_entries();
        assert_eq!(taken.len(), 3);
        assert_eq!(taken[effects.index()].len(), 1);

        dispatch(&mut mux, "<wave>");
        mux.reset();
        assert!(mux.matchers().iter().all(|m| m.entries().is_empty()));
    }
}
