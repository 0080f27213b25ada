//! Per-category tag matching
//!
//! A [`TagMatcher`] turns the stream of open/close tokens routed to one
//! category into resolved [`TagEntry`] values. Entries are appended in
//! source order; closing a tag only ever sets the end of an existing entry.
//!
//! Close tags pair by name with the most recent still-open entry, so spans
//! of different names may overlap freely while same-named tags nest LIFO.
//! Two keywords bypass the category policy:
//!
//! - `</>` closes the most recently opened entry of any name
//! - `</all>` closes every open entry

use crate::{
    plugin::{CategoryPolicy, PolicyCapabilities},
    tags::{CategoryId, TagEntry, TagIdentity, TagSpan},
    tokenizer::{decode_parameters, RawTagToken},
};
use core::fmt;

/// Resolves tags of a single category
pub struct TagMatcher {
    /// Category handle
    id: CategoryId,
    /// Prefix character routed to this matcher
    prefix: Option<char>,
    /// Policy judging tags of this category
    policy: Box<dyn CategoryPolicy>,
    /// Resolved entries in source order
    entries: Vec<TagEntry>,
}

impl TagMatcher {
    /// Create a matcher for `policy`
    pub fn new(id: CategoryId, prefix: Option<char>, policy: Box<dyn CategoryPolicy>) -> Self {
        Self {
            id,
            prefix,
            policy,
            entries: Vec::new(),
        }
    }

    /// Category handle
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Prefix character routed to this matcher
    #[must_use]
    pub const fn prefix(&self) -> Option<char> {
        self.prefix
    }

    /// Policy governing this category
    #[must_use]
    pub fn policy(&self) -> &dyn CategoryPolicy {
        self.policy.as_ref()
    }

    /// Entries resolved so far, in source order
    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Move the resolved entries out, leaving the matcher empty
    pub fn take_entries(&mut self) -> Vec<TagEntry> {
        core::mem::take(&mut self.entries)
    }

    /// Drop all entries before a new pass
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Process one token at clean-text `position`
    ///
    /// Returns `true` if the token was accepted. A rejected token leaves the
    /// matcher untouched.
    pub fn process(&mut self, token: &RawTagToken<'_>, position: usize, order: usize) -> bool {
        if token.is_open() {
            self.open(token, position, order)
        } else if token.closes_most_recent() {
            self.close_most_recent(position)
        } else if token.closes_all() {
            self.close_all(position)
        } else {
            self.close_named(token, position)
        }
    }

    /// Validate an open tag and append its entry
    fn open(&mut self, token: &RawTagToken<'_>, position: usize, order: usize) -> bool {
        if !self
            .policy
            .capabilities()
            .contains(PolicyCapabilities::VALIDATE_OPEN)
        {
            return false;
        }

        let identity = identity_of(token);
        let Some(closing) = self.policy.validate_open(&identity) else {
            return false;
        };

        let span = TagSpan {
            start_index: position,
            end_index: closing.forced_end(position),
            order_at_index: order,
        };
        self.entries.push(TagEntry::new(span, identity));
        true
    }

    /// `</>`
    fn close_most_recent(&mut self, position: usize) -> bool {
        match self.entries.iter_mut().rev().find(|e| e.span.is_open()) {
            Some(entry) => {
                entry.span.close_at(position);
                true
            }
            None => false,
        }
    }

    /// `</all>`
    fn close_all(&mut self, position: usize) -> bool {
        let mut closed = false;
        for entry in self.entries.iter_mut().filter(|e| e.span.is_open()) {
            entry.span.close_at(position);
            closed = true;
        }
        closed
    }

    /// `</name>`: validate, then close the latest open entry with that name
    fn close_named(&mut self, token: &RawTagToken<'_>, position: usize) -> bool {
        if !self
            .policy
            .capabilities()
            .contains(PolicyCapabilities::VALIDATE_CLOSE)
        {
            return false;
        }

        if !self.policy.validate_close(&identity_of(token)) {
            return false;
        }

        // Linear scan: open tags per text are few
        let target = self
            .entries
            .iter_mut()
            .rev()
            .find(|e| e.span.is_open() && e.identity.name() == token.name);

        match target {
            Some(entry) => {
                entry.span.close_at(position);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for TagMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagMatcher")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .field("policy", &self.policy.name())
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Identity carried by a token
fn identity_of(token: &RawTagToken<'_>) -> TagIdentity {
    TagIdentity::new(
        token.name,
        token.prefix,
        decode_parameters(token.parameter_text),
    )
}
