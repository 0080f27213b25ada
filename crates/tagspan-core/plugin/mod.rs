//! Category policies: which tags a markup category accepts
//!
//! Every category of markup (effects, commands, events, ...) is governed by a
//! [`CategoryPolicy`]. The matcher asks the policy whether an open tag is
//! acceptable and how its span closes, and whether a named close tag is
//! acceptable. Policies never see positions; they only judge identities.
//!
//! ## Architecture
//!
//! - **CategoryPolicy**: trait implemented by tag databases
//! - **PolicyCapabilities**: which of the two validations a policy offers
//! - **SpanClosing**: how an accepted open tag's span ends
//! - **TagSet**: name-keyed built-in policy
//!
//! ## Example
//!
//! ```rust
//! use tagspan_core::plugin::{CategoryPolicy, SpanClosing};
//! use tagspan_core::tags::TagIdentity;
//!
//! struct Events;
//!
//! impl CategoryPolicy for Events {
//!     fn name(&self) -> &str { "events" }
//!
//!     fn validate_open(&self, _tag: &TagIdentity) -> Option<SpanClosing> {
//!         Some(SpanClosing::POINT)
//!     }
//!
//!     fn validate_close(&self, _tag: &TagIdentity) -> bool {
//!         false
//!     }
//! }
//!
//! assert!(Events.validate_open(&TagIdentity::bare("anything", Some('?'))).is_some());
//! ```

use crate::tags::TagIdentity;
use bitflags::bitflags;

pub mod tag_set;

pub use tag_set::{TagDefinition, TagSet};

bitflags! {
    /// Validations a policy is able to perform
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PolicyCapabilities: u8 {
        /// The policy judges open tags
        const VALIDATE_OPEN = 1;
        /// The policy judges named close tags
        const VALIDATE_CLOSE = 1 << 1;
    }
}

/// How the span of an accepted open tag ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpanClosing {
    /// Stays open until a matching close tag or the end of the text
    UntilClosed,
    /// Closed immediately, covering this many positions
    Fixed(usize),
}

impl SpanClosing {
    /// Point tag covering exactly the character it precedes
    pub const POINT: Self = Self::Fixed(1);

    /// End index forced for a span starting at `start`, if any
    #[must_use]
    pub const fn forced_end(self, start: usize) -> Option<usize> {
        match self {
            Self::UntilClosed => None,
            Self::Fixed(len) => Some(start + len),
        }
    }
}

/// Trait deciding which tags a category accepts
///
/// Implementors are consulted by the matcher for every token routed to
/// their category. Rejection is not an error: the tag text simply stays in
/// the output as literal text.
pub trait CategoryPolicy: Send + Sync {
    /// Category name, used for logging and registration
    fn name(&self) -> &str;

    /// Validations this policy offers
    ///
    /// A policy without `VALIDATE_OPEN` never accepts open tags; one without
    /// `VALIDATE_CLOSE` never accepts named close tags. The `</>` and
    /// `</all>` keywords bypass close validation.
    fn capabilities(&self) -> PolicyCapabilities {
        PolicyCapabilities::all()
    }

    /// Judge an open tag
    ///
    /// # Returns
    /// * `Some(closing)` - Tag accepted; `closing` decides how its span ends
    /// * `None` - Tag rejected
    fn validate_open(&self, tag: &TagIdentity) -> Option<SpanClosing>;

    /// Judge a named close tag
    fn validate_close(&self, tag: &TagIdentity) -> bool;
}

impl<P: CategoryPolicy + ?Sized> CategoryPolicy for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn capabilities(&self) -> PolicyCapabilities {
        (**self).capabilities()
    }

    fn validate_open(&self, tag: &TagIdentity) -> Option<SpanClosing> {
        (**self).validate_open(tag)
    }

    fn validate_close(&self, tag: &TagIdentity) -> bool {
        (**self).validate_close(tag)
    }
}

#[cfg(test)]
mod tests;
