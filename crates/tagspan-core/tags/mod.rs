//! Resolved tag data model
//!
//! - [`TagIdentity`]: what a tag is (name, prefix, parameters)
//! - [`TagSpan`]: where it applies, plus its tie-break rank
//! - [`TagEntry`]: the pair stored by matchers and registries
//! - [`CategoryId`]: handle of a registered markup category
//! - [`values`]: typed conversion of parameter strings

pub mod category;
pub mod identity;
pub mod span;
pub mod values;

pub use category::CategoryId;
pub use identity::{TagIdentity, TagParameters, UNNAMED_PARAMETER};
pub use span::{SpanKey, TagEntry, TagSpan};
pub use values::{Color, FromParam, Vec2};
