//! Category identifiers

use core::fmt;

/// Handle of a registered markup category
///
/// Ids are dense and assigned in registration order, so they double as
/// indices into per-category tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryId(usize);

impl CategoryId {
    /// Id for the category registered at `index`
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Registration index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "category#{}", self.0)
    }
}
