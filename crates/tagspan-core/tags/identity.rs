//! Tag identity: name, prefix and decoded parameters

use super::values::FromParam;
use crate::{utils::CoreError, Result};
use core::fmt;
use std::collections::{btree_map, BTreeMap};

/// Key under which the unnamed value of `<name=value>` is stored
pub const UNNAMED_PARAMETER: &str = "";

/// Decoded tag parameters
///
/// Insertion order is irrelevant; two parameter sets are equal when they
/// hold the same key/value pairs. Keys are kept sorted so iteration and
/// rendering are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TagParameters(BTreeMap<String, String>);

impl TagParameters {
    /// Create an empty parameter set
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert unless `key` is already present (first occurrence wins)
    ///
    /// Returns `true` if the value was stored.
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        match self.0.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Raw value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Raw unnamed value (`<wave=2>` → `"2"`)
    #[must_use]
    pub fn unnamed(&self) -> Option<&str> {
        self.get(UNNAMED_PARAMETER)
    }

    /// Check whether `key` is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Value for `key` converted to `T`
    ///
    /// Returns `None` when the key is absent, `Some(Err(_))` when it is
    /// present but does not convert.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagspan_core::tags::TagParameters;
    ///
    /// let params: TagParameters = [("amp", "2.5")].into_iter().collect();
    /// assert_eq!(params.parsed::<f32>("amp"), Some(Ok(2.5)));
    /// assert!(params.parsed::<f32>("freq").is_none());
    /// ```
    #[must_use]
    pub fn parsed<T: FromParam>(&self, key: &str) -> Option<Result<T>> {
        self.get(key).map(T::from_param)
    }

    /// Value for `key` converted to `T`, failing if it is absent
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingParameter` if `key` is absent, or the
    /// conversion error if the value does not convert.
    pub fn require<T: FromParam>(&self, key: &str) -> Result<T> {
        self.parsed(key)
            .unwrap_or_else(|| Err(CoreError::MissingParameter(key.to_string())))
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate key/value pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert_first(key, value);
        }
        params
    }
}

/// Immutable identity of a resolved tag
///
/// Two identities are equal iff name, prefix and parameters all match.
///
/// # Example
///
/// ```rust
/// use tagspan_core::tags::{TagIdentity, TagParameters};
///
/// let params: TagParameters = [("", "1")].into_iter().collect();
/// let wait = TagIdentity::new("wait", Some('!'), params);
/// assert_eq!(wait.to_string(), "<!wait=1>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagIdentity {
    /// Tag name (`wave`, `wait`, ...)
    name: String,
    /// Category prefix, `None` for unprefixed tags
    prefix: Option<char>,
    /// Decoded parameters
    parameters: TagParameters,
}

impl TagIdentity {
    /// Create identity from its parts
    pub fn new(name: impl Into<String>, prefix: Option<char>, parameters: TagParameters) -> Self {
        Self {
            name: name.into(),
            prefix,
            parameters,
        }
    }

    /// Create identity without parameters
    pub fn bare(name: impl Into<String>, prefix: Option<char>) -> Self {
        Self::new(name, prefix, TagParameters::new())
    }

    /// Tag name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category prefix
    #[must_use]
    pub const fn prefix(&self) -> Option<char> {
        self.prefix
    }

    /// Decoded parameters
    #[must_use]
    pub const fn parameters(&self) -> &TagParameters {
        &self.parameters
    }
}

/// Render the identity back into open-tag markup
impl fmt::Display for TagIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        if let Some(prefix) = self.prefix {
            write!(f, "{prefix}")?;
        }
        f.write_str(&self.name)?;
        if let Some(value) = self.parameters.unnamed() {
            f.write_str("=")?;
            write_value(f, value)?;
        }
        for (key, value) in self.parameters.iter() {
            if key == UNNAMED_PARAMETER {
                continue;
            }
            write!(f, " {key}")?;
            if !value.is_empty() {
                f.write_str("=")?;
                write_value(f, value)?;
            }
        }
        f.write_str(">")
    }
}

/// Write a parameter value, quoting it when it would not survive re-parsing
fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        write!(f, "\"{value}\"")
    } else {
        f.write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_insert_wins() {
        let mut params = TagParameters::new();
        assert!(params.insert_first("amp", "1"));
        assert!(!params.insert_first("amp", "2"));
        assert_eq!(params.get("amp"), Some("1"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: TagParameters = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: TagParameters = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(
            TagIdentity::new("wave", None, a),
            TagIdentity::new("wave", None, b)
        );
    }

    #[test]
    fn identity_differs_by_prefix() {
        assert_ne!(
            TagIdentity::bare("shake", None),
            TagIdentity::bare("shake", Some('#'))
        );
    }

    #[test]
    fn require_reports_missing_parameter() {
        let params = TagParameters::new();
        assert_eq!(
            params.require::<f32>("amp"),
            Err(CoreError::MissingParameter("amp".to_string()))
        );
    }

    #[test]
    fn display_renders_markup() {
        let params: TagParameters = [("", "0.2")].into_iter().collect();
        assert_eq!(
            TagIdentity::new("delay", Some('!'), params).to_string(),
            "<!delay=0.2>"
        );

        let params: TagParameters = [("amp", "2"), ("loop", ""), ("label", "a b")]
            .into_iter()
            .collect();
        assert_eq!(
            TagIdentity::new("wave", None, params).to_string(),
            "<wave amp=2 label=\"a b\" loop>"
        );
    }
}
