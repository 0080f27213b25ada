//! Parameter decoding for tag parameter text
//!
//! Turns the raw text after a tag name into a [`TagParameters`] map:
//!
//! - `=value` with no key (normally directly after the name, as in
//!   `<wait=1>`) is the unnamed value, stored under `""`
//! - `key=value` stores `value` under `key`
//! - a bare `key` stores an empty value
//! - values are either double-quoted (whitespace kept, quotes stripped) or
//!   run until the next whitespace
//! - when a key repeats, the first occurrence wins

use crate::tags::{TagParameters, UNNAMED_PARAMETER};

/// Decode raw parameter text into a key/value map
///
/// # Example
///
/// ```rust
/// use tagspan_core::tokenizer::decode_parameters;
///
/// let params = decode_parameters("=2 amp=0.5 label=\"two words\" loop amp=9");
/// assert_eq!(params.unnamed(), Some("2"));
/// assert_eq!(params.get("amp"), Some("0.5"));
/// assert_eq!(params.get("label"), Some("two words"));
/// assert_eq!(params.get("loop"), Some(""));
/// ```
#[must_use]
pub fn decode_parameters(text: &str) -> TagParameters {
    let mut params = TagParameters::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        // `rest` starts with a non-whitespace char, so each round consumes input
        let key_len = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let (key, after_key) = rest.split_at(key_len);

        let (value, remaining) = after_key
            .strip_prefix('=')
            .map_or(("", after_key), read_value);

        let key = if key.is_empty() { UNNAMED_PARAMETER } else { key };
        params.insert_first(key, value);

        rest = remaining.trim_start();
    }

    params
}

/// Split one value off the front of `text`, returning `(value, rest)`
fn read_value(text: &str) -> (&str, &str) {
    if let Some(quoted) = text.strip_prefix('"') {
        return quoted
            .find('"')
            .map_or((quoted, ""), |end| (&quoted[..end], &quoted[end + 1..]));
    }

    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    text.split_at(end)
}
