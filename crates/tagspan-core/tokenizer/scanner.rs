//! Tag scanning for raw markup text
//!
//! Finds one well-formed `<...>` tag at a time. Anything that fails the
//! well-formedness rules is skipped and stays literal text; scanning resumes
//! right after the rejected `<`.

use super::tokens::{RawTagToken, TagKind};

/// Find the next well-formed tag at or after byte offset `from`
///
/// Returns `None` when no valid tag exists in the remainder of `text`; the
/// caller treats that remainder as literal content. `from` must lie on a
/// char boundary, otherwise `None` is returned.
///
/// # Example
///
/// ```rust
/// use tagspan_core::tokenizer::scan_next;
///
/// // `<<` is not a tag, the second `<` starts one
/// let token = scan_next("a <<b> c", 0).unwrap();
/// assert_eq!(token.name, "b");
/// assert_eq!(token.start, 3);
///
/// assert!(scan_next("no tags here", 0).is_none());
/// ```
#[must_use]
pub fn scan_next(text: &str, from: usize) -> Option<RawTagToken<'_>> {
    let bytes = text.as_bytes();
    let mut search = from;

    while search < bytes.len() {
        let start = search + text.get(search..)?.find('<')?;

        // First delimiter after the opening bracket decides the fate of this `<`.
        // No `>` at all means no later `<` can form a tag either.
        let delim = start + 1 + text[start + 1..].find(|c: char| c == '<' || c == '>')?;

        if bytes[delim] == b'<' {
            search = delim;
            continue;
        }

        if let Some(token) = validate_tag(text, start, delim) {
            return Some(token);
        }
        search = start + 1;
    }

    None
}

/// Validate the candidate `text[start..=close]` and split it into parts
fn validate_tag(text: &str, start: usize, close: usize) -> Option<RawTagToken<'_>> {
    let inner = &text[start + 1..close];

    let (kind, body) = inner
        .strip_prefix('/')
        .map_or((TagKind::Open, inner), |rest| (TagKind::Close, rest));

    let (prefix, body) = match body.chars().next() {
        Some(ch) if !ch.is_alphabetic() => (Some(ch), &body[ch.len_utf8()..]),
        _ => (None, body),
    };

    let name_len = body
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(body.len());
    let (name, parameter_text) = body.split_at(name_len);

    if kind == TagKind::Open && name.is_empty() {
        return None;
    }

    Some(RawTagToken {
        start,
        end: close,
        kind,
        prefix,
        name,
        parameter_text,
        span: &text[start..=close],
    })
}

/// Iterator over every well-formed tag in a text, left to right
///
/// # Example
///
/// ```rust
/// use tagspan_core::tokenizer::TagScanner;
///
/// let names: Vec<_> = TagScanner::new("<wave>hi</wave> <3").map(|t| t.name).collect();
/// assert_eq!(names, ["wave", "wave"]);
/// ```
#[derive(Debug, Clone)]
pub struct TagScanner<'a> {
    /// Source text being scanned
    source: &'a str,
    /// Byte offset where the next search starts
    position: usize,
}

impl<'a> TagScanner<'a> {
    /// Create scanner starting at the beginning of `source`
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Create scanner starting at byte offset `position`
    #[must_use]
    pub const fn starting_at(source: &'a str, position: usize) -> Self {
        Self { source, position }
    }

    /// Byte offset where the next search starts
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = RawTagToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = scan_next(self.source, self.position);
        self.position = token.map_or(self.source.len(), |t| t.end + 1);
        token
    }
}
