//! Position units for clean-text coordinates
//!
//! The scanner works on byte offsets so it can slice `&str` without copying,
//! but positions handed to consumers are measured in whatever unit the host
//! renderer counts characters in. Most text engines index UTF-16 code units.

/// Unit in which tag positions in clean text are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionEncoding {
    /// UTF-16 code units
    #[default]
    Utf16,
    /// Unicode scalar values
    Chars,
    /// UTF-8 bytes
    Bytes,
}

impl PositionEncoding {
    /// Length of `text` in this unit
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagspan_core::utils::PositionEncoding;
    ///
    /// assert_eq!(PositionEncoding::Utf16.measure("a😀"), 3);
    /// assert_eq!(PositionEncoding::Chars.measure("a😀"), 2);
    /// assert_eq!(PositionEncoding::Bytes.measure("a😀"), 5);
    /// ```
    #[must_use]
    pub fn measure(self, text: &str) -> usize {
        match self {
            Self::Utf16 => text.encode_utf16().count(),
            Self::Chars => text.chars().count(),
            Self::Bytes => text.len(),
        }
    }
}
