//! Typed conversion of tag parameter values
//!
//! Tag parameters arrive as plain strings. Effects that need numbers, flags,
//! offsets or colors convert them through [`FromParam`], either directly or
//! via [`TagParameters::parsed`](super::TagParameters::parsed).
//!
//! # Supported Formats
//!
//! - `f32` / `i32`: plain decimal, surrounding whitespace ignored, must be finite
//! - `bool`: `true/false`, `1/0`, `yes/no`, `on/off` (case-insensitive)
//! - [`Vec2`]: `x,y` or `(x,y)`
//! - [`Color`]: `#RGB`, `#RRGGBB`, `#RRGGBBAA` or a basic color name

use crate::{
    utils::errors::{invalid_bool, invalid_color, invalid_numeric, invalid_vector},
    Result,
};

/// Conversion from a raw parameter string
pub trait FromParam: Sized {
    /// Convert `value` into `Self`
    ///
    /// # Errors
    ///
    /// Returns a format-category `CoreError` describing why `value` is not
    /// acceptable.
    fn from_param(value: &str) -> Result<Self>;
}

impl FromParam for f32 {
    fn from_param(value: &str) -> Result<Self> {
        let parsed: Self = value.trim().parse()?;
        if parsed.is_finite() {
            Ok(parsed)
        } else {
            Err(invalid_numeric(value, "value must be finite"))
        }
    }
}

impl FromParam for i32 {
    fn from_param(value: &str) -> Result<Self> {
        Ok(value.trim().parse()?)
    }
}

impl FromParam for bool {
    fn from_param(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(invalid_bool(value)),
        }
    }
}

impl FromParam for String {
    fn from_param(value: &str) -> Result<Self> {
        Ok(value.to_string())
    }
}

/// Two-component vector parameter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Horizontal component
    pub x: f32,
    /// Vertical component
    pub y: f32,
}

impl FromParam for Vec2 {
    fn from_param(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let mut parts = inner.split(',');
        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid_vector(value, "expected exactly two components"));
        };

        Ok(Self {
            x: f32::from_param(x).map_err(|_| invalid_vector(value, "bad x component"))?,
            y: f32::from_param(y).map_err(|_| invalid_vector(value, "bad y component"))?,
        })
    }
}

/// RGBA color parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel, 255 is opaque
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB channels
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Look up a basic color name
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::rgb(0, 0, 0),
            "white" => Self::rgb(255, 255, 255),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "orange" => Self::rgb(255, 128, 0),
            "purple" => Self::rgb(160, 32, 240),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "clear" | "transparent" => Self {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
            _ => return None,
        };
        Some(color)
    }
}

impl FromParam for Color {
    fn from_param(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Self::named(trimmed).ok_or_else(|| invalid_color(value, "unknown color name"));
        };

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid_color(value, "non-hex digit"));
        }

        let channel = |range: core::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid_color(value, "bad channel"))
        };
        // #RGB expands each digit: f -> ff
        let short = |index: usize| channel(index..index + 1).map(|v| v * 17);

        match hex.len() {
            3 => Ok(Self::rgb(short(0)?, short(1)?, short(2)?)),
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => Err(invalid_color(value, "expected 3, 6 or 8 hex digits")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CoreError;
    use pretty_assertions::assert_eq;

    #[test]
    fn floats() {
        assert_eq!(f32::from_param(" 0.25 "), Ok(0.25));
        assert!(matches!(
            f32::from_param("fast"),
            Err(CoreError::InvalidNumeric(_))
        ));
        assert!(matches!(
            f32::from_param("inf"),
            Err(CoreError::InvalidNumeric(_))
        ));
    }

    #[test]
    fn integers() {
        assert_eq!(i32::from_param("-3"), Ok(-3));
        assert!(i32::from_param("3.5").is_err());
    }

    #[test]
    fn booleans() {
        assert_eq!(bool::from_param("TRUE"), Ok(true));
        assert_eq!(bool::from_param("off"), Ok(false));
        assert!(matches!(
            bool::from_param("maybe"),
            Err(CoreError::InvalidBool(_))
        ));
    }

    #[test]
    fn vectors() {
        assert_eq!(Vec2::from_param("(1, -2)"), Ok(Vec2 { x: 1.0, y: -2.0 }));
        assert_eq!(Vec2::from_param("0.5,4"), Ok(Vec2 { x: 0.5, y: 4.0 }));
        assert!(Vec2::from_param("1,2,3").is_err());
        assert!(Vec2::from_param("(a,b)").is_err());
        assert!(Vec2::from_param("1").is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_param("#ff8000"), Ok(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_param("#f00"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_param("#00000080"),
            Ok(Color {
                r: 0,
                g: 0,
                b: 0,
                a: 128
            })
        );
        assert!(Color::from_param("#12").is_err());
        assert!(Color::from_param("#gg0000").is_err());
    }

    #[test]
    fn named_colors() {
        assert_eq!(Color::from_param("Red"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_param("transparent").map(|c| c.a), Ok(0));
        assert!(matches!(
            Color::from_param("chartreuse-ish"),
            Err(CoreError::InvalidColor(_))
        ));
    }
}
