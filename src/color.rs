//! Hex, RGB and HSL color conversions used by SVG theming.

use std::fmt;
use std::str::FromStr;

use palette::{Hsl as PaletteHsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ============================================================================
// HexColor
// ============================================================================

/// A validated `#rrggbb` color.
///
/// Parsing accepts upper or lower case digits; the value is always printed
/// back in lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a color, naming `field` in the error.
    pub fn parse_field(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        hex_to_rgb(value)
            .map(|(r, g, b)| Self::new(r, g, b))
            .ok_or_else(|| ValidationError::InvalidColor {
                field,
                value: value.to_string(),
            })
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("color", s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Hue in whole degrees, saturation and lightness in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// Parses `#rrggbb` into its channels. Anything else yields `None`.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Converts 8-bit RGB into rounded HSL.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let rgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let hsl: PaletteHsl = rgb.into_color();

    // Achromatic colors carry no hue.
    let (h, s) = if r == g && g == b {
        (0, 0)
    } else {
        (
            hsl.hue.into_positive_degrees().round() as u16,
            (hsl.saturation * 100.0).round() as u8,
        )
    };

    Hsl {
        h,
        s,
        l: (hsl.lightness * 100.0).round() as u8,
    }
}
