//! Entity colours.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color_utils::{hsv_to_rgb, rgb_to_hsv};

/// An opaque RGB colour attached to points, lines, angles and circles.
///
/// Serialized as a lowercase `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named colours accepted by [`Color::parse`] (SVG semantics).
const NAMED: &[(&str, Color)] = &[
    ("red", Color::RED),
    ("green", Color::rgb(0x00, 0x80, 0x00)),
    ("blue", Color::rgb(0x00, 0x00, 0xff)),
    ("cyan", Color::rgb(0x00, 0xff, 0xff)),
    ("yellow", Color::rgb(0xff, 0xff, 0x00)),
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xff, 0xff, 0xff)),
    ("gray", Color::rgb(0x80, 0x80, 0x80)),
    ("grey", Color::rgb(0x80, 0x80, 0x80)),
    ("magenta", Color::rgb(0xff, 0x00, 0xff)),
    ("orange", Color::rgb(0xff, 0xa5, 0x00)),
];

/// Factor used for highlight colours, in percent.
const LIGHTER_FACTOR: f64 = 150.0;

impl Color {
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a colour name (`"red"`, `"gray"`, ...) or a `#rgb` / `#rrggbb` hex string.
    pub fn parse(value: &str) -> Result<Self, ColorParseError> {
        let trimmed = value.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| ColorParseError(value.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| ColorParseError(value.to_string()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Highlight variant: HSV value scaled by 150%, with any overflow
    /// drained from the saturation.
    pub fn lighter(&self) -> Self {
        let (h, s, v) = rgb_to_hsv(
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        );

        let mut v = v * LIGHTER_FACTOR / 100.0;
        let mut s = s;
        if v > 1.0 {
            s = (s - (v - 1.0)).max(0.0);
            v = 1.0;
        }

        let (r, g, b) = hsv_to_rgb(h, s, v);
        let channel = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

/// A string that names no known colour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised colour '{0}'")]
pub struct ColorParseError(pub String);

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a colour name or #rrggbb string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Color::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ColorVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::parse("red").unwrap(), Color::RED);
        assert_eq!(Color::parse("Green").unwrap().to_hex(), "#008000");
        assert_eq!(Color::parse("gray").unwrap().to_hex(), "#808080");
        assert!(Color::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(Color::parse("#00ff7f").unwrap(), Color::rgb(0, 255, 127));
        assert_eq!(Color::parse("#0f0").unwrap(), Color::rgb(0, 255, 0));
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        assert_eq!(Color::rgb(0xAB, 0xCD, 0xEF).to_hex(), "#abcdef");
    }

    #[test]
    fn test_lighter_red_drains_saturation() {
        // v = 1.0 -> 1.5, overflow 0.5 is taken from saturation 1.0
        assert_eq!(Color::RED.lighter(), Color::rgb(255, 128, 128));
    }

    #[test]
    fn test_lighter_dark_green_raises_value() {
        // #008000: v = 0.502 -> 0.753, saturation untouched
        assert_eq!(Color::parse("green").unwrap().lighter(), Color::rgb(0, 192, 0));
    }

    #[test]
    fn test_lighter_black_stays_black() {
        let black = Color::rgb(0, 0, 0);
        assert_eq!(black.lighter(), black);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let parsed: Color = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(parsed, Color::rgb(0, 0, 255));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
