//! Colors and stroke/fill styling for elements.

use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sentinel used in persisted state for "no background".
pub const TRANSPARENT: &str = "transparent";

/// Serializable color representation (RGBA8).
///
/// Persisted as a `#rrggbb` hex string, or `#rrggbbaa` when not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Same color with its alpha scaled by `opacity` (0.0..=1.0).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Error returned when a color string is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color literal: {0}")]
pub struct ParseColorError(pub String);

impl FromStr for SerializableColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| err())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Background fill, persisted as a color string or the `"transparent"` sentinel.
mod background {
    use super::{SerializableColor, TRANSPARENT};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<SerializableColor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(color) => serializer.serialize_str(&color.to_hex()),
            None => serializer.serialize_str(TRANSPARENT),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SerializableColor>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == TRANSPARENT {
            return Ok(None);
        }
        s.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// Style properties shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    pub stroke_color: SerializableColor,
    /// Fill color (None = transparent).
    #[serde(with = "background")]
    pub background_color: Option<SerializableColor>,
    pub stroke_width: f64,
    /// Magnitude of the hand-drawn jitter (0 = clean lines).
    pub roughness: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
    /// Seed for the hand-drawn effect, stable across redraws and transforms.
    pub seed: u32,
}

impl ElementStyle {
    /// Stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        self.stroke_color.with_opacity(self.opacity).into()
    }

    /// Fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.background_color
            .map(|c| c.with_opacity(self.opacity).into())
    }

    /// Copy of this style with a freshly generated seed.
    pub fn reseeded(&self) -> Self {
        Self {
            seed: generate_seed(),
            ..self.clone()
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            background_color: None,
            stroke_width: 2.0,
            roughness: 1.0,
            opacity: 1.0,
            seed: generate_seed(),
        }
    }
}

/// Partial style update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub stroke_color: Option<SerializableColor>,
    /// `Some(None)` clears the background to transparent.
    pub background_color: Option<Option<SerializableColor>>,
    pub stroke_width: Option<f64>,
    pub roughness: Option<f64>,
    pub opacity: Option<f64>,
}

impl StylePatch {
    pub fn stroke_color(mut self, color: SerializableColor) -> Self {
        self.stroke_color = Some(color);
        self
    }

    pub fn background_color(mut self, color: Option<SerializableColor>) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn roughness(mut self, roughness: f64) -> Self {
        self.roughness = Some(roughness);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, style: &mut ElementStyle) {
        if let Some(color) = self.stroke_color {
            style.stroke_color = color;
        }
        if let Some(background) = self.background_color {
            style.background_color = background;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(roughness) = self.roughness {
            style.roughness = roughness.max(0.0);
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

/// Generate a seed for a new element.
///
/// Counter + splitmix-style hash, so seeds are well spread without a clock or RNG.
pub fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(
            "#ff8000".parse::<SerializableColor>().unwrap(),
            SerializableColor::rgb(255, 128, 0)
        );
        assert_eq!(
            "#fff".parse::<SerializableColor>().unwrap(),
            SerializableColor::white()
        );
        assert_eq!(
            "#00000080".parse::<SerializableColor>().unwrap(),
            SerializableColor::new(0, 0, 0, 128)
        );
        assert!("red".parse::<SerializableColor>().is_err());
        assert!("#12345".parse::<SerializableColor>().is_err());
    }

    #[test]
    fn test_background_transparent_sentinel() {
        let style = ElementStyle::default();
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["backgroundColor"], "transparent");
        assert_eq!(json["strokeColor"], "#000000");

        let parsed: ElementStyle = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.background_color, None);
    }

    #[test]
    fn test_style_patch_clamps() {
        let mut style = ElementStyle::default();
        StylePatch::default()
            .opacity(3.0)
            .stroke_width(-1.0)
            .background_color(Some(SerializableColor::white()))
            .apply(&mut style);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.stroke_width, 0.0);
        assert_eq!(style.background_color, Some(SerializableColor::white()));
    }

    #[test]
    fn test_opacity_applied_to_colors() {
        let style = ElementStyle {
            opacity: 0.5,
            ..ElementStyle::default()
        };
        assert_eq!(style.stroke_with_opacity().to_rgba8().a, 128);
        assert!(style.fill_with_opacity().is_none());
    }

    #[test]
    fn test_generated_seeds_differ() {
        let a = generate_seed();
        let b = generate_seed();
        assert_ne!(a, b);
    }
}
