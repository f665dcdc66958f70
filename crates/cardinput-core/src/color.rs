use std::fmt;
use std::str::FromStr;

use crate::CardInputError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);
    pub const RED: Color = Color(255, 0, 0, 255);
    pub const GREEN: Color = Color(0, 128, 0, 255);
    pub const BLUE: Color = Color(0, 0, 255, 255);
    pub const GRAY: Color = Color(128, 128, 128, 255);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }

    /// Lenient hex parsing: malformed digits read as zero.
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).unwrap_or(0);
        match s.len() {
            6 if s.is_ascii() => Color(byte(0), byte(2), byte(4), 255),
            8 if s.is_ascii() => Color(byte(0), byte(2), byte(4), byte(6)),
            _ => {
                log::warn!("from_hex: unsupported color `{hex}`, using black");
                Color::BLACK
            }
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }

    /// Parses a color token; an empty token means "not configured".
    pub fn parse_optional(token: &str) -> Result<Option<Color>, CardInputError> {
        if token.trim().is_empty() {
            Ok(None)
        } else {
            token.parse().map(Some)
        }
    }

    fn named(name: &str) -> Option<Color> {
        Some(match name {
            "transparent" => Color::TRANSPARENT,
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "gray" | "grey" => Color::GRAY,
            _ => return None,
        })
    }
}

impl FromStr for Color {
    type Err = CardInputError;

    /// Accepts `#rrggbb`, `#rrggbbaa`, `#rgb` and a few CSS color names.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let t = token.trim();
        if let Some(c) = Color::named(&t.to_ascii_lowercase()) {
            return Ok(c);
        }
        let Some(hex) = t.strip_prefix('#') else {
            return Err(CardInputError::InvalidColor(token.to_string()));
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CardInputError::InvalidColor(token.to_string()));
        }
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    let v = u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
                    v * 17
                };
                Ok(Color(nib(0), nib(1), nib(2), 255))
            }
            6 | 8 => Ok(Color::from_hex(hex)),
            _ => Err(CardInputError::InvalidColor(token.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.3 == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.0, self.1, self.2, self.3)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = CardInputError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Serde adapter for `Option<Color>` fields that accept `""` or `null` as
/// "not configured".
#[cfg(feature = "serde")]
pub mod optional_token {
    use super::Color;

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Color>, D::Error> {
        let token = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
        match token {
            Some(t) => Color::parse_optional(&t).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
