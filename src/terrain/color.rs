//! Face colors.
//!
//! Colors arrive from configuration as CSS-style strings (`#rgb`, `#rrggbb`
//! or a handful of named colors) and are stored as sRGB floats, exactly what
//! ends up in the vertex buffer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TerrainError;

/// RGB color with components in 0..=1.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("navy", 0x000080),
    ("teal", 0x008080),
    ("aqua", 0x00ffff),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("forestgreen", 0x228b22),
    ("seagreen", 0x2e8b57),
    ("sienna", 0xa0522d),
    ("tan", 0xd2b48c),
    ("sandybrown", 0xf4a460),
    ("steelblue", 0x4682b4),
    ("dodgerblue", 0x1e90ff),
    ("royalblue", 0x4169e1),
    ("darkslateblue", 0x483d8b),
];

impl Color {
    pub const WHITE: Color = Color::from_hex(0xffffff);

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl FromStr for Color {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || TerrainError::InvalidColor(s.to_string());

        if let Some(digits) = trimmed.strip_prefix('#') {
            if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let hex = match digits.len() {
                // #rgb expands each nibble
                3 => {
                    let short = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                    let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                    ((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)
                }
                6 => u32::from_str_radix(digits, 16).map_err(|_| invalid())?,
                _ => return Err(invalid()),
            };
            return Ok(Color::from_hex(hex));
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, hex)| Color::from_hex(hex))
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for Color {
    type Error = TerrainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let c: Color = "#ff8000".parse().unwrap();
        assert_eq!(c.to_hex(), 0xff8000);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_parse_short_hex() {
        let c: Color = "#FFF".parse().unwrap();
        assert_eq!(c, Color::WHITE);
        let c: Color = "#1a2".parse().unwrap();
        assert_eq!(c.to_hex(), 0x11aa22);
    }

    #[test]
    fn test_parse_named() {
        let c: Color = " SteelBlue ".parse().unwrap();
        assert_eq!(c.to_hex(), 0x4682b4);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("not-a-color".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let c = Color::from_hex(0x6b8e23);
        assert_eq!(c.to_string(), "#6b8e23");
    }
}
