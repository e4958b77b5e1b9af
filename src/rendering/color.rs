//! Deterministic per-region fill colors.

use crate::{constants::COLOR_SPREAD, MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RegionColor {
    pub const BLACK: RegionColor = RegionColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, every channel zero-padded to two digits
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses `#rrggbb` or the short `#rgb` form
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || MapError::Config(format!("invalid color {:?}", hex));
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                Ok(Self::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                    channel(4).map_err(|_| invalid())?,
                ))
            }
            3 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                Ok(Self::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(1).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                ))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_rgba(&self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }

    /// Opaque paint for the vector canvas
    pub fn to_paint(&self) -> peniko::Color {
        peniko::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl fmt::Display for RegionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Color for a region name.
///
/// The code points are summed and spread by a fixed multiplier; each channel
/// then takes `acc % 240 + 16` before the accumulator drops a byte. Channels
/// therefore stay in `16..=255`, away from the black outlines.
pub fn color_of(name: &str) -> RegionColor {
    let sum = name.chars().fold(0u64, |acc, c| acc.wrapping_add(c as u64));
    let mut acc = sum.wrapping_mul(COLOR_SPREAD);

    let mut next_channel = || {
        let channel = (acc % 240 + 16) as u8;
        acc /= 256;
        channel
    };

    let r = next_channel();
    let g = next_channel();
    let b = next_channel();
    RegionColor::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_deterministic() {
        assert_eq!(color_of("France"), color_of("France"));
        assert_eq!(color_of("France").to_hex(), "#22d3e4");
        assert_eq!(color_of("Germany").to_hex(), "#fabf86");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(color_of(""), RegionColor::new(16, 16, 16));
        assert_eq!(color_of("").to_hex(), "#101010");
    }

    #[test]
    fn test_anagrams_share_a_color() {
        // Only the code point sum matters.
        assert_eq!(color_of("Niger"), color_of("Reign"));
    }

    #[test]
    fn test_channels_stay_away_from_black() {
        for name in ["Chad", "Peru", "Mali", "Côte d'Ivoire", "日本", "a", "Z"] {
            let color = color_of(name);
            assert!(color.r >= 16 && color.g >= 16 && color.b >= 16, "{}", name);
        }
    }

    #[test]
    fn test_hex_is_zero_padded() {
        // The legacy formatter wrote single digits for small channels ("#5a0f");
        // every channel is padded to two digits here on purpose.
        assert_eq!(RegionColor::new(5, 160, 15).to_hex(), "#05a00f");
        assert_eq!(RegionColor::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(
            RegionColor::from_hex("#55a9ed").unwrap(),
            RegionColor::new(0x55, 0xa9, 0xed)
        );
        assert_eq!(
            RegionColor::from_hex("#fff").unwrap(),
            RegionColor::new(255, 255, 255)
        );
        assert!(RegionColor::from_hex("55a9ed").is_err());
        assert!(RegionColor::from_hex("#55a9e").is_err());
        assert!(RegionColor::from_hex("#zzzzzz").is_err());
        assert!(RegionColor::from_hex("#éé").is_err());
    }
}
