use crate::errors::CharlistError;
use serde::{Deserialize, Serialize};

/// 32-bit ARGB colour of a tag
///
/// Persisted as the signed 32-bit reinterpretation of the ARGB word, so
/// opaque red is stored as `-65536`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const GRAY: Color = Color(0xFF80_8080);
    pub const RED: Color = Color(0xFFFF_0000);
    pub const GREEN: Color = Color(0xFF00_FF00);
    pub const BLUE: Color = Color(0xFF00_00FF);
    pub const YELLOW: Color = Color(0xFFFF_FF00);
    pub const ORANGE: Color = Color(0xFFFF_C800);

    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Opaque colour from its channels
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Column representation
    pub const fn to_signed(self) -> i32 {
        self.0 as i32
    }

    pub const fn from_signed(raw: i32) -> Self {
        Self(raw as u32)
    }

    /// Parse `#RRGGBB` (opaque) or `#AARRGGBB`; the leading `#` is optional.
    pub fn parse_hex(value: &str) -> Result<Self, CharlistError> {
        let invalid = || CharlistError::InvalidColor {
            value: value.to_string(),
        };
        let digits = value.strip_prefix('#').unwrap_or(value);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let raw = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Self(0xFF00_0000 | raw)),
            8 => Ok(Self(raw)),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
        } else {
            write!(f, "#{:08X}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_column_value_matches_argb_word() {
        assert_eq!(Color::RED.to_signed(), -65536);
        assert_eq!(Color::from_signed(-65536), Color::RED);
        assert_eq!(Color::from_signed(0), Color::default());
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse_hex("#FF0000").unwrap(), Color::RED);
        assert_eq!(Color::parse_hex("0000ff").unwrap(), Color::BLUE);
        assert_eq!(
            Color::parse_hex("#80FF0000").unwrap(),
            Color::from_argb(0x80FF_0000)
        );
        assert!(Color::parse_hex("#FFF").is_err());
        assert!(Color::parse_hex("#GG0000").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::from_rgb(0x12, 0x34, 0x56).to_string(), "#123456");
        assert_eq!(Color::from_argb(0x0012_3456).to_string(), "#00123456");
    }
}
