//! Fixed color schemes

use image::Rgb;
use serde::Serialize;

use crate::OverlayError;

/// Colors for one display state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    /// Emotion text, box stroke, and label
    pub accent: &'static str,
    /// Page background
    pub background: &'static str,
}

impl Palette {
    pub const ANGRY: Palette = Palette {
        name: "angry",
        accent: "#e74c3c",
        background: "#ffebee",
    };

    pub const CALM: Palette = Palette {
        name: "calm",
        accent: "#2ecc71",
        background: "#f5f5f5",
    };

    pub fn for_state(is_angry: bool) -> Palette {
        if is_angry {
            Self::ANGRY
        } else {
            Self::CALM
        }
    }

    pub fn accent_rgb(&self) -> Result<Rgb<u8>, OverlayError> {
        parse_hex(self.accent)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::CALM
    }
}

/// `#rrggbb` to RGB
pub(crate) fn parse_hex(color: &str) -> Result<Rgb<u8>, OverlayError> {
    let hex = color
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.is_ascii())
        .ok_or_else(|| OverlayError::Color(color.to_string()))?;

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| OverlayError::Color(color.to_string()))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_for_state() {
        assert_eq!(Palette::for_state(true), Palette::ANGRY);
        assert_eq!(Palette::for_state(false), Palette::CALM);
        assert_eq!(Palette::default().name, "calm");
    }

    #[test]
    fn test_accent_rgb() {
        assert_eq!(Palette::ANGRY.accent_rgb().unwrap(), Rgb([0xe7, 0x4c, 0x3c]));
        assert_eq!(Palette::CALM.accent_rgb().unwrap(), Rgb([0x2e, 0xcc, 0x71]));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("e74c3c").is_err());
        assert!(parse_hex("#e74c3").is_err());
        assert!(parse_hex("#zz4c3c").is_err());
    }
}
