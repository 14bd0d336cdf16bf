use crate::error::FieldError;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with straight (non-premultiplied) alpha in 0.0-1.0.
///
/// Serialized as a CSS color string so config files stay readable:
/// `rgba(56, 189, 248, 0.5)`, `rgb(56, 189, 248)` or `#38bdf8`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha (clamped to 0.0-1.0)
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Composite over a black background, boosting alpha by `gain` first.
    /// Terminal cells cannot blend, so the result is the final cell color.
    pub fn over_black(self, gain: f32) -> Color {
        let a = (self.a * gain).clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * a).round() as u8;
        Color::Rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgba {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Rgba {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldError::Color(s.to_string());
        let trimmed = s.trim().to_ascii_lowercase();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, 1.0));
        }

        let (body, expect_alpha) = if let Some(rest) = trimmed.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = trimmed.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();

        let expected_len = if expect_alpha { 4 } else { 3 };
        if parts.len() != expected_len {
            return Err(invalid());
        }

        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        let a = if expect_alpha {
            let a: f32 = parts[3].parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(invalid());
            }
            a
        } else {
            1.0
        };

        Ok(Rgba::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, a))
    }
}

/// Built-in color schemes (particle fill + connection line)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Sky,
    Ember,
    Mint,
    Mono,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Sky => "Sky",
            ColorScheme::Ember => "Ember",
            ColorScheme::Mint => "Mint",
            ColorScheme::Mono => "Mono",
        }
    }

    fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ColorScheme::Sky => (56, 189, 248),
            ColorScheme::Ember => (251, 146, 60),
            ColorScheme::Mint => (52, 211, 153),
            ColorScheme::Mono => (226, 232, 240),
        }
    }

    pub fn base_color(&self) -> Rgba {
        let (r, g, b) = self.rgb();
        Rgba::new(r, g, b, 0.5)
    }

    pub fn line_color(&self) -> Rgba {
        let (r, g, b) = self.rgb();
        Rgba::new(r, g, b, 0.15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        let c: Rgba = "rgba(56, 189, 248, 0.5)".parse().unwrap();
        assert_eq!(c, Rgba::new(56, 189, 248, 0.5));
    }

    #[test]
    fn test_parse_rgb_and_hex() {
        let c: Rgba = "rgb(1,2,3)".parse().unwrap();
        assert_eq!(c, Rgba::new(1, 2, 3, 1.0));

        let c: Rgba = "#38BDF8".parse().unwrap();
        assert_eq!(c, Rgba::new(56, 189, 248, 1.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("sky blue".parse::<Rgba>().is_err());
        assert!("rgba(1, 2, 3)".parse::<Rgba>().is_err());
        assert!("rgba(1, 2, 3, 1.5)".parse::<Rgba>().is_err());
        assert!("rgb(300, 0, 0)".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!(matches!("#a\u{20ac}bc".parse::<Rgba>(), Err(FieldError::Color(_))));
    }

    #[test]
    fn test_serde_uses_css_string() {
        let json = serde_json::to_string(&Rgba::new(56, 189, 248, 0.15)).unwrap();
        assert_eq!(json, "\"rgba(56, 189, 248, 0.15)\"");

        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(56, 189, 248, 0.15));
    }

    #[test]
    fn test_over_black() {
        assert_eq!(Rgba::new(200, 100, 50, 0.5).over_black(1.0), Color::Rgb(100, 50, 25));
        assert_eq!(Rgba::new(200, 100, 50, 0.5).over_black(4.0), Color::Rgb(200, 100, 50));
        assert_eq!(Rgba::new(200, 100, 50, 0.0).over_black(2.0), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_scheme_colors() {
        assert_eq!(ColorScheme::default(), ColorScheme::Sky);
        assert_eq!(ColorScheme::Mono.line_color(), Rgba::new(226, 232, 240, 0.15));
        assert_eq!(ColorScheme::Sky.base_color(), Rgba::new(56, 189, 248, 0.5));
        assert_eq!(ColorScheme::Sky.line_color().a, 0.15);
    }
}
