//! Colours, thread swatches and fabrics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An opaque sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                // #RGB -> #RRGGBB
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Scale every channel towards black by `factor` (0.0 = black, 1.0 = unchanged)
    pub fn darken(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * f).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Mix every channel towards white by `amount` (0.0 = unchanged, 1.0 = white)
    pub fn lighten(self, amount: f32) -> Self {
        let a = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * a).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b))
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Named thread colours offered by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Thread {
    White,
    Gold,
    Red,
    Burgundy,
    DarkGreen,
    Black,
    DarkBlue,
    Brown,
}

impl Thread {
    pub fn all() -> &'static [Thread] {
        &[
            Self::White,
            Self::Gold,
            Self::Red,
            Self::Burgundy,
            Self::DarkGreen,
            Self::Black,
            Self::DarkBlue,
            Self::Brown,
        ]
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Self::White => Rgb::new(0xf7, 0xf5, 0xef),
            Self::Gold => Rgb::new(0xc9, 0xa2, 0x27),
            Self::Red => Rgb::new(0xb2, 0x22, 0x22),
            Self::Burgundy => Rgb::new(0x80, 0x00, 0x20),
            Self::DarkGreen => Rgb::new(0x1e, 0x4d, 0x2b),
            Self::Black => Rgb::new(0x1a, 0x1a, 0x1a),
            Self::DarkBlue => Rgb::new(0x1b, 0x2a, 0x4a),
            Self::Brown => Rgb::new(0x5c, 0x3a, 0x21),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Gold => "gold",
            Self::Red => "red",
            Self::Burgundy => "burgundy",
            Self::DarkGreen => "dark-green",
            Self::Black => "black",
            Self::DarkBlue => "dark-blue",
            Self::Brown => "brown",
        }
    }

    /// Label shown by the Ukrainian-language front end
    pub fn label_uk(self) -> &'static str {
        match self {
            Self::White => "Білий",
            Self::Gold => "Золотий",
            Self::Red => "Червоний",
            Self::Burgundy => "Бордовий",
            Self::DarkGreen => "Темно зелений",
            Self::Black => "Чорний",
            Self::DarkBlue => "Темно синій",
            Self::Brown => "Коричневий",
        }
    }
}

impl FromStr for Thread {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_name(s);
        Self::all()
            .iter()
            .copied()
            .find(|t| key == t.name() || key == normalize_name(t.label_uk()))
            .ok_or_else(|| CoreError::UnknownColor(s.to_string()))
    }
}

/// Thread colour: a named swatch or an arbitrary colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ThreadColor {
    Named(Thread),
    Custom(Rgb),
}

impl ThreadColor {
    pub fn rgb(self) -> Rgb {
        match self {
            Self::Named(thread) => thread.rgb(),
            Self::Custom(rgb) => rgb,
        }
    }
}

impl Default for ThreadColor {
    fn default() -> Self {
        Self::Named(Thread::White)
    }
}

impl FromStr for ThreadColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(rgb) = Rgb::from_hex(s) {
            return Ok(Self::Custom(rgb));
        }
        s.parse().map(Self::Named)
    }
}

impl TryFrom<String> for ThreadColor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ThreadColor> for String {
    fn from(value: ThreadColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ThreadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(thread) => f.write_str(thread.name()),
            Self::Custom(rgb) => write!(f, "{}", rgb),
        }
    }
}

/// Fabric colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fabric {
    WhiteLinen,
    NaturalLinen,
}

impl Fabric {
    pub fn all() -> &'static [Fabric] {
        &[Self::WhiteLinen, Self::NaturalLinen]
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Self::WhiteLinen => Rgb::new(0xf2, 0xef, 0xe6),
            Self::NaturalLinen => Rgb::new(0xc8, 0xb9, 0x9a),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::WhiteLinen => "white-linen",
            Self::NaturalLinen => "natural-linen",
        }
    }

    pub fn label_uk(self) -> &'static str {
        match self {
            Self::WhiteLinen => "Білий льон",
            Self::NaturalLinen => "Натуральний льон",
        }
    }
}

impl FromStr for Fabric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_name(s);
        Self::all()
            .iter()
            .copied()
            .find(|f| key == f.name() || key == normalize_name(f.label_uk()))
            .ok_or_else(|| CoreError::UnknownFabric(s.to_string()))
    }
}

/// Lower-case, trim, and join words with hyphens
fn normalize_name(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#102030"), Some(Rgb::new(0x10, 0x20, 0x30)));
        assert_eq!(Rgb::from_hex("102030"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert_eq!(Rgb::from_hex("#+f+f+f"), None);
    }

    #[test]
    fn test_from_hex_rejects_multibyte_input() {
        assert_eq!(Rgb::from_hex("#aж"), None);
        assert_eq!(Rgb::from_hex("#жa"), None);
        assert_eq!(Rgb::from_hex("#ab€d"), None);
        assert!("#aж".parse::<ThreadColor>().is_err());
    }

    #[test]
    fn test_darken_and_lighten() {
        let c = Rgb::new(100, 200, 50);
        assert_eq!(c.darken(0.5), Rgb::new(50, 100, 25));
        assert_eq!(c.lighten(1.0), Rgb::WHITE);
        assert_eq!(c.lighten(0.0), c);
    }

    #[test]
    fn test_thread_names() {
        assert_eq!("gold".parse::<Thread>().unwrap(), Thread::Gold);
        assert_eq!("Dark Green".parse::<Thread>().unwrap(), Thread::DarkGreen);
        assert_eq!("dark_blue".parse::<Thread>().unwrap(), Thread::DarkBlue);
        assert_eq!("Темно синій".parse::<Thread>().unwrap(), Thread::DarkBlue);
        assert_eq!("бордовий".parse::<Thread>().unwrap(), Thread::Burgundy);
        assert!("purple".parse::<Thread>().is_err());
    }

    #[test]
    fn test_thread_color_parse() {
        assert_eq!(
            "#abc".parse::<ThreadColor>().unwrap(),
            ThreadColor::Custom(Rgb::new(0xaa, 0xbb, 0xcc))
        );
        assert_eq!(
            "red".parse::<ThreadColor>().unwrap(),
            ThreadColor::Named(Thread::Red)
        );
        assert!(matches!(
            "mauve".parse::<ThreadColor>(),
            Err(CoreError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_fabric_names() {
        assert_eq!("Білий льон".parse::<Fabric>().unwrap(), Fabric::WhiteLinen);
        assert_eq!("natural linen".parse::<Fabric>().unwrap(), Fabric::NaturalLinen);
        assert!("silk".parse::<Fabric>().is_err());
    }

    #[test]
    fn test_thread_color_serde() {
        let json = serde_json::to_string(&ThreadColor::Named(Thread::DarkGreen)).unwrap();
        assert_eq!(json, "\"dark-green\"");
        let back: ThreadColor = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(back, ThreadColor::Custom(Rgb::BLACK));
    }
}
