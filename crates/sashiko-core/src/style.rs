//! Render style configuration
//!
//! [`RenderStyle`] is the fully-resolved set of visual choices for a single
//! pattern. It is built by the caller (front end, CLI or settings file) and
//! read by the renderer; nothing in the pipeline mutates it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Fabric, Rgb, Thread, ThreadColor};
use crate::error::{CoreError, Result};

/// Enumerated fabric textures that an asset registry may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextureKey {
    Linen,
    NaturalLinen,
    Hemp,
    Denim,
}

impl TextureKey {
    pub fn all() -> &'static [TextureKey] {
        &[Self::Linen, Self::NaturalLinen, Self::Hemp, Self::Denim]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linen => "linen",
            Self::NaturalLinen => "natural-linen",
            Self::Hemp => "hemp",
            Self::Denim => "denim",
        }
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == key)
            .ok_or_else(|| CoreError::UnknownTexture(s.to_string()))
    }
}

/// What the canvas is filled with before anything is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    /// Solid fabric colour
    Fabric(Fabric),
    /// Registered texture image, scaled to the canvas
    Texture(TextureKey),
    /// Solid arbitrary colour
    Plain(Rgb),
}

impl Default for Background {
    fn default() -> Self {
        Self::Fabric(Fabric::NaturalLinen)
    }
}

impl FromStr for Background {
    type Err = CoreError;

    /// Accepts a fabric name, `texture:<key>`, `plain` or a hex colour
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if let Some(key) = value.strip_prefix("texture:") {
            return key.parse().map(Self::Texture);
        }
        if let Some(rgb) = Rgb::from_hex(value) {
            return Ok(Self::Plain(rgb));
        }
        if value.eq_ignore_ascii_case("plain") {
            return Ok(Self::Plain(Rgb::WHITE));
        }
        value.parse().map(Self::Fabric)
    }
}

impl TryFrom<String> for Background {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Background> for String {
    fn from(value: Background) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fabric(fabric) => f.write_str(fabric.name()),
            Self::Texture(key) => write!(f, "texture:{}", key),
            Self::Plain(rgb) => write!(f, "{}", rgb),
        }
    }
}

/// Numbers that make up a quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityProfile {
    /// Preferred edge length of one grid cell in pixels
    pub cell_px: u32,
    /// Upper bound for the longer canvas side
    pub max_side_px: u32,
    /// Output density written into the raster
    pub dpi: u32,
    /// JPEG encoder quality (1-100)
    pub jpeg_quality: u8,
    /// Cell size multiple relative to the normal tier
    pub scale: u32,
}

/// Output fidelity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Normal,
    High,
}

impl Quality {
    pub fn profile(self) -> QualityProfile {
        match self {
            Self::Normal => QualityProfile {
                cell_px: 24,
                max_side_px: 2400,
                dpi: 150,
                jpeg_quality: 90,
                scale: 1,
            },
            Self::High => QualityProfile {
                cell_px: 72,
                max_side_px: 7200,
                dpi: 300,
                jpeg_quality: 95,
                scale: 3,
            },
        }
    }
}

impl FromStr for Quality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "standard" => Ok(Self::Normal),
            "high" | "hd" | "high-definition" => Ok(Self::High),
            _ => Err(CoreError::InvalidStyle {
                field: "quality",
                value: s.to_string(),
            }),
        }
    }
}

/// Border drawn around the whole canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    #[default]
    None,
    Single,
    Double,
}

impl Frame {
    /// Number of concentric borders
    pub fn borders(self) -> usize {
        match self {
            Self::None => 0,
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

impl FromStr for Frame {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "no" => Ok(Self::None),
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            _ => Err(CoreError::InvalidStyle {
                field: "frame",
                value: s.to_string(),
            }),
        }
    }
}

/// How the pattern content is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextOrientation {
    /// Binary stitch grid
    #[default]
    Inline,
    /// Literal glyphs, one character per line
    Stacked,
}

impl FromStr for TextOrientation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inline" | "grid" => Ok(Self::Inline),
            "stacked" | "vertical" => Ok(Self::Stacked),
            _ => Err(CoreError::InvalidStyle {
                field: "text orientation",
                value: s.to_string(),
            }),
        }
    }
}

/// Seeded per-pixel brightness noise imitating fabric weave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grain {
    pub seed: u64,
    /// Maximum brightness change as a fraction of full scale
    #[serde(default = "default_grain_intensity")]
    pub intensity: f32,
}

impl Grain {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            intensity: default_grain_intensity(),
        }
    }
}

fn default_grain_intensity() -> f32 {
    0.06
}

/// Preset families from the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Decorative: fabric, chosen thread, relief
    #[default]
    Poster,
    /// Working diagram: black on white, flat
    Scheme,
}

impl FromStr for PatternKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "poster" | "постер" => Ok(Self::Poster),
            "scheme" | "схема" => Ok(Self::Scheme),
            _ => Err(CoreError::InvalidStyle {
                field: "pattern kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Complete visual configuration for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub thread_color: ThreadColor,
    pub background: Background,
    pub quality: Quality,
    pub include_label: bool,
    pub frame: Frame,
    pub text_orientation: TextOrientation,
    /// Shadow and highlight lines around each stitch
    pub relief: bool,
    /// Optional texture grain; `None` keeps output deterministic
    pub grain: Option<Grain>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::poster(ThreadColor::default(), Background::default())
    }
}

impl RenderStyle {
    /// Decorative preset
    pub fn poster(thread_color: ThreadColor, background: Background) -> Self {
        Self {
            thread_color,
            background,
            quality: Quality::Normal,
            include_label: true,
            frame: Frame::None,
            text_orientation: TextOrientation::Inline,
            relief: true,
            grain: None,
        }
    }

    /// Flat black-on-white working diagram
    pub fn scheme() -> Self {
        Self {
            thread_color: ThreadColor::Named(Thread::Black),
            background: Background::Plain(Rgb::WHITE),
            quality: Quality::Normal,
            include_label: true,
            frame: Frame::None,
            text_orientation: TextOrientation::Inline,
            relief: false,
            grain: None,
        }
    }

    /// Preset for a pattern kind
    pub fn for_kind(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Poster => Self::default(),
            PatternKind::Scheme => Self::scheme(),
        }
    }

    pub fn with_thread(mut self, thread_color: ThreadColor) -> Self {
        self.thread_color = thread_color;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_label(mut self, include_label: bool) -> Self {
        self.include_label = include_label;
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_orientation(mut self, orientation: TextOrientation) -> Self {
        self.text_orientation = orientation;
        self
    }

    pub fn with_relief(mut self, relief: bool) -> Self {
        self.relief = relief;
        self
    }

    pub fn with_grain(mut self, grain: Option<Grain>) -> Self {
        self.grain = grain;
        self
    }

    /// Texture this style needs from the asset registry, if any
    pub fn texture(&self) -> Option<TextureKey> {
        match self.background {
            Background::Texture(key) => Some(key),
            _ => None,
        }
    }
}
