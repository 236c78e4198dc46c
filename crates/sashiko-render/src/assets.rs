//! Texture and font registry
//!
//! Assets are resolved once at startup into an [`AssetRegistry`] that is
//! shared read-only between renders. A texture key is either *declared*
//! (data loaded, or load failed and the slot is kept as missing) or
//! *undeclared*. Styles referencing undeclared keys are rejected up front;
//! declared-but-missing textures fall back to a flat neutral fill.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use sashiko_core::{RenderStyle, Rgb, TextureKey};
use tiny_skia::Pixmap;
use usvg::fontdb;

use crate::error::{RenderError, Result};

/// Fill used when a declared texture has no data
pub const NEUTRAL_FILL: Rgb = Rgb::new(0xe8, 0xe4, 0xda);

/// Family requested when the registry is not told otherwise
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans";

/// State of a declared texture
#[derive(Debug, Clone)]
pub enum TextureSlot {
    Loaded(Arc<Pixmap>),
    Missing(String),
}

/// Read-only collection of textures and fonts
#[derive(Clone)]
pub struct AssetRegistry {
    textures: BTreeMap<TextureKey, TextureSlot>,
    fonts: Arc<fontdb::Database>,
    font_family: Option<String>,
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("textures", &self.textures.keys().collect::<Vec<_>>())
            .field("font_faces", &self.fonts.len())
            .field("font_family", &self.font_family)
            .finish()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl AssetRegistry {
    /// Start building a registry
    pub fn builder() -> AssetRegistryBuilder {
        AssetRegistryBuilder::default()
    }

    /// No textures, no fonts
    pub fn empty() -> Self {
        Self {
            textures: BTreeMap::new(),
            fonts: Arc::new(fontdb::Database::new()),
            font_family: None,
        }
    }

    /// Look up a texture.
    ///
    /// `Ok(None)` means declared but unavailable; the caller should fall back.
    pub fn texture(&self, key: TextureKey) -> Result<Option<&Pixmap>> {
        match self.textures.get(&key) {
            Some(TextureSlot::Loaded(pixmap)) => Ok(Some(pixmap.as_ref())),
            Some(TextureSlot::Missing(_)) => Ok(None),
            None => Err(RenderError::UnregisteredTexture(key)),
        }
    }

    /// Declared texture keys
    pub fn texture_keys(&self) -> impl Iterator<Item = TextureKey> + '_ {
        self.textures.keys().copied()
    }

    /// Fail fast for styles that reference assets this registry never declared
    pub fn validate(&self, style: &RenderStyle) -> Result<()> {
        if let Some(key) = style.texture() {
            if !self.textures.contains_key(&key) {
                return Err(RenderError::UnregisteredTexture(key));
            }
        }
        Ok(())
    }

    /// Shared font database
    pub fn fonts(&self) -> &Arc<fontdb::Database> {
        &self.fonts
    }

    /// True if at least one font face is loaded
    pub fn has_fonts(&self) -> bool {
        !self.fonts.is_empty()
    }

    /// Family that text should be set in
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }
}

/// Builder for [`AssetRegistry`]. Loading problems are logged, never fatal.
#[derive(Default)]
pub struct AssetRegistryBuilder {
    textures: BTreeMap<TextureKey, TextureSlot>,
    fonts: Vec<Vec<u8>>,
    font_files: Vec<std::path::PathBuf>,
    system_fonts: bool,
    font_family: Option<String>,
}

impl AssetRegistryBuilder {
    /// Declare a texture from PNG bytes
    pub fn texture_bytes(mut self, key: TextureKey, png: &[u8]) -> Self {
        let slot = match Pixmap::decode_png(png) {
            Ok(pixmap) => TextureSlot::Loaded(Arc::new(pixmap)),
            Err(e) => {
                log::warn!("Texture {} could not be decoded: {}", key, e);
                TextureSlot::Missing(e.to_string())
            }
        };
        self.textures.insert(key, slot);
        self
    }

    /// Declare a texture from a PNG file
    pub fn texture_file(self, key: TextureKey, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => self.texture_bytes(key, &bytes),
            Err(e) => {
                log::warn!("Texture {} not found at {}: {}", key, path.display(), e);
                self.missing_texture(key, e.to_string())
            }
        }
    }

    /// Declare a texture without data
    pub fn missing_texture(mut self, key: TextureKey, reason: impl Into<String>) -> Self {
        self.textures.insert(key, TextureSlot::Missing(reason.into()));
        self
    }

    /// Add a font from memory
    pub fn font_bytes(mut self, data: Vec<u8>) -> Self {
        self.fonts.push(data);
        self
    }

    /// Add a font file
    pub fn font_file(mut self, path: impl AsRef<Path>) -> Self {
        self.font_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Also load fonts installed on the system
    pub fn system_fonts(mut self, enabled: bool) -> Self {
        self.system_fonts = enabled;
        self
    }

    /// Preferred font family for labels and glyphs
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn build(self) -> AssetRegistry {
        let mut db = fontdb::Database::new();
        if self.system_fonts {
            db.load_system_fonts();
        }
        for data in self.fonts {
            db.load_font_data(data);
        }
        for path in &self.font_files {
            if let Err(e) = db.load_font_file(path) {
                log::warn!("Font {} could not be loaded: {}", path.display(), e);
            }
        }

        let font_family = resolve_family(&db, self.font_family.as_deref());
        if db.is_empty() {
            log::warn!("No fonts available, labels will not be drawn");
        } else {
            log::debug!(
                "Loaded {} font face(s), using family {:?}",
                db.len(),
                font_family
            );
        }

        AssetRegistry {
            textures: self.textures,
            fonts: Arc::new(db),
            font_family,
        }
    }
}

/// The requested family if installed, else the first available one
fn resolve_family(db: &fontdb::Database, requested: Option<&str>) -> Option<String> {
    let wanted = requested.unwrap_or(DEFAULT_FONT_FAMILY);
    let mut first = None;
    for face in db.faces() {
        for (family, _) in &face.families {
            if family.eq_ignore_ascii_case(wanted) {
                return Some(family.clone());
            }
            if first.is_none() {
                first = Some(family.clone());
            }
        }
    }
    if first.is_some() {
        log::warn!("Font family {:?} not found, using {:?}", wanted, first);
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        pixmap.encode_png().unwrap()
    }

    #[test]
    fn test_loaded_texture() {
        let registry = AssetRegistry::builder()
            .texture_bytes(TextureKey::Linen, &tiny_png())
            .build();
        let texture = registry.texture(TextureKey::Linen).unwrap();
        assert_eq!(texture.map(|p| p.width()), Some(2));
    }

    #[test]
    fn test_undecodable_texture_is_missing() {
        let registry = AssetRegistry::builder()
            .texture_bytes(TextureKey::Hemp, b"not a png")
            .build();
        assert!(registry.texture(TextureKey::Hemp).unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_missing_slot() {
        let dir = tempfile::tempdir().unwrap();
        let registry = AssetRegistry::builder()
            .texture_file(TextureKey::Denim, dir.path().join("nope.png"))
            .build();
        assert!(registry.texture(TextureKey::Denim).unwrap().is_none());
    }

    #[test]
    fn test_undeclared_texture_is_error() {
        let registry = AssetRegistry::empty();
        assert!(matches!(
            registry.texture(TextureKey::Linen),
            Err(RenderError::UnregisteredTexture(TextureKey::Linen))
        ));
    }

    #[test]
    fn test_validate_style() {
        use sashiko_core::Background;

        let registry = AssetRegistry::builder()
            .missing_texture(TextureKey::Linen, "not shipped")
            .build();
        let ok = RenderStyle::default().with_background(Background::Texture(TextureKey::Linen));
        let bad = RenderStyle::default().with_background(Background::Texture(TextureKey::Denim));
        assert!(registry.validate(&ok).is_ok());
        assert!(registry.validate(&bad).is_err());
        assert!(registry.validate(&RenderStyle::scheme()).is_ok());
    }

    #[test]
    fn test_empty_registry_has_no_fonts() {
        let registry = AssetRegistry::empty();
        assert!(!registry.has_fonts());
        assert!(registry.font_family().is_none());
    }
}
