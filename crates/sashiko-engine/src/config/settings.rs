//! Configuration settings

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sashiko_core::{CodebookPolicy, RenderStyle, TextureKey};
use sashiko_export::{Exporter, PageSize, RasterFormat};
use sashiko_render::AssetRegistry;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub pool: PoolSettings,
    pub assets: AssetSettings,
    /// Default style for requests that do not carry their own
    pub style: RenderStyle,
    pub encoding: EncodingSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file.
    ///
    /// Relative paths in the file are resolved against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Settings(format!("{}: {}", path.display(), e)))?;
        let mut settings = Self::from_toml_str(&text)
            .map_err(|e| EngineError::Settings(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            settings.rebase(base);
        }
        settings.validate()?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.pool.workers == 0 {
            return Err(EngineError::Settings(
                "pool.workers must be at least 1".to_string(),
            ));
        }
        if self.pool.timeout_secs == Some(0) {
            return Err(EngineError::Settings(
                "pool.timeout_secs must be positive".to_string(),
            ));
        }
        for key in self.assets.textures.keys() {
            key.parse::<TextureKey>()?;
        }
        Ok(())
    }

    /// Exporter for the configured output format and page
    pub fn exporter(&self) -> Exporter {
        Exporter::new(self.output.format, self.output.page)
    }

    /// Build the asset registry described by `[assets]`
    pub fn asset_registry(&self) -> Result<AssetRegistry> {
        let assets = &self.assets;
        let mut builder = AssetRegistry::builder().system_fonts(assets.system_fonts);

        for (name, path) in &assets.textures {
            let key: TextureKey = name.parse()?;
            builder = builder.texture_file(key, path);
        }
        for font in &assets.fonts {
            builder = builder.font_file(font);
        }
        if let Some(family) = &assets.font_family {
            builder = builder.font_family(family.clone());
        }

        Ok(builder.build())
    }

    fn rebase(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.output.dir);
        self.assets.textures.values_mut().for_each(join);
        self.assets.fonts.iter_mut().for_each(join);
    }
}

/// Where and how artifacts are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub format: RasterFormat,
    /// Also produce a one-page PDF
    pub print_document: bool,
    pub page: PageSize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: RasterFormat::Png,
            print_document: false,
            page: PageSize::A3,
        }
    }
}

/// Render pool limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Maximum number of renders in flight
    pub workers: usize,
    /// Per-request time budget; unlimited when absent
    pub timeout_secs: Option<u64>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            workers: 2,
            timeout_secs: None,
        }
    }
}

impl PoolSettings {
    pub fn budget(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Textures and fonts made available to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Texture key to PNG file
    pub textures: BTreeMap<String, PathBuf>,
    /// Font files loaded in addition to system fonts
    pub fonts: Vec<PathBuf>,
    pub system_fonts: bool,
    pub font_family: Option<String>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            textures: BTreeMap::new(),
            fonts: Vec::new(),
            system_fonts: true,
            font_family: None,
        }
    }
}

/// Text-to-bits settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EncodingSettings {
    pub codebook: CodebookPolicy,
}
