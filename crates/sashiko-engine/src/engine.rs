//! Stitch pattern engine
//!
//! Entry point for turning two strings and a style into artifacts.
//!
//! # Pipeline
//!
//! ```text
//! text_h ──encode──▶ bits_h ─┐
//!                            ├─▶ StitchMatrix ──render──▶ Canvas ──▶ PNG/JPEG ──▶ PDF
//! text_v ──encode──▶ bits_v ─┘
//! ```
//!
//! With [`TextOrientation::Stacked`] the matrix step is skipped and the
//! source strings are drawn as glyphs instead.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sashiko_core::{
    caption, distinct_texts, encode_or_default, Codebook, CodebookPolicy, RenderStyle,
    StitchMatrix, TextOrientation,
};
use sashiko_export::{ArtifactFile, ArtifactGuard, Exporter, RasterFormat};
use sashiko_render::{AssetRegistry, Canvas, StitchRenderer};

use crate::config::Settings;
use crate::error::{EngineError, Result};

/// Cooperative cancellation flag shared between a caller and one render
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with [`EngineError::Cancelled`] once cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Everything one generation needs from the caller
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRequest {
    pub text_h: String,
    pub text_v: String,
    pub style: RenderStyle,
    /// Also produce a print document
    pub print_document: bool,
}

impl PatternRequest {
    pub fn new(text_h: impl Into<String>, text_v: impl Into<String>, style: RenderStyle) -> Self {
        Self {
            text_h: text_h.into(),
            text_v: text_v.into(),
            style,
            print_document: false,
        }
    }

    /// Same string on both axes
    pub fn symmetric(text: impl Into<String>, style: RenderStyle) -> Self {
        let text = text.into();
        Self::new(text.clone(), text, style)
    }

    pub fn with_print_document(mut self, print_document: bool) -> Self {
        self.print_document = print_document;
        self
    }

    /// Caption drawn in the label band
    pub fn label(&self) -> String {
        caption(&self.text_h, &self.text_v)
    }
}

/// In-memory result of a generation
#[derive(Debug, Clone)]
pub struct RenderedPattern {
    pub raster: Vec<u8>,
    pub format: RasterFormat,
    pub print_document: Option<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    /// `(height, width)` of the stitch matrix; `None` for stacked glyphs
    pub matrix: Option<(usize, usize)>,
    pub label: Option<String>,
}

/// Persisted result of a generation, owned by the caller
#[derive(Debug, Clone)]
pub struct PatternArtifact {
    pub raster: ArtifactFile,
    pub print_document: Option<ArtifactFile>,
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    pub matrix: Option<(usize, usize)>,
    pub label: Option<String>,
}

/// Stitch pattern engine
///
/// Holds only read-only state, so one instance can serve any number of
/// concurrent requests.
///
/// # Example
///
/// ```ignore
/// use sashiko_engine::{PatternRequest, StitchEngine};
/// use sashiko_core::RenderStyle;
///
/// let engine = StitchEngine::new();
/// let request = PatternRequest::symmetric("HELLO", RenderStyle::scheme());
/// let pattern = engine.generate(&request)?;
/// ```
#[derive(Debug)]
pub struct StitchEngine {
    codebook: Codebook,
    renderer: StitchRenderer,
    exporter: Exporter,
}

impl Default for StitchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StitchEngine {
    /// Engine with the standard codebook, no assets and PNG output
    pub fn new() -> Self {
        Self::with_parts(
            Codebook::standard().clone(),
            Arc::new(AssetRegistry::empty()),
            Exporter::default(),
        )
    }

    pub fn with_parts(codebook: Codebook, assets: Arc<AssetRegistry>, exporter: Exporter) -> Self {
        log::debug!(
            "Engine using codebook {} ({} bits per character)",
            codebook.name(),
            codebook.width()
        );
        Self {
            codebook,
            renderer: StitchRenderer::new(assets),
            exporter,
        }
    }

    /// Engine configured from settings, loading assets once
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let assets = settings.asset_registry()?;
        Ok(Self::with_parts(
            settings.encoding.codebook.codebook().clone(),
            Arc::new(assets),
            settings.exporter(),
        ))
    }

    pub fn with_codebook(mut self, policy: CodebookPolicy) -> Self {
        self.codebook = policy.codebook().clone();
        self
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    pub fn assets(&self) -> &AssetRegistry {
        self.renderer.assets()
    }

    /// Fail fast on a style the asset registry cannot satisfy
    pub fn validate(&self, request: &PatternRequest) -> Result<()> {
        self.assets().validate(&request.style)?;
        Ok(())
    }

    /// Encode both strings and build the matrix
    pub fn build_matrix(&self, text_h: &str, text_v: &str) -> Result<StitchMatrix> {
        let bits_h = encode_or_default(text_h, &self.codebook);
        let bits_v = encode_or_default(text_v, &self.codebook);
        Ok(StitchMatrix::build(&bits_h, &bits_v)?)
    }

    /// Render the request to a canvas without encoding it
    pub fn render(&self, request: &PatternRequest) -> Result<(Canvas, Option<(usize, usize)>)> {
        self.render_with(request, &CancelToken::new())
    }

    fn render_with(
        &self,
        request: &PatternRequest,
        cancel: &CancelToken,
    ) -> Result<(Canvas, Option<(usize, usize)>)> {
        self.validate(request)?;
        let style = &request.style;
        let label = request.label();
        let label = style.include_label.then_some(label.as_str());

        match style.text_orientation {
            TextOrientation::Inline => {
                let matrix = self.build_matrix(&request.text_h, &request.text_v)?;
                cancel.check()?;
                let canvas = self.renderer.render(&matrix, style, label)?;
                Ok((canvas, Some(matrix.dimensions())))
            }
            TextOrientation::Stacked => {
                let texts: Vec<&str> = distinct_texts(&request.text_h, &request.text_v)
                    .into_iter()
                    .filter(|text| !text.trim().is_empty())
                    .collect();
                cancel.check()?;
                let canvas = self.renderer.render_stacked(&texts, style, label)?;
                Ok((canvas, None))
            }
        }
    }

    /// Generate artifact bytes in memory
    pub fn generate(&self, request: &PatternRequest) -> Result<RenderedPattern> {
        self.generate_with(request, &CancelToken::new())
    }

    /// Generate artifact bytes, checking `cancel` between stages
    pub fn generate_with(
        &self,
        request: &PatternRequest,
        cancel: &CancelToken,
    ) -> Result<RenderedPattern> {
        cancel.check()?;
        let (canvas, matrix) = self.render_with(request, cancel)?;

        cancel.check()?;
        let raster = self.exporter.export_raster(&canvas)?;

        let print_document = if request.print_document {
            cancel.check()?;
            Some(self.exporter.export_print_document(&raster)?)
        } else {
            None
        };

        log::info!(
            "Generated {}x{} {} pattern{}",
            canvas.width(),
            canvas.height(),
            self.exporter.format.extension(),
            if print_document.is_some() {
                " with print document"
            } else {
                ""
            }
        );

        Ok(RenderedPattern {
            raster,
            format: self.exporter.format,
            print_document,
            width: canvas.width(),
            height: canvas.height(),
            dpi: canvas.dpi(),
            matrix,
            label: request
                .style
                .include_label
                .then(|| request.label()),
        })
    }

    /// Generate and persist artifacts into `dir`.
    ///
    /// Either every artifact is written and returned, or none remain on disk.
    pub fn generate_to_dir(
        &self,
        request: &PatternRequest,
        dir: &Path,
        cancel: &CancelToken,
    ) -> Result<PatternArtifact> {
        let rendered = self.generate_with(request, cancel)?;

        let mut guard = ArtifactGuard::new();
        cancel.check()?;
        let raster = self.exporter.write_raster(&rendered.raster, dir, &mut guard)?;

        let print_document = match &rendered.print_document {
            Some(pdf) => {
                cancel.check()?;
                Some(self.exporter.write_print_document(pdf, dir, &mut guard)?)
            }
            None => None,
        };

        cancel.check()?;
        guard.commit();

        Ok(PatternArtifact {
            raster,
            print_document,
            width: rendered.width,
            height: rendered.height,
            dpi: rendered.dpi,
            matrix: rendered.matrix,
            label: rendered.label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use sashiko_core::{Background, TextureKey};

    fn scheme() -> RenderStyle {
        RenderStyle::scheme().with_label(false)
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(token.check().is_ok());
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_request_label() {
        let request = PatternRequest::new("hello", "HELLO", scheme());
        assert_eq!(request.label(), "HELLO");
        let request = PatternRequest::new("love", "kyiv", scheme());
        assert_eq!(request.label(), "LOVE / KYIV");
    }

    #[test]
    fn test_build_matrix_uses_codebook() {
        let engine = StitchEngine::new().with_codebook(CodebookPolicy::Latin);
        let matrix = engine.build_matrix("A", "AB").unwrap();
        assert_eq!(matrix.dimensions(), (5, 10));
    }

    #[test]
    fn test_generate_inline() {
        let engine = StitchEngine::new();
        let pattern = engine
            .generate(&PatternRequest::symmetric("SASHIKO", scheme()))
            .unwrap();
        assert_eq!(pattern.format, RasterFormat::Png);
        assert_eq!(pattern.matrix, Some((49, 49)));
        assert!(pattern.print_document.is_none());
        assert!(pattern.label.is_none());
        assert_eq!(pattern.dpi, 150);
    }

    #[test]
    fn test_unregistered_texture_is_configuration_error() {
        let engine = StitchEngine::new();
        let style = scheme().with_background(Background::Texture(TextureKey::Denim));
        let err = engine
            .generate(&PatternRequest::symmetric("A", style))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_cancelled_before_start() {
        let engine = StitchEngine::new();
        let token = CancelToken::new();
        token.cancel();
        let err = engine
            .generate_with(&PatternRequest::symmetric("A", scheme()), &token)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_stacked_without_text_is_rejected() {
        let engine = StitchEngine::new();
        let style = scheme().with_orientation(TextOrientation::Stacked);
        let err = engine
            .generate(&PatternRequest::new("  ", "", style))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
