//! Canvas geometry and pixel storage
//!
//! All drawing happens in *logical cells*. A [`Layout`] maps the logical
//! grid (content plus a margin on every side, plus an optional label band)
//! onto pixels using one integer cell size picked from the quality tier.
//!
//! The cell is fitted against the normal tier and then multiplied by the
//! tier's scale, so every tier draws the same logical grid and a larger tier
//! is always proportionally larger. A grid too large to fit at
//! [`MIN_CELL_PX`] is rejected rather than drawn past the size limit.

use sashiko_core::{Quality, QualityProfile, Rgb};
use tiny_skia::Pixmap;

use crate::error::{RenderError, Result};

/// Empty cells around the content on every side
pub const MARGIN_CELLS: u32 = 1;

/// Height of the caption band under the content, in cells
pub const LABEL_BAND_CELLS: u32 = 3;

/// Smallest cell edge the layout will shrink to
pub const MIN_CELL_PX: u32 = 4;

/// Logical-to-pixel mapping for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Content columns
    pub content_cols: u32,
    /// Content rows
    pub content_rows: u32,
    /// Whether a caption band is reserved
    pub label_band: bool,
    /// Edge of one cell in pixels
    pub cell_px: u32,
    pub profile: QualityProfile,
}

impl Layout {
    pub fn new(
        content_cols: u32,
        content_rows: u32,
        label_band: bool,
        quality: Quality,
    ) -> Result<Self> {
        let base = Quality::Normal.profile();
        let profile = quality.profile();
        let mut layout = Self {
            content_cols,
            content_rows,
            label_band,
            cell_px: profile.cell_px,
            profile,
        };

        let longest = layout.logical_cols().max(layout.logical_rows()).max(1);
        let fitted = base.cell_px.min(base.max_side_px / longest);
        if fitted < MIN_CELL_PX {
            return Err(RenderError::TooLarge {
                cols: layout.logical_cols(),
                rows: layout.logical_rows(),
                limit: Self::max_logical_side(),
            });
        }
        layout.cell_px = fitted * profile.scale;
        Ok(layout)
    }

    /// Longest logical side (margins and band included) any tier accepts
    pub fn max_logical_side() -> u32 {
        Quality::Normal.profile().max_side_px / MIN_CELL_PX
    }

    /// Columns including margins
    pub fn logical_cols(&self) -> u32 {
        self.content_cols + 2 * MARGIN_CELLS
    }

    /// Rows including margins and label band
    pub fn logical_rows(&self) -> u32 {
        let band = if self.label_band { LABEL_BAND_CELLS } else { 0 };
        self.content_rows + 2 * MARGIN_CELLS + band
    }

    pub fn width_px(&self) -> u32 {
        self.logical_cols() * self.cell_px
    }

    pub fn height_px(&self) -> u32 {
        self.logical_rows() * self.cell_px
    }

    pub fn cell(&self) -> f32 {
        self.cell_px as f32
    }

    /// Pixel position of a logical grid point
    pub fn point(&self, col: f32, row: f32) -> (f32, f32) {
        (col * self.cell(), row * self.cell())
    }

    /// Pixel position of the top-left corner of content cell `(row, col)`
    pub fn content_origin(&self, row: usize, col: usize) -> (f32, f32) {
        let m = MARGIN_CELLS as f32;
        self.point(m + col as f32, m + row as f32)
    }

    /// Top edge and height of the caption band, if reserved
    pub fn label_band_px(&self) -> Option<(f32, f32)> {
        if !self.label_band {
            return None;
        }
        let top = (self.content_rows + 2 * MARGIN_CELLS) as f32 * self.cell();
        Some((top, LABEL_BAND_CELLS as f32 * self.cell()))
    }

    /// Width of a stitch line
    pub fn stitch_width(&self) -> f32 {
        self.cell() * 0.14
    }

    /// Width of a reference grid line
    pub fn grid_width(&self) -> f32 {
        (self.cell() * 0.03).max(0.5)
    }

    /// Allocate a pixmap of this layout's size
    pub(crate) fn allocate(&self) -> Result<Pixmap> {
        let (width, height) = (self.width_px(), self.height_px());
        Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })
    }
}

/// A finished raster with the metadata the exporter needs
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    layout: Layout,
}

impl Canvas {
    pub(crate) fn new(pixmap: Pixmap, layout: Layout) -> Self {
        Self { pixmap, layout }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Output density for this canvas's quality tier
    pub fn dpi(&self) -> u32 {
        self.layout.profile.dpi
    }

    /// JPEG quality for this canvas's quality tier
    pub fn jpeg_quality(&self) -> u8 {
        self.layout.profile.jpeg_quality
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Colour at a pixel, alpha discarded
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgb::new(c.red(), c.green(), c.blue())
        })
    }

    /// Straight (non-premultiplied) RGBA bytes, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// RGB bytes with alpha dropped, row-major
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.pixels().len() * 3);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue()]);
        }
        out
    }
}
