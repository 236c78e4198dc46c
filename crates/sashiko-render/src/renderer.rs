//! Stitch pattern renderer
//!
//! Draw order for every render:
//!
//! 1. background (fabric colour, texture, or plain fill)
//! 2. optional seeded grain
//! 3. faint reference grid over the whole canvas
//! 4. content: stitch segments, or stacked glyphs
//! 5. optional frame
//! 6. optional caption in the label band

use std::sync::Arc;

use sashiko_core::{Background, RenderStyle, Rgb, StitchMatrix};
use tiny_skia::{
    Color, FilterQuality, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::assets::{AssetRegistry, NEUTRAL_FILL};
use crate::canvas::{Canvas, Layout, MARGIN_CELLS};
use crate::error::{RenderError, Result};
use crate::grain::apply_grain;
use crate::text::{TextOverlay, TextPaint, TextRun};

/// Fraction of a cell left bare at each end of a stitch
const STITCH_INSET: f32 = 0.14;

/// Cells per glyph box in stacked layout
const GLYPH_CELLS: u32 = 3;

/// Alpha of the reference grid
const GRID_ALPHA: u8 = 30;

/// Renders stitch matrices and stacked text onto canvases
#[derive(Debug, Clone)]
pub struct StitchRenderer {
    assets: Arc<AssetRegistry>,
}

impl Default for StitchRenderer {
    fn default() -> Self {
        Self::new(Arc::new(AssetRegistry::empty()))
    }
}

impl StitchRenderer {
    pub fn new(assets: Arc<AssetRegistry>) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Render a stitch matrix.
    ///
    /// `label` is drawn in the reserved band when `style.include_label` is set.
    pub fn render(
        &self,
        matrix: &StitchMatrix,
        style: &RenderStyle,
        label: Option<&str>,
    ) -> Result<Canvas> {
        self.assets.validate(style)?;

        let layout = Layout::new(
            matrix.width() as u32,
            matrix.height() as u32,
            style.include_label,
            style.quality,
        )?;
        let mut pixmap = layout.allocate()?;
        log::debug!(
            "Rendering {}x{} matrix on {}x{} canvas (cell {}px)",
            matrix.height(),
            matrix.width(),
            layout.width_px(),
            layout.height_px(),
            layout.cell_px
        );

        self.paint_background(&mut pixmap, style)?;
        draw_grid(&mut pixmap, &layout);
        draw_stitches(&mut pixmap, &layout, matrix, style);
        draw_frame(&mut pixmap, &layout, style);

        let mut overlay = TextOverlay::new(&self.assets);
        push_label(&mut overlay, &layout, style, label);
        overlay.draw(&mut pixmap)?;

        Ok(Canvas::new(pixmap, layout))
    }

    /// Render source strings as literal glyphs, one character per line,
    /// one column per string.
    pub fn render_stacked(
        &self,
        texts: &[&str],
        style: &RenderStyle,
        label: Option<&str>,
    ) -> Result<Canvas> {
        self.assets.validate(style)?;

        let columns: Vec<Vec<String>> = texts
            .iter()
            .map(|text| text.to_uppercase().chars().map(String::from).collect())
            .collect();
        let lines = columns.iter().map(Vec::len).max().unwrap_or(0);
        if columns.is_empty() || lines == 0 {
            return Err(RenderError::EmptyContent(
                "stacked layout needs at least one character".to_string(),
            ));
        }

        let ncols = columns.len() as u32;
        let layout = Layout::new(
            ncols * GLYPH_CELLS + (ncols - 1),
            lines as u32 * GLYPH_CELLS,
            style.include_label,
            style.quality,
        )?;
        let mut pixmap = layout.allocate()?;
        log::debug!(
            "Rendering {} stacked column(s) of up to {} glyph(s)",
            ncols,
            lines
        );

        self.paint_background(&mut pixmap, style)?;
        draw_grid(&mut pixmap, &layout);
        draw_frame(&mut pixmap, &layout, style);

        let mut overlay = TextOverlay::new(&self.assets);
        push_glyphs(&mut overlay, &layout, style, &columns);
        push_label(&mut overlay, &layout, style, label);
        overlay.draw(&mut pixmap)?;

        Ok(Canvas::new(pixmap, layout))
    }

    fn paint_background(&self, pixmap: &mut Pixmap, style: &RenderStyle) -> Result<()> {
        match style.background {
            Background::Fabric(fabric) => pixmap.fill(color(fabric.rgb(), 255)),
            Background::Plain(rgb) => pixmap.fill(color(rgb, 255)),
            Background::Texture(key) => {
                pixmap.fill(color(NEUTRAL_FILL, 255));
                match self.assets.texture(key)? {
                    Some(texture) => {
                        let sx = pixmap.width() as f32 / texture.width() as f32;
                        let sy = pixmap.height() as f32 / texture.height() as f32;
                        let paint = PixmapPaint {
                            quality: FilterQuality::Bilinear,
                            ..PixmapPaint::default()
                        };
                        pixmap.draw_pixmap(
                            0,
                            0,
                            texture.as_ref(),
                            &paint,
                            Transform::from_scale(sx, sy),
                            None,
                        );
                    }
                    None => {
                        log::warn!("Texture {} unavailable, using neutral fill", key);
                    }
                }
            }
        }

        if let Some(grain) = &style.grain {
            apply_grain(pixmap, grain);
        }
        Ok(())
    }
}

fn color(rgb: Rgb, alpha: u8) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, alpha)
}

fn paint(rgb: Rgb, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb, alpha));
    paint.anti_alias = true;
    paint
}

fn stroke_line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint, width: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

/// Faint lines on every cell boundary of the whole canvas
fn draw_grid(pixmap: &mut Pixmap, layout: &Layout) {
    let paint = paint(Rgb::BLACK, GRID_ALPHA);
    let stroke = Stroke {
        width: layout.grid_width(),
        ..Stroke::default()
    };
    let (w, h) = (layout.width_px() as f32, layout.height_px() as f32);

    let mut pb = PathBuilder::new();
    for col in 0..=layout.logical_cols() {
        let x = col as f32 * layout.cell();
        pb.move_to(x, 0.0);
        pb.line_to(x, h);
    }
    for row in 0..=layout.logical_rows() {
        let y = row as f32 * layout.cell();
        pb.move_to(0.0, y);
        pb.line_to(w, y);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Every stitch segment of the matrix as (from, to) pixel coordinates.
///
/// Horizontal stitches run along the top edge of their cell, vertical
/// stitches along the right edge.
pub fn stitch_segments(layout: &Layout, matrix: &StitchMatrix) -> Vec<((f32, f32), (f32, f32))> {
    let cell = layout.cell();
    let inset = cell * STITCH_INSET;
    let mut segments = Vec::with_capacity(matrix.stitch_count());

    for r in 0..matrix.height() {
        for c in 0..matrix.width() {
            let (x, y) = layout.content_origin(r, c);
            if matrix.horizontal(r, c) {
                segments.push(((x + inset, y), (x + cell - inset, y)));
            }
            if matrix.vertical(r, c) {
                let right = x + cell;
                segments.push(((right, y + inset), (right, y + cell - inset)));
            }
        }
    }
    segments
}

fn draw_stitches(pixmap: &mut Pixmap, layout: &Layout, matrix: &StitchMatrix, style: &RenderStyle) {
    let thread = style.thread_color.rgb();
    let width = layout.stitch_width();
    let segments = stitch_segments(layout, matrix);

    // Back to front: shadow, thread, highlight.
    if style.relief {
        let shadow = paint(thread.darken(0.45), 170);
        let offset = width * 0.35;
        for (from, to) in &segments {
            stroke_line(
                pixmap,
                (from.0 + offset, from.1 + offset),
                (to.0 + offset, to.1 + offset),
                &shadow,
                width,
            );
        }
    }

    let primary = paint(thread, 255);
    for (from, to) in &segments {
        stroke_line(pixmap, *from, *to, &primary, width);
    }

    if style.relief {
        let highlight = paint(thread.lighten(0.45), 200);
        let offset = width * 0.2;
        for (from, to) in &segments {
            stroke_line(
                pixmap,
                (from.0 - offset, from.1 - offset),
                (to.0 - offset, to.1 - offset),
                &highlight,
                width * 0.35,
            );
        }
    }
}

/// One or two concentric borders inside the margin
fn draw_frame(pixmap: &mut Pixmap, layout: &Layout, style: &RenderStyle) {
    let borders = style.frame.borders();
    if borders == 0 {
        return;
    }

    let paint = paint(style.thread_color.rgb(), 255);
    let stroke = Stroke {
        width: layout.stitch_width(),
        ..Stroke::default()
    };
    let (w, h) = (layout.width_px() as f32, layout.height_px() as f32);
    let margin = MARGIN_CELLS as f32 * layout.cell();

    for i in 0..borders {
        let inset = margin * (0.3 + 0.3 * i as f32);
        if let Some(rect) = Rect::from_ltrb(inset, inset, w - inset, h - inset) {
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

fn push_label(
    overlay: &mut TextOverlay<'_>,
    layout: &Layout,
    style: &RenderStyle,
    label: Option<&str>,
) {
    let (Some((top, band)), Some(text)) = (layout.label_band_px(), label) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }

    // Keep the caption within 90% of the canvas width at ~0.6em per glyph.
    let chars = text.chars().count().max(1) as f32;
    let fit = layout.width_px() as f32 * 0.9 / (chars * 0.6);
    let size = (layout.cell() * 1.4).min(fit);

    overlay.push(&TextRun {
        text,
        x: layout.width_px() as f32 / 2.0,
        y: top + band / 2.0 + size * 0.35,
        size,
        color: style.thread_color.rgb(),
        style: TextPaint::Fill,
    });
}

/// Stacked glyphs drawn several times at small offsets
fn push_glyphs(
    overlay: &mut TextOverlay<'_>,
    layout: &Layout,
    style: &RenderStyle,
    columns: &[Vec<String>],
) {
    let cell = layout.cell();
    let size = cell * GLYPH_CELLS as f32 * 0.8;
    let width = layout.stitch_width() * 0.6;
    let d = (cell * 0.06).max(1.0);
    let offsets = [(0.0, 0.0), (d, 0.0), (-d, 0.0), (0.0, d), (0.0, -d)];
    let paint = TextPaint::DashedOutline {
        width,
        dash: cell * 0.3,
        gap: cell * 0.15,
        opacity: 0.7,
    };
    let margin = MARGIN_CELLS as f32;
    let box_cells = GLYPH_CELLS as f32;

    for (i, column) in columns.iter().enumerate() {
        let cx = (margin + i as f32 * (box_cells + 1.0) + box_cells / 2.0) * cell;
        for (j, glyph) in column.iter().enumerate() {
            if glyph.trim().is_empty() {
                continue;
            }
            let cy = (margin + j as f32 * box_cells + box_cells / 2.0) * cell;
            for (dx, dy) in offsets {
                overlay.push(&TextRun {
                    text: glyph,
                    x: cx + dx,
                    y: cy + size * 0.35 + dy,
                    size,
                    color: style.thread_color.rgb(),
                    style: paint,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sashiko_core::{encode_or_default, Codebook, Frame, Quality, Thread, ThreadColor};

    fn matrix(text_h: &str, text_v: &str) -> StitchMatrix {
        let book = Codebook::latin();
        StitchMatrix::build(
            &encode_or_default(text_h, book),
            &encode_or_default(text_v, book),
        )
        .unwrap()
    }

    fn flat_style() -> RenderStyle {
        RenderStyle::scheme().with_label(false)
    }

    #[test]
    fn test_segment_count_matches_matrix() {
        let m = matrix("A", "B");
        let layout = Layout::new(m.width() as u32, m.height() as u32, false, Quality::Normal).unwrap();
        assert_eq!(stitch_segments(&layout, &m).len(), m.stitch_count());
    }

    #[test]
    fn test_horizontal_segment_on_top_edge() {
        // bits "1": one row, one column, H[0][0] = V[0][0] = true.
        let one: sashiko_core::BitString = "1".parse().unwrap();
        let m = StitchMatrix::build(&one, &one).unwrap();
        let layout = Layout::new(1, 1, false, Quality::Normal).unwrap();
        let segments = stitch_segments(&layout, &m);
        let cell = layout.cell();
        let inset = cell * STITCH_INSET;
        assert_eq!(segments[0], ((cell + inset, cell), (2.0 * cell - inset, cell)));
        assert_eq!(segments[1], ((2.0 * cell, cell + inset), (2.0 * cell, 2.0 * cell - inset)));
    }

    #[test]
    fn test_canvas_size() {
        let m = matrix("A", "A");
        let canvas = StitchRenderer::default().render(&m, &flat_style(), None).unwrap();
        let cell = Quality::Normal.profile().cell_px;
        assert_eq!(canvas.width(), 7 * cell);
        assert_eq!(canvas.height(), 7 * cell);
        assert_eq!(canvas.dpi(), 150);
    }

    #[test]
    fn test_stitch_pixels_use_thread_color() {
        let one: sashiko_core::BitString = "1".parse().unwrap();
        let m = StitchMatrix::build(&one, &one).unwrap();
        let style = flat_style().with_thread(ThreadColor::Named(Thread::Red));
        let canvas = StitchRenderer::default().render(&m, &style, None).unwrap();
        let cell = canvas.layout().cell_px;
        // Middle of the top edge of the only cell.
        let on_stitch = canvas.pixel(cell + cell / 2, cell).unwrap();
        assert_eq!(on_stitch, Thread::Red.rgb());
        // Background in the bottom margin stays white-ish.
        let bg = canvas.pixel(cell / 2, 2 * cell + cell / 2).unwrap();
        assert_eq!(bg, Rgb::WHITE);
    }

    #[test]
    fn test_missing_texture_falls_back() {
        let assets = AssetRegistry::builder()
            .missing_texture(sashiko_core::TextureKey::Hemp, "absent")
            .build();
        let renderer = StitchRenderer::new(Arc::new(assets));
        let style = flat_style()
            .with_background(Background::Texture(sashiko_core::TextureKey::Hemp));
        let canvas = renderer.render(&matrix("A", "A"), &style, None).unwrap();
        let cell = canvas.layout().cell_px;
        assert_eq!(canvas.pixel(cell / 2 + 1, cell / 2 + 1), Some(NEUTRAL_FILL));
    }

    #[test]
    fn test_undeclared_texture_is_rejected() {
        let style = flat_style()
            .with_background(Background::Texture(sashiko_core::TextureKey::Denim));
        let result = StitchRenderer::default().render(&matrix("A", "A"), &style, None);
        assert!(matches!(result, Err(RenderError::UnregisteredTexture(_))));
    }

    #[test]
    fn test_frame_is_drawn() {
        let m = matrix("A", "A");
        let style = flat_style().with_frame(Frame::Single);
        let canvas = StitchRenderer::default().render(&m, &style, None).unwrap();
        let cell = canvas.layout().cell() as f32;
        let inset = (cell * 0.3).round() as u32;
        let mid = canvas.width() / 2;
        assert_eq!(canvas.pixel(mid, inset), Some(Thread::Black.rgb()));
    }

    #[test]
    fn test_stacked_rejects_empty_text() {
        let result = StitchRenderer::default().render_stacked(&[""], &flat_style(), None);
        assert!(matches!(result, Err(RenderError::EmptyContent(_))));
    }

    #[test]
    fn test_stacked_layout_size() {
        let canvas = StitchRenderer::default()
            .render_stacked(&["ab", "xyz"], &flat_style(), None)
            .unwrap();
        let layout = canvas.layout();
        assert_eq!(layout.content_cols, 2 * GLYPH_CELLS + 1);
        assert_eq!(layout.content_rows, 3 * GLYPH_CELLS);
    }
}
