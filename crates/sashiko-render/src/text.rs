//! Text drawing through SVG
//!
//! tiny-skia has no text support, so captions and stacked glyphs are
//! written as SVG `<text>` elements, laid out by usvg against the
//! registry's font database and rasterised by resvg onto the canvas.

use std::fmt::Write as _;

use sashiko_core::Rgb;
use tiny_skia::Pixmap;

use crate::assets::AssetRegistry;
use crate::error::{RenderError, Result};

/// One `<text>` element
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Anchor x (centre of the run)
    pub x: f32,
    /// Baseline y
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    pub style: TextPaint,
}

/// How a text run is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPaint {
    /// Solid fill
    Fill,
    /// Dashed outline imitating running stitches
    DashedOutline { width: f32, dash: f32, gap: f32, opacity: f32 },
}

/// Collects text runs and draws them in one pass
pub struct TextOverlay<'a> {
    assets: &'a AssetRegistry,
    body: String,
    runs: usize,
}

impl<'a> TextOverlay<'a> {
    pub fn new(assets: &'a AssetRegistry) -> Self {
        Self {
            assets,
            body: String::new(),
            runs: 0,
        }
    }

    pub fn push(&mut self, run: &TextRun<'_>) {
        let family = self.assets.font_family().unwrap_or("sans-serif");
        let paint = match run.style {
            TextPaint::Fill => format!(r#"fill="{}""#, run.color.to_hex()),
            TextPaint::DashedOutline {
                width,
                dash,
                gap,
                opacity,
            } => format!(
                r#"fill="none" stroke="{}" stroke-width="{:.2}" stroke-dasharray="{:.2} {:.2}" stroke-linecap="round" stroke-opacity="{:.2}""#,
                run.color.to_hex(),
                width,
                dash,
                gap,
                opacity
            ),
        };
        // Writing to a String cannot fail.
        let _ = write!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" font-weight="bold" text-anchor="middle" {}>{}</text>"#,
            run.x,
            run.y,
            escape_xml(family),
            run.size,
            paint,
            escape_xml(run.text)
        );
        self.runs += 1;
    }

    /// Rasterise all runs onto `pixmap`. Without fonts this is a no-op.
    pub fn draw(self, pixmap: &mut Pixmap) -> Result<()> {
        if self.runs == 0 {
            return Ok(());
        }
        if !self.assets.has_fonts() {
            log::warn!("Skipping {} text run(s): no fonts loaded", self.runs);
            return Ok(());
        }

        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = pixmap.width(),
            h = pixmap.height(),
            body = self.body
        );

        let tree = {
            let mut opts = usvg::Options::default();
            opts.fontdb = self.assets.fonts().clone();
            usvg::Tree::from_str(&svg, &opts)
                .map_err(|e| RenderError::Svg(format!("SVG parsing failed: {}", e)))?
        };

        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        log::debug!("Drew {} text run(s)", self.runs);
        Ok(())
    }
}

/// Escape text for use inside SVG markup
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Not allowed anywhere in XML 1.0
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            _ => out.push(ch),
        }
    }
    out
}
