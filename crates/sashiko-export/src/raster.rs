//! Raster encoding
//!
//! Canvases are encoded at their native resolution with the quality tier's
//! DPI recorded in the file (`pHYs` for PNG, the JFIF header for JPEG).

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use sashiko_render::Canvas;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

const METERS_PER_INCH: f64 = 0.0254;

/// Raster file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        })
    }
}

impl FromStr for RasterFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(ExportError::Unsupported {
                kind: "raster format",
                value: s.to_string(),
            }),
        }
    }
}

/// Encode a canvas in the given format
pub fn encode_raster(canvas: &Canvas, format: RasterFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        RasterFormat::Png => encode_png(canvas)?,
        RasterFormat::Jpeg => encode_jpeg(canvas)?,
    };
    log::debug!(
        "Encoded {}x{} canvas as {} ({} bytes, {} dpi)",
        canvas.width(),
        canvas.height(),
        format,
        bytes.len(),
        canvas.dpi()
    );
    Ok(bytes)
}

fn encode_png(canvas: &Canvas) -> Result<Vec<u8>> {
    let ppm = (f64::from(canvas.dpi()) / METERS_PER_INCH).round() as u32;
    let data = canvas.to_rgba8();
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
    }
    Ok(out)
}

fn encode_jpeg(canvas: &Canvas) -> Result<Vec<u8>> {
    let dpi = u16::try_from(canvas.dpi()).unwrap_or(u16::MAX);
    let data = canvas.to_rgb8();
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, canvas.jpeg_quality());
        encoder.set_pixel_density(PixelDensity::dpi(dpi));
        encoder.encode(
            &data,
            canvas.width(),
            canvas.height(),
            image::ExtendedColorType::Rgb8,
        )?;
    }
    Ok(out)
}

/// True if the bytes start with the PNG signature
pub fn is_png(data: &[u8]) -> bool {
    data.len() >= 8 && &data[0..8] == b"\x89PNG\r\n\x1a\n"
}

/// True if the bytes start with a JPEG SOI marker
pub fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 3 && data[0..3] == [0xff, 0xd8, 0xff]
}
