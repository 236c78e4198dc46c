//! Export of rendered canvases

use sashiko_core::{encode_or_default, Codebook, Quality, RenderStyle, StitchMatrix};
use sashiko_export::{
    is_jpeg, is_pdf, is_png, ArtifactGuard, Exporter, PageSize, RasterFormat,
};
use sashiko_render::{Canvas, StitchRenderer};

fn canvas(quality: Quality) -> Canvas {
    let book = Codebook::latin();
    let bits = encode_or_default("SASHIKO", book);
    let matrix = StitchMatrix::build(&bits, &bits).unwrap();
    let style = RenderStyle::scheme().with_label(false).with_quality(quality);
    StitchRenderer::default().render(&matrix, &style, None).unwrap()
}

/// Pixels-per-metre from the PNG pHYs chunk
fn png_ppm(data: &[u8]) -> Option<u32> {
    let at = data.windows(4).position(|w| w == b"pHYs")?;
    let bytes = data.get(at + 4..at + 8)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// (units, x density) from the JFIF APP0 header
fn jfif_density(data: &[u8]) -> Option<(u8, u16)> {
    let at = data.windows(5).position(|w| w == b"JFIF\0")?;
    let units = *data.get(at + 7)?;
    let x = u16::from_be_bytes([*data.get(at + 8)?, *data.get(at + 9)?]);
    Some((units, x))
}

#[test]
fn png_records_tier_dpi() {
    let exporter = Exporter::new(RasterFormat::Png, PageSize::A3);

    let normal = exporter.export_raster(&canvas(Quality::Normal)).unwrap();
    assert!(is_png(&normal));
    assert_eq!(png_ppm(&normal), Some(5906)); // 150 dpi

    let high = exporter.export_raster(&canvas(Quality::High)).unwrap();
    assert_eq!(png_ppm(&high), Some(11811)); // 300 dpi
    assert!(high.len() > normal.len());
}

#[test]
fn jpeg_records_tier_dpi() {
    let exporter = Exporter::new(RasterFormat::Jpeg, PageSize::A3);
    let jpeg = exporter.export_raster(&canvas(Quality::High)).unwrap();
    assert!(is_jpeg(&jpeg));
    assert_eq!(jfif_density(&jpeg), Some((1, 300)));
}

#[test]
fn png_is_deterministic() {
    let exporter = Exporter::default();
    let a = exporter.export_raster(&canvas(Quality::Normal)).unwrap();
    let b = exporter.export_raster(&canvas(Quality::Normal)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn print_document_embeds_raster() {
    let exporter = Exporter::new(RasterFormat::Png, PageSize::A3);
    let png = exporter.export_raster(&canvas(Quality::Normal)).unwrap();
    let pdf = exporter.export_print_document(&png).unwrap();
    assert!(is_pdf(&pdf), "Output doesn't start with PDF header");
}

#[test]
fn print_document_accepts_jpeg() {
    let exporter = Exporter::new(RasterFormat::Jpeg, PageSize::A4);
    let jpeg = exporter.export_raster(&canvas(Quality::Normal)).unwrap();
    let pdf = exporter.export_print_document(&jpeg).unwrap();
    assert!(is_pdf(&pdf));
}

#[test]
fn written_artifacts_are_unique_and_committed() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::default();
    let png = exporter.export_raster(&canvas(Quality::Normal)).unwrap();

    let mut guard = ArtifactGuard::new();
    let first = exporter.write_raster(&png, dir.path(), &mut guard).unwrap();
    let second = exporter.write_raster(&png, dir.path(), &mut guard).unwrap();
    guard.commit();

    assert_ne!(first.path, second.path);
    assert_eq!(first.mime_type, "image/png");
    assert!(first.path.exists() && second.path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn dropped_guard_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::default();
    let png = exporter.export_raster(&canvas(Quality::Normal)).unwrap();
    {
        let mut guard = ArtifactGuard::new();
        exporter.write_raster(&png, dir.path(), &mut guard).unwrap();
        exporter
            .write_print_document(b"%PDF-stub", dir.path(), &mut guard)
            .unwrap();
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
