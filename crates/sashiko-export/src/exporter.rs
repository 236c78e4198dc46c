//! Canvas to artifact bytes and files

use std::path::Path;

use sashiko_render::Canvas;

use crate::artifact::{write_artifact, ArtifactFile, ArtifactGuard};
use crate::document::{PageSize, PrintDocument};
use crate::error::Result;
use crate::raster::{encode_raster, RasterFormat};

const PDF_MIME: &str = "application/pdf";

/// Export settings for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exporter {
    pub format: RasterFormat,
    pub page: PageSize,
}

impl Exporter {
    pub fn new(format: RasterFormat, page: PageSize) -> Self {
        Self { format, page }
    }

    /// Encode the canvas as raster bytes
    pub fn export_raster(&self, canvas: &Canvas) -> Result<Vec<u8>> {
        encode_raster(canvas, self.format)
    }

    /// Embed encoded raster bytes into a one-page print document
    pub fn export_print_document(&self, raster: &[u8]) -> Result<Vec<u8>> {
        PrintDocument::compile(raster, self.format, self.page)
    }

    /// Write raster bytes into `dir`, tracked by `guard`
    pub fn write_raster(
        &self,
        raster: &[u8],
        dir: &Path,
        guard: &mut ArtifactGuard,
    ) -> Result<ArtifactFile> {
        let file = write_artifact(
            dir,
            self.format.extension(),
            self.format.mime_type(),
            raster,
        )?;
        guard.track(&file);
        Ok(file)
    }

    /// Write print-document bytes into `dir`, tracked by `guard`
    pub fn write_print_document(
        &self,
        pdf: &[u8],
        dir: &Path,
        guard: &mut ArtifactGuard,
    ) -> Result<ArtifactFile> {
        let file = write_artifact(dir, "pdf", PDF_MIME, pdf)?;
        guard.track(&file);
        Ok(file)
    }
}
