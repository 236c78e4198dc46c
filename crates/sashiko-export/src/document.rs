//! Print document generation
//!
//! The raster is handed to Typst as an in-memory file and placed on a single
//! zero-margin page, stretched to the page's exact size, then compiled to PDF.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typst_as_lib::TypstEngine;

use crate::error::{ExportError, Result};
use crate::raster::RasterFormat;

/// Physical page size of the print document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A3,
    A4,
}

impl PageSize {
    /// Typst paper name
    pub fn paper(&self) -> &'static str {
        match self {
            Self::A3 => "a3",
            Self::A4 => "a4",
        }
    }

    /// Width and height in millimetres, portrait
    pub fn millimetres(&self) -> (u32, u32) {
        match self {
            Self::A3 => (297, 420),
            Self::A4 => (210, 297),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.paper())
    }
}

impl FromStr for PageSize {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            _ => Err(ExportError::Unsupported {
                kind: "page size",
                value: s.to_string(),
            }),
        }
    }
}

/// Compiler for single-page print documents
pub struct PrintDocument;

impl PrintDocument {
    /// Typst markup placing `image_name` over the whole page
    pub fn markup(image_name: &str, page: PageSize) -> String {
        format!(
            "#set page(paper: \"{}\", margin: 0pt)\n\
             #image(\"{}\", width: 100%, height: 100%, fit: \"stretch\")\n",
            page.paper(),
            image_name
        )
    }

    /// Embed encoded raster bytes full-page and compile to PDF bytes
    pub fn compile(raster: &[u8], format: RasterFormat, page: PageSize) -> Result<Vec<u8>> {
        let image_name = format!("pattern.{}", format.extension());
        let markup = Self::markup(&image_name, page);

        let engine = TypstEngine::builder()
            .main_file(markup)
            .with_static_file_resolver([(image_name.as_str(), raster.to_vec())])
            .build();

        // compiled is Warned<Result<Document, Error>>
        let compiled = engine.compile();
        let document = compiled
            .output
            .map_err(|e| ExportError::Compilation(format!("{:?}", e)))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf_bytes = typst_pdf::pdf(&document, &options)
            .map_err(|e| ExportError::Compilation(format!("PDF generation failed: {:?}", e)))?;

        log::debug!(
            "Compiled {} print document ({} bytes)",
            page,
            pdf_bytes.len()
        );
        Ok(pdf_bytes.into())
    }
}

/// True if the bytes start with a PDF header
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
}
