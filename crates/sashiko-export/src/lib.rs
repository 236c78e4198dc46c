//! sashiko-export - raster and print-document output
//!
//! # Pipeline
//!
//! 1. **Raster** - a rendered [`Canvas`](sashiko_render::Canvas) is encoded
//!    as PNG or JPEG at the quality tier's DPI
//! 2. **Print document** - the raster is stretched over one page of a fixed
//!    paper size and compiled to PDF through Typst
//! 3. **Artifacts** - bytes are persisted under unique names, with scoped
//!    cleanup on failure
//!
//! # Example
//!
//! ```ignore
//! use sashiko_export::{Exporter, PageSize, RasterFormat};
//!
//! let exporter = Exporter::new(RasterFormat::Png, PageSize::A3);
//! let png = exporter.export_raster(&canvas)?;
//! let pdf = exporter.export_print_document(&png)?;
//! ```

mod artifact;
mod document;
mod error;
mod exporter;
mod raster;

pub use artifact::{artifact_name, write_artifact, ArtifactFile, ArtifactGuard};
pub use document::{is_pdf, PageSize, PrintDocument};
pub use error::{ExportError, Result};
pub use exporter::Exporter;
pub use raster::{encode_raster, is_jpeg, is_png, RasterFormat};
