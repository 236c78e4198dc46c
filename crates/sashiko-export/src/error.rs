//! Error types for export

use thiserror::Error;

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while encoding or writing artifacts
#[derive(Error, Debug)]
pub enum ExportError {
    /// Raster encoding failed
    #[error("Raster encoding failed: {0}")]
    Encode(String),

    /// Typst compilation error
    #[error("Typst compilation failed: {0}")]
    Compilation(String),

    /// Unsupported format or page name
    #[error("Unsupported {kind}: {value}")]
    Unsupported { kind: &'static str, value: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::EncodingError> for ExportError {
    fn from(e: png::EncodingError) -> Self {
        Self::Encode(format!("PNG: {}", e))
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        Self::Encode(format!("JPEG: {}", e))
    }
}
