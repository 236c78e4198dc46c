//! Error types for rendering

use sashiko_core::{CoreError, TextureKey};
use thiserror::Error;

/// Errors that can occur while rendering a pattern
#[derive(Error, Debug)]
pub enum RenderError {
    /// Style references a texture that was never declared in the registry
    #[error("Texture not registered: {0}")]
    UnregisteredTexture(TextureKey),

    /// Canvas could not be allocated
    #[error("Failed to create canvas ({width}x{height})")]
    Canvas { width: u32, height: u32 },

    /// Pattern has more cells than the canvas size limit allows
    #[error("Pattern too large: {cols}x{rows} cells, at most {limit} per side")]
    TooLarge { cols: u32, rows: u32, limit: u32 },

    /// Overlay markup could not be parsed
    #[error("SVG overlay failed: {0}")]
    Svg(String),

    /// Stacked layout was given no text
    #[error("Nothing to render: {0}")]
    EmptyContent(String),

    /// Invalid core input
    #[error(transparent)]
    Core(#[from] CoreError),

    /// I/O error while loading an asset
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
