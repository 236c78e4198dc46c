//! Error types for pattern generation

use std::time::Duration;

use sashiko_core::CoreError;
use sashiko_export::ExportError;
use sashiko_render::RenderError;
use thiserror::Error;

/// Coarse classification reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad style, unknown asset key or invalid settings
    Configuration,
    /// Rendering, encoding or I/O failed
    Generation,
    /// Cancelled by the caller or by the time budget
    Cancelled,
}

/// Errors that can occur while generating a pattern
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid style or encoding input
    #[error("Invalid style: {0}")]
    Style(#[from] CoreError),

    /// Rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Settings could not be loaded or are inconsistent
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// Request was cancelled before it finished
    #[error("Generation cancelled")]
    Cancelled,

    /// Request exceeded the pool's time budget
    #[error("Generation exceeded time budget of {0:?}")]
    TimedOut(Duration),

    /// Worker task failed to complete
    #[error("Worker failed: {0}")]
    Worker(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Style(_) | Self::Settings(_) => ErrorKind::Configuration,
            Self::Render(RenderError::UnregisteredTexture(_)) => ErrorKind::Configuration,
            Self::Render(
                RenderError::Core(_)
                | RenderError::EmptyContent(_)
                | RenderError::TooLarge { .. },
            ) => ErrorKind::Configuration,
            Self::Export(ExportError::Unsupported { .. }) => ErrorKind::Configuration,
            Self::Render(_) | Self::Export(_) | Self::Worker(_) => ErrorKind::Generation,
            Self::Cancelled | Self::TimedOut(_) => ErrorKind::Cancelled,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sashiko_core::TextureKey;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EngineError::from(RenderError::UnregisteredTexture(TextureKey::Linen)).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EngineError::from(RenderError::Svg("bad".into())).kind(),
            ErrorKind::Generation
        );
        assert_eq!(
            EngineError::from(ExportError::Io(std::io::Error::other("disk"))).kind(),
            ErrorKind::Generation
        );
        assert_eq!(
            EngineError::from(RenderError::TooLarge {
                cols: 700,
                rows: 700,
                limit: 600
            })
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(EngineError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            EngineError::TimedOut(Duration::from_secs(1)).kind(),
            ErrorKind::Cancelled
        );
        assert_eq!(
            EngineError::from(CoreError::UnknownColor("mauve".into())).kind(),
            ErrorKind::Configuration
        );
    }
}
