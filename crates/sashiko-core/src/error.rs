//! Error types for encoding and style resolution

use thiserror::Error;

/// Errors that can occur while building codebooks or resolving styles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Colour value is neither a known swatch nor a hex colour
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    /// Fabric name is not recognised
    #[error("Unknown fabric: {0}")]
    UnknownFabric(String),

    /// Texture key is not recognised
    #[error("Unknown texture: {0}")]
    UnknownTexture(String),

    /// A style enum value (quality, frame, orientation, ...) is not recognised
    #[error("Invalid {field}: {value}")]
    InvalidStyle { field: &'static str, value: String },

    /// Codebook policy name is not recognised
    #[error("Unknown codebook: {0}")]
    UnknownCodebook(String),

    /// Restricted alphabet is unusable
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// A bit string contained something other than '0' and '1'
    #[error("Invalid bit string: {0}")]
    InvalidBits(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
