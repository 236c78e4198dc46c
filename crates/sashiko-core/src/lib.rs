//! # sashiko-core
//!
//! Pure building blocks of the sashiko pattern pipeline:
//!
//! 1. **Codebook** - maps characters to fixed-width binary codes
//! 2. **Encoder** - turns a string into a [`BitString`]
//! 3. **Matrix** - turns two bit strings into a [`StitchMatrix`]
//! 4. **Style** - the [`RenderStyle`] value read by the renderer
//!
//! Nothing here performs I/O.
//!
//! ## Example
//!
//! ```
//! use sashiko_core::{encode_or_default, Codebook, StitchMatrix};
//!
//! let book = Codebook::latin();
//! let bits_h = encode_or_default("A", book);
//! let bits_v = encode_or_default("A", book);
//! assert_eq!(bits_h.as_str(), "00001");
//!
//! let matrix = StitchMatrix::build(&bits_h, &bits_v)?;
//! assert_eq!(matrix.dimensions(), (5, 5));
//! # Ok::<(), sashiko_core::CoreError>(())
//! ```

pub mod codebook;
pub mod color;
pub mod encoder;
pub mod error;
pub mod label;
pub mod matrix;
pub mod style;

pub use codebook::{Codebook, CodebookPolicy, RestrictedTable, UNIVERSAL_WIDTH};
pub use color::{Fabric, Rgb, Thread, ThreadColor};
pub use encoder::{encode, encode_or_default, BitString, DEFAULT_BITS};
pub use error::{CoreError, Result};
pub use label::{caption, distinct_texts, same_text, LABEL_SEPARATOR};
pub use matrix::{alternating, build_horizontal, build_vertical, StitchMatrix};
pub use style::{
    Background, Frame, Grain, PatternKind, Quality, QualityProfile, RenderStyle,
    TextOrientation, TextureKey,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
