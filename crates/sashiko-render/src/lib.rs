//! # sashiko-render
//!
//! Draws [`StitchMatrix`](sashiko_core::StitchMatrix) grids and stacked
//! lettering onto a raster [`Canvas`] using tiny-skia, with text laid out
//! by usvg/resvg.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sashiko_core::{encode_or_default, Codebook, RenderStyle, StitchMatrix};
//! use sashiko_render::{AssetRegistry, StitchRenderer};
//!
//! let assets = AssetRegistry::builder().system_fonts(true).build();
//! let renderer = StitchRenderer::new(Arc::new(assets));
//!
//! let book = Codebook::standard();
//! let bits = encode_or_default("Сашіко", book);
//! let matrix = StitchMatrix::build(&bits, &bits)?;
//! let canvas = renderer.render(&matrix, &RenderStyle::default(), Some("САШІКО"))?;
//! println!("{}x{} @ {} dpi", canvas.width(), canvas.height(), canvas.dpi());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assets;
pub mod canvas;
pub mod error;
pub mod grain;
pub mod renderer;
pub mod text;

pub use assets::{AssetRegistry, AssetRegistryBuilder, TextureSlot, NEUTRAL_FILL};
pub use canvas::{Canvas, Layout, LABEL_BAND_CELLS, MARGIN_CELLS};
pub use error::{RenderError, Result};
pub use grain::apply_grain;
pub use renderer::{stitch_segments, StitchRenderer};
