//! sashiko-engine - end-to-end pattern generation
//!
//! Ties encoding, rendering and export together behind [`StitchEngine`] and
//! runs requests on a bounded [`RenderPool`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sashiko_engine::{CancelToken, PatternRequest, RenderPool, Settings, StitchEngine};
//!
//! let settings = Settings::load("sashiko.toml")?;
//! let engine = Arc::new(StitchEngine::from_settings(&settings)?);
//! let pool = RenderPool::from_settings(engine, &settings);
//!
//! let request = PatternRequest::new("love", "kyiv", settings.style.clone());
//! let artifact = pool
//!     .generate_to_dir(request, settings.output.dir.clone(), CancelToken::new())
//!     .await?;
//! ```

pub mod config;
mod engine;
mod error;
mod pool;

pub use config::Settings;
pub use engine::{
    CancelToken, PatternArtifact, PatternRequest, RenderedPattern, StitchEngine,
};
pub use error::{EngineError, ErrorKind, Result};
pub use pool::RenderPool;
