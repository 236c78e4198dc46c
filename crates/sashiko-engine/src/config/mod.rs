//! Generator configuration
//!
//! Settings are loaded from `sashiko.toml`; every section and key is optional:
//!
//! ```toml
//! [output]
//! dir = "out/"
//! format = "png"
//! print_document = true
//! page = "a3"
//!
//! [pool]
//! workers = 4
//! timeout_secs = 30
//!
//! [assets]
//! fonts = ["fonts/DejaVuSans.ttf"]
//! system_fonts = false
//!
//! [assets.textures]
//! linen = "textures/linen.png"
//!
//! [style]
//! thread_color = "dark-blue"
//! background = "texture:linen"
//! quality = "high"
//!
//! [encoding]
//! codebook = "standard"
//! ```

mod settings;


pub use settings::{AssetSettings, EncodingSettings, OutputSettings, PoolSettings, Settings};
