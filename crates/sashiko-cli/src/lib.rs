//! sashiko CLI - Command-line interface library
//!
//! - Generate: render a pattern to PNG/JPEG and optionally a PDF
//! - Encode: show the bit string for a text
//! - Scheme: print a text preview of the stitch matrix
//!
//! # Binary Usage
//!
//! ```bash
//! # Poster with label, written to ./out
//! sashiko generate love kyiv --thread gold --output out/
//!
//! # Black-on-white scheme with a print document
//! sashiko generate HELLO --kind scheme --print --page a4
//!
//! # Bits and preview
//! sashiko encode SASHIKO --codebook latin
//! sashiko scheme A --codebook latin
//! ```

mod app;

pub use app::{
    encode_command, generate_command, run_cli, run_cli_from, scheme_command, GenerateOptions,
    ReportFormat,
};
