//! # Raspa - Raster Extraction for Dot-Matrix Printer Streams
//!
//! Raspa recovers the raster images embedded in ESC/P-style printer command
//! streams (print-to-file captures, spooler dumps). It provides:
//!
//! - **Packed records**: declarative field schemas decoded as zero-copy views
//! - **Protocol**: the position-reset sentinel and row data commands
//! - **Scanning**: lazy signature search over half-open byte ranges
//! - **Reconstruction**: image regions, padded 1-bpp bitmaps, BMP/PNG output
//!
//! ## Quick Start
//!
//! ```no_run
//! use raspa::{
//!     extract::{self, ExtractConfig},
//!     raster::ImageEncoder,
//!     source::{DEFAULT_MAX_MAP, InputMap},
//! };
//! use std::path::Path;
//!
//! // Map the capture file
//! let input = InputMap::open("capture.prn", DEFAULT_MAX_MAP)?;
//!
//! // Write every image into a timestamped directory
//! let config = ExtractConfig::default();
//! let out_dir = extract::output_dir(Path::new("out"), true)?;
//! let summary = extract::extract_images(&input, &out_dir, &ImageEncoder::new(config.format), &config)?;
//!
//! println!("wrote {} of {} images", summary.images_written, summary.images_seen);
//!
//! # Ok::<(), raspa::error::RaspaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`packed`] | Field descriptors, schemas and record decoding |
//! | [`protocol`] | Command definitions and byte builders |
//! | [`scan`] | Command scanner |
//! | [`raster`] | Image reconstruction, bitmap assembly and encoding |
//! | [`source`] | Memory-mapped input |
//! | [`extract`] | End-to-end extraction pipeline |
//! | [`error`] | Error types |
//!
//! ## Stream Format
//!
//! Each image starts with `ESC * r Y n 0` and is followed by any number of
//! `b nL nH <payload>` row commands. Everything else in the stream is
//! ignored.

pub mod error;
pub mod extract;
pub mod packed;
pub mod protocol;
pub mod raster;
pub mod scan;
pub mod source;

// Re-exports for convenience
pub use error::{DecodeError, RaspaError};
pub use extract::{ExtractConfig, ExtractSummary, extract_images};
pub use raster::{Bitmap, RasterImage, read_images};
pub use source::InputMap;
