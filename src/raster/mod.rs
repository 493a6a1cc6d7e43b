//! # Raster Images
//!
//! Turns a decoded command stream into image files in three stages:
//!
//! ```text
//! bytes ──► read_images ──► RasterImage ──► Bitmap::assemble ──► Bitmap ──► BitmapEncoder
//!           (regions)       (ragged rows)   (padding)            (packed)   (BMP / PNG)
//! ```

pub mod bitmap;
pub mod encode;
pub mod reconstruct;

pub use bitmap::Bitmap;
pub use encode::{BitmapEncoder, ImageEncoder, OutputFormat};
pub use reconstruct::{Images, RasterImage, ReconstructConfig, RowScan, read_images};
