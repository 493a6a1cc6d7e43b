//! # Bitmap Encoding
//!
//! Writes assembled bitmaps as grayscale image files.
//!
//! | Bit | Pixel | Luma |
//! |-----|-------|------|
//! | 1   | black | 0    |
//! | 0   | white | 255  |

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::{ExtendedColorType, GrayImage, ImageEncoder as _, Luma};

use super::bitmap::Bitmap;
use crate::error::RaspaError;

/// Image container written for each bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Bmp,
    Png,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "bmp",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = RaspaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bmp" => Ok(OutputFormat::Bmp),
            "png" => Ok(OutputFormat::Png),
            other => Err(RaspaError::Config(format!(
                "unknown output format '{}' (expected bmp or png)",
                other
            ))),
        }
    }
}

/// Persists a [`Bitmap`] to a file.
pub trait BitmapEncoder {
    /// Extension of the files this encoder writes.
    fn extension(&self) -> &str;

    /// Write `bitmap` to `path`.
    fn encode(&self, bitmap: &Bitmap, path: &Path) -> Result<(), RaspaError>;
}

/// Encoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageEncoder {
    pub format: OutputFormat,
}

impl ImageEncoder {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Encode `bitmap` into an in-memory file.
    pub fn encode_to_vec(&self, bitmap: &Bitmap) -> Result<Vec<u8>, RaspaError> {
        let img = to_gray(bitmap);
        let (width, height) = img.dimensions();
        let mut bytes = Vec::new();

        let result = match self.format {
            OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut bytes).write_image(
                img.as_raw(),
                width,
                height,
                ExtendedColorType::L8,
            ),
            OutputFormat::Bmp => image::codecs::bmp::BmpEncoder::new(&mut bytes).write_image(
                img.as_raw(),
                width,
                height,
                ExtendedColorType::L8,
            ),
        };
        result.map_err(|e: image::ImageError| RaspaError::Image(e.to_string()))?;

        Ok(bytes)
    }
}

impl BitmapEncoder for ImageEncoder {
    fn extension(&self) -> &str {
        self.format.extension()
    }

    fn encode(&self, bitmap: &Bitmap, path: &Path) -> Result<(), RaspaError> {
        let bytes = self.encode_to_vec(bitmap)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Expand a packed bitmap into one luma byte per pixel.
pub fn to_gray(bitmap: &Bitmap) -> GrayImage {
    let mut img = GrayImage::new(bitmap.width() as u32, bitmap.height() as u32);

    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let color = if bitmap.pixel(x, y) { 0u8 } else { 255u8 };
            img.put_pixel(x as u32, y as u32, Luma([color]));
        }
    }

    img
}
