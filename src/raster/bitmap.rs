//! # Bitmap Assembly
//!
//! Packs the ragged rows of a [`RasterImage`] into a dense, rectangular
//! 1-bit bitmap.
//!
//! ## Bit Packing
//!
//! Each byte holds 8 horizontal pixels:
//! - Bit 7 (MSB) = leftmost pixel
//! - 1 = black, 0 = white
//!
//! Rows shorter than the widest row are zero-padded (white) on the right:
//!
//! ```text
//! rows          bitmap (3 bytes wide)
//! FF FF FF  ──► FF FF FF
//! 80        ──► 80 00 00
//! 01 01     ──► 01 01 00
//! ```

use super::reconstruct::RasterImage;
use crate::error::AssembleError;

/// A packed 1-bit-per-pixel bitmap, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels (always a multiple of 8)
    width: usize,
    /// Height in pixels
    height: usize,
    /// Packed pixel data, `width / 8` bytes per row
    data: Vec<u8>,
}

impl Bitmap {
    /// Assemble the rows of `image`.
    ///
    /// Fails with [`AssembleError::EmptyImage`] if the image has no rows or
    /// its first row is empty.
    pub fn assemble(image: &RasterImage<'_>) -> Result<Self, AssembleError> {
        Self::from_rows(image.rows())
    }

    /// Assemble a bitmap from raw rows.
    ///
    /// ```
    /// use raspa::raster::Bitmap;
    ///
    /// let rows: [&[u8]; 3] = [&[0xFF, 0xFF, 0xFF], &[0x80], &[0x01, 0x01]];
    /// let bitmap = Bitmap::from_rows(&rows).unwrap();
    ///
    /// assert_eq!((bitmap.width(), bitmap.height()), (24, 3));
    /// assert_eq!(bitmap.row(1), &[0x80, 0x00, 0x00]);
    /// ```
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, AssembleError> {
        match rows.first() {
            Some(first) if !first.as_ref().is_empty() => {}
            _ => return Err(AssembleError::EmptyImage),
        }

        let width_bytes = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        let height = rows.len();
        let mut data = vec![0u8; width_bytes * height];

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let start = y * width_bytes;
            data[start..start + row.len()].copy_from_slice(row);
        }

        Ok(Self {
            width: width_bytes * 8,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn width_bytes(&self) -> usize {
        self.width / 8
    }

    /// Packed pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Packed bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width_bytes();
        &self.data[start..start + self.width_bytes()]
    }

    /// Whether the pixel at (`x`, `y`) is black. Out-of-range pixels are white.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }

        let byte_idx = y * self.width_bytes() + x / 8;
        let bit_idx = 7 - (x % 8);
        (self.data[byte_idx] >> bit_idx) & 1 == 1
    }
}
