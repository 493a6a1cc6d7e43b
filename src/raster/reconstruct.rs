//! # Image Reconstruction
//!
//! Splits a stream into image regions at each position-reset sentinel and
//! collects the row payloads inside each region.
//!
//! ## Regions
//!
//! ```text
//! ┌──────────┬─────┬─────┬──────────┬─────┬──────────┬─────┬─────┐
//! │ sentinel │ row │ row │ sentinel │ row │ sentinel │ row │ row │
//! └──────────┴─────┴─────┴──────────┴─────┴──────────┴─────┴─────┘
//!  ◄──────── image 1 ───►◄─── image 2 ──►◄────── image 3 ───────►
//! ```
//!
//! A region runs from the end of its sentinel to the start of the next one
//! (or the end of the buffer). Row commands are searched strictly inside
//! that half-open range, so no row can belong to two images.
//!
//! A row command that runs past the end of the buffer ends its region's row
//! scan. The rows before it are kept and the image records the truncation.

use crate::error::DecodeError;
use crate::packed::{Diagnostic, Validation};
use crate::protocol::{Command, MoveVertPos, StartRow};
use crate::scan::{Bound, Commands, find_commands};

/// Where the row search resumes after a row command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowScan {
    /// One byte after the row command's signature. Signature bytes inside
    /// a payload are read as further row commands.
    #[default]
    Overlapping,
    /// After the row's payload.
    SkipPayload,
}

/// Settings for [`read_images`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstructConfig {
    pub validation: Validation,
    pub row_scan: RowScan,
}

/// One image region: its sentinel and the row slices that follow it.
///
/// Rows borrow from the source buffer, which must outlive the image.
#[derive(Debug, Clone)]
pub struct RasterImage<'a> {
    sentinel: MoveVertPos<'a>,
    rows: Vec<&'a [u8]>,
    diagnostics: Vec<Diagnostic>,
    truncation: Option<DecodeError>,
}

impl<'a> RasterImage<'a> {
    pub fn sentinel(&self) -> &MoveVertPos<'a> {
        &self.sentinel
    }

    /// Row payloads in stream order.
    pub fn rows(&self) -> &[&'a [u8]] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row in bytes.
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// Validation findings from the sentinel and every row command.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The truncated row command that cut this image short, if any.
    pub fn truncation(&self) -> Option<&DecodeError> {
        self.truncation.as_ref()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

/// Lazily reconstruct every image in `buffer`.
///
/// Yields one item per sentinel, in stream order. A sentinel that cannot be
/// decoded, or a row that fails strict validation, yields `Err` and
/// iteration moves on to the next sentinel. A truncated row keeps the image
/// with the rows before it (see [`RasterImage::truncation`]). A buffer
/// without sentinels yields nothing.
///
/// ```
/// use raspa::protocol::commands;
/// use raspa::raster::{ReconstructConfig, read_images};
///
/// let mut stream = commands::move_vert_pos(5);
/// stream.extend(commands::start_row(&[0x07, 0x00, 0x05]));
/// stream.extend(commands::move_vert_pos(5));
/// stream.extend(commands::start_row(&[0x03, 0x01]));
///
/// let images: Vec<_> = read_images(&stream, ReconstructConfig::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(images.len(), 2);
/// assert_eq!(images[0].rows(), &[&[0x07u8, 0x00, 0x05][..]]);
/// assert_eq!(images[1].rows(), &[&[0x03u8, 0x01][..]]);
/// ```
pub fn read_images(buffer: &[u8], config: ReconstructConfig) -> Images<'_> {
    Images {
        buffer,
        config,
        sentinels: find_commands(buffer, Bound::Offset(0), Bound::End, config.validation).peekable(),
    }
}

/// Iterator returned by [`read_images`].
pub struct Images<'a> {
    buffer: &'a [u8],
    config: ReconstructConfig,
    sentinels: std::iter::Peekable<Commands<'a, MoveVertPos<'a>>>,
}

impl<'a> Images<'a> {
    /// Collect the rows between `sentinel` and `end`.
    fn collect_rows(&self, sentinel: MoveVertPos<'a>, end: usize) -> Result<RasterImage<'a>, DecodeError> {
        let mut rows = Vec::new();
        let mut diagnostics = sentinel.record().diagnostics().to_vec();

        let mut commands = find_commands::<StartRow>(
            self.buffer,
            Bound::After(sentinel.record()),
            Bound::Offset(end),
            self.config.validation,
        );

        let mut truncation = None;

        while let Some(command) = commands.next() {
            let row = command.and_then(|command| {
                let payload = command.payload()?;
                Ok((command, payload))
            });

            let (command, payload) = match row {
                Ok(row) => row,
                Err(e @ DecodeError::TruncatedRecord { .. }) => {
                    tracing::warn!(
                        offset = sentinel.offset(),
                        rows = rows.len(),
                        error = %e,
                        "image cut short by truncated row"
                    );
                    truncation = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            };

            if self.config.row_scan == RowScan::SkipPayload {
                commands.resume_at(command.payload_end());
            }

            diagnostics.extend_from_slice(command.record().diagnostics());
            rows.push(payload);
        }

        tracing::debug!(
            offset = sentinel.offset(),
            end,
            rows = rows.len(),
            "reconstructed image region"
        );

        Ok(RasterImage {
            sentinel,
            rows,
            diagnostics,
            truncation,
        })
    }
}

impl<'a> Iterator for Images<'a> {
    type Item = Result<RasterImage<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let sentinel = match self.sentinels.next()? {
            Ok(sentinel) => sentinel,
            Err(e) => return Some(Err(e)),
        };

        let end = match self.sentinels.peek() {
            Some(Ok(next)) => next.offset(),
            Some(Err(e)) => e.offset(),
            None => self.buffer.len(),
        };

        Some(self.collect_rows(sentinel, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands;
    use pretty_assertions::assert_eq;

    fn images(data: &[u8], config: ReconstructConfig) -> Vec<Result<RasterImage<'_>, DecodeError>> {
        read_images(data, config).collect()
    }

    fn rows_of<'a>(image: &RasterImage<'a>) -> Vec<Vec<u8>> {
        image.rows().iter().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn test_no_sentinels() {
        let mut data = commands::start_row(&[0x01, 0x02]);
        data.extend_from_slice(b"plain bytes");
        assert!(images(&data, ReconstructConfig::default()).is_empty());
    }

    #[test]
    fn test_empty_buffer() {
        assert!(images(&[], ReconstructConfig::default()).is_empty());
    }

    #[test]
    fn test_two_images() {
        let mut data = commands::move_vert_pos(5);
        data.extend(commands::start_row(&[0x07, 0x00, 0x05]));
        data.extend(commands::move_vert_pos(5));
        data.extend(commands::start_row(&[0x03, 0x01]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 2);

        let first = result[0].as_ref().unwrap();
        let second = result[1].as_ref().unwrap();
        assert_eq!(rows_of(first), vec![vec![0x07, 0x00, 0x05]]);
        assert_eq!(rows_of(second), vec![vec![0x03, 0x01]]);
        assert_eq!(first.sentinel().offset(), 0);
        assert_eq!(second.sentinel().offset(), 12);
    }

    #[test]
    fn test_sentinel_without_rows() {
        let mut data = commands::move_vert_pos(1);
        data.extend(commands::move_vert_pos(2));
        data.extend(commands::start_row(&[0xF0]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 2);
        assert!(result[0].as_ref().unwrap().is_empty());
        assert_eq!(rows_of(result[1].as_ref().unwrap()), vec![vec![0xF0]]);
    }

    #[test]
    fn test_bytes_before_first_sentinel_ignored() {
        let mut data = commands::start_row(&[0x11]);
        data.extend(commands::move_vert_pos(1));
        data.extend(commands::start_row(&[0x22]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 1);
        assert_eq!(rows_of(result[0].as_ref().unwrap()), vec![vec![0x22]]);
    }

    #[test]
    fn test_regions_are_disjoint() {
        let mut data = Vec::new();
        for n in 0..4u8 {
            data.extend(commands::move_vert_pos(n));
            for r in 0..=n {
                data.extend(commands::start_row(&[n, r]));
            }
        }

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 4);

        let mut seen = Vec::new();
        for (n, image) in result.iter().enumerate() {
            let image = image.as_ref().unwrap();
            assert_eq!(image.rows().len(), n + 1);
            for row in image.rows() {
                assert_eq!(row[0] as usize, n);
                assert!(!seen.contains(&row.as_ptr()));
                seen.push(row.as_ptr());
            }
        }
    }

    #[test]
    fn test_ragged_rows() {
        let mut data = commands::move_vert_pos(3);
        data.extend(commands::start_row(&[0xFF, 0xFF, 0xFF]));
        data.extend(commands::start_row(&[0x80]));
        data.extend(commands::start_row(&[0x01, 0x01]));

        let result = images(&data, ReconstructConfig::default());
        let image = result[0].as_ref().unwrap();
        assert_eq!(
            image.rows().iter().map(|r| r.len()).collect::<Vec<_>>(),
            vec![3, 1, 2]
        );
        assert_eq!(image.max_row_len(), 3);
    }

    #[test]
    fn test_signature_inside_payload_overlapping() {
        // Payload "b\x00\x00" looks like another (empty) row command.
        let mut data = commands::move_vert_pos(1);
        data.extend(commands::start_row(b"b\x00\x00"));

        let result = images(&data, ReconstructConfig::default());
        let image = result[0].as_ref().unwrap();
        assert_eq!(rows_of(image), vec![b"b\x00\x00".to_vec(), vec![]]);
    }

    #[test]
    fn test_signature_inside_payload_skipped() {
        let mut data = commands::move_vert_pos(1);
        data.extend(commands::start_row(b"b\x00\x00"));
        data.extend(commands::start_row(&[0x42]));

        let config = ReconstructConfig {
            row_scan: RowScan::SkipPayload,
            ..Default::default()
        };
        let result = images(&data, config);
        let image = result[0].as_ref().unwrap();
        assert_eq!(rows_of(image), vec![b"b\x00\x00".to_vec(), vec![0x42]]);
    }

    #[test]
    fn test_truncated_payload_ends_region_only() {
        let mut data = commands::move_vert_pos(1);
        data.extend_from_slice(&commands::start_row_header(256));
        data.extend_from_slice(&[0x01, 0x02]);
        let second = data.len();
        data.extend(commands::move_vert_pos(2));
        data.extend(commands::start_row(&[0x0F]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 2);

        let first = result[0].as_ref().unwrap();
        assert!(first.is_empty());
        assert!(matches!(
            first.truncation(),
            Some(DecodeError::TruncatedRecord { offset: 6, .. })
        ));

        let image = result[1].as_ref().unwrap();
        assert_eq!(image.sentinel().offset(), second);
        assert_eq!(rows_of(image), vec![vec![0x0F]]);
        assert!(!image.is_truncated());
    }

    #[test]
    fn test_truncated_payload_keeps_earlier_rows() {
        // 0x62 inside the last row reads as a row declaring 0x7FFF bytes
        let mut data = commands::move_vert_pos(24);
        data.extend(commands::start_row(&[0xFF, 0x00]));
        data.extend(commands::start_row(&[0x81, 0x62, 0xFF, 0x7F, 0x00]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 1);

        let image = result[0].as_ref().unwrap();
        assert_eq!(
            rows_of(image),
            vec![vec![0xFF, 0x00], vec![0x81, 0x62, 0xFF, 0x7F, 0x00]]
        );
        assert_eq!(
            image.truncation(),
            Some(&DecodeError::TruncatedRecord {
                offset: 15,
                needed: 3 + 0x7FFF,
                available: 4
            })
        );
    }

    #[test]
    fn test_truncated_header_keeps_earlier_rows() {
        // 0x62 in the last byte of the buffer starts a row header with no length
        let mut data = commands::move_vert_pos(24);
        data.extend(commands::start_row(&[0xFF, 0x62]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 1);

        let image = result[0].as_ref().unwrap();
        assert_eq!(rows_of(image), vec![vec![0xFF, 0x62]]);
        assert_eq!(
            image.truncation(),
            Some(&DecodeError::TruncatedRecord {
                offset: 10,
                needed: 3,
                available: 1
            })
        );
    }

    #[test]
    fn test_row_signature_inside_sentinel_excluded() {
        // n_dots = 0x62 must not be read as a row command
        let mut data = b"\x1b*rYb\x00".to_vec();
        data.extend(commands::start_row(&[0x01]));

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 1);

        let image = result[0].as_ref().unwrap();
        assert_eq!(image.sentinel().n_dots(), 0x62);
        assert_eq!(rows_of(image), vec![vec![0x01]]);
        assert!(!image.is_truncated());
    }

    #[test]
    fn test_truncated_trailing_sentinel() {
        let mut data = commands::move_vert_pos(1);
        data.extend(commands::start_row(&[0xAA]));
        data.extend_from_slice(b"\x1b*rY\x01");

        let result = images(&data, ReconstructConfig::default());
        assert_eq!(result.len(), 2);
        assert_eq!(rows_of(result[0].as_ref().unwrap()), vec![vec![0xAA]]);
        assert!(matches!(result[1], Err(DecodeError::TruncatedRecord { .. })));
    }

    #[test]
    fn test_invalid_reserved_kept_with_diagnostic() {
        let mut data = b"\x1b*rY\x05\x01".to_vec();
        data.extend(commands::start_row(&[0x01]));

        let result = images(&data, ReconstructConfig::default());
        let image = result[0].as_ref().unwrap();
        assert_eq!(image.diagnostics().len(), 1);
        assert_eq!(image.diagnostics()[0].field, "reserved");
        assert_eq!(rows_of(image), vec![vec![0x01]]);
    }

    #[test]
    fn test_invalid_reserved_strict() {
        let mut data = b"\x1b*rY\x05\x01".to_vec();
        data.extend(commands::start_row(&[0x01]));
        data.extend(commands::move_vert_pos(2));
        data.extend(commands::start_row(&[0x02]));

        let config = ReconstructConfig {
            validation: Validation::Strict,
            ..Default::default()
        };
        let result = images(&data, config);
        assert_eq!(result.len(), 2);
        assert!(matches!(result[0], Err(DecodeError::InvalidFieldValue { .. })));
        assert_eq!(rows_of(result[1].as_ref().unwrap()), vec![vec![0x02]]);
    }
}
