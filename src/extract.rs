//! # Extraction Pipeline
//!
//! Drives every image in a stream through reconstruction, assembly and
//! encoding, and reports what happened.
//!
//! ```text
//! for each sentinel (index 1, 2, ...):
//!   Err(DecodeError)          ──► fault   (logged, or abort under FailFast)
//!   Ok(image), truncated      ──► fault   (rows kept, or abort under FailFast)
//!   Ok(image) ─► assemble
//!       Err(EmptyImage)       ──► skipped (logged)
//!       Ok(bitmap) ─► encode  ──► <out_dir>/<index>.<ext>
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AssembleError, RaspaError};
use crate::packed::{Diagnostic, Validation};
use crate::raster::{Bitmap, BitmapEncoder, OutputFormat, ReconstructConfig, RowScan, read_images};

// ============================================================================
// Configuration
// ============================================================================

/// What to do when an image region fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the fault and continue with the next image.
    #[default]
    BestEffort,
    /// Abort the run with the first decode error.
    FailFast,
}

/// Settings for a full extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractConfig {
    pub validation: Validation,
    pub policy: ErrorPolicy,
    pub row_scan: RowScan,
    pub format: OutputFormat,
}

impl ExtractConfig {
    /// The reconstruction subset of this config.
    pub fn reconstruct(&self) -> ReconstructConfig {
        ReconstructConfig {
            validation: self.validation,
            row_scan: self.row_scan,
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Outcome of [`extract_images`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    /// Sentinels found, including faulty and skipped images
    pub images_seen: usize,
    pub images_written: usize,
    /// Images with no usable row data
    pub images_skipped: usize,
    /// Regions that failed to decode or were cut short by a truncated row
    pub faults: usize,
    /// Validation findings across all decoded images
    pub diagnostics: usize,
    /// Written files, in image order
    pub outputs: Vec<PathBuf>,
}

/// Extract every image in `buffer` into `out_dir`.
///
/// Images are written as `<index>.<ext>` where `index` counts every sentinel
/// from 1, so skipped or faulty images leave gaps in the numbering.
pub fn extract_images(
    buffer: &[u8],
    out_dir: &Path,
    encoder: &impl BitmapEncoder,
    config: &ExtractConfig,
) -> Result<ExtractSummary, RaspaError> {
    let mut summary = ExtractSummary::default();

    for result in read_images(buffer, config.reconstruct()) {
        summary.images_seen += 1;
        let index = summary.images_seen;

        let image = match result {
            Ok(image) => image,
            Err(e) if config.policy == ErrorPolicy::FailFast => return Err(e.into()),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping faulty image region");
                summary.faults += 1;
                continue;
            }
        };

        summary.diagnostics += image.diagnostics().len();

        if let Some(e) = image.truncation() {
            if config.policy == ErrorPolicy::FailFast {
                return Err(e.clone().into());
            }
            tracing::warn!(
                index,
                rows = image.rows().len(),
                error = %e,
                "image truncated, keeping rows read so far"
            );
            summary.faults += 1;
        }

        let bitmap = match Bitmap::assemble(&image) {
            Ok(bitmap) => bitmap,
            Err(AssembleError::EmptyImage) => {
                tracing::warn!(
                    index,
                    offset = image.sentinel().offset(),
                    rows = image.rows().len(),
                    "skipping image without row data"
                );
                summary.images_skipped += 1;
                continue;
            }
        };

        let path = out_dir.join(format!("{}.{}", index, encoder.extension()));
        encoder.encode(&bitmap, &path)?;

        tracing::info!(
            index,
            path = %path.display(),
            width = bitmap.width(),
            height = bitmap.height(),
            "wrote image"
        );

        summary.images_written += 1;
        summary.outputs.push(path);
    }

    Ok(summary)
}

/// Resolve and create the output directory.
///
/// With `timestamp`, images go into a `<unix-seconds>` subdirectory of `base`.
pub fn output_dir(base: &Path, timestamp: bool) -> Result<PathBuf, RaspaError> {
    let dir = if timestamp {
        base.join(chrono::Utc::now().timestamp().to_string())
    } else {
        base.to_path_buf()
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

// ============================================================================
// Survey
// ============================================================================

/// One line of a `scan` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    /// 1-based image index
    pub index: usize,
    /// Sentinel offset, absent for regions that failed to decode
    pub offset: Option<usize>,
    pub n_dots: Option<u8>,
    pub rows: usize,
    pub max_row_len: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Truncated row command that ended the region early
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Describe every image region in `buffer` without writing anything.
pub fn survey(buffer: &[u8], config: ReconstructConfig) -> Vec<RegionReport> {
    read_images(buffer, config)
        .enumerate()
        .map(|(i, result)| match result {
            Ok(image) => RegionReport {
                index: i + 1,
                offset: Some(image.sentinel().offset()),
                n_dots: Some(image.sentinel().n_dots()),
                rows: image.rows().len(),
                max_row_len: image.max_row_len(),
                diagnostics: image.diagnostics().to_vec(),
                truncated: image.truncation().map(ToString::to_string),
                error: None,
            },
            Err(e) => RegionReport {
                index: i + 1,
                offset: None,
                n_dots: None,
                rows: 0,
                max_row_len: 0,
                diagnostics: Vec::new(),
                truncated: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

impl std::fmt::Display for RegionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.error, self.offset, self.n_dots) {
            (Some(error), _, _) => write!(f, "#{:<4} error: {}", self.index, error),
            (None, Some(offset), Some(n_dots)) => {
                write!(
                    f,
                    "#{:<4} offset {:>8}  n_dots {:>3}  rows {:>5}  width {:>5} B  diagnostics {}",
                    self.index,
                    offset,
                    n_dots,
                    self.rows,
                    self.max_row_len,
                    self.diagnostics.len()
                )?;
                if self.truncated.is_some() {
                    f.write_str("  (truncated)")?;
                }
                Ok(())
            }
            _ => write!(f, "#{:<4} (no sentinel)", self.index),
        }
    }
}
