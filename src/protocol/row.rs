//! # Row Data (b nL nH)
//!
//! One raster row: a 3-byte header declaring the row length, immediately
//! followed by that many bytes of pixel data.
//!
//! ```text
//! ┌────┬────┬────┬──────────────────────┐
//! │ 62 │ nL │ nH │ d1 ... d(nL + nH×256) │
//! └────┴────┴────┴──────────────────────┘
//!  ◄── record ──►◄────── payload ───────►
//! ```

use std::fmt;
use std::sync::LazyLock;

use super::Command;
use super::command_schema;
use super::commands::START_ROW;
use crate::error::DecodeError;
use crate::packed::{Field, Record, Schema};

static SCHEMA: LazyLock<Schema> =
    LazyLock::new(|| command_schema("StartRow", START_ROW, vec![Field::u16_le("n_bytes")]));

/// A decoded row-data command.
#[derive(Debug, Clone)]
pub struct StartRow<'a> {
    record: Record<'a>,
}

impl<'a> StartRow<'a> {
    /// Declared row length in bytes.
    pub fn n_bytes(&self) -> usize {
        self.record.uint("n_bytes").unwrap_or_default() as usize
    }

    pub fn offset(&self) -> usize {
        self.record.offset()
    }

    /// Offset of the first byte after the payload.
    pub fn payload_end(&self) -> usize {
        self.record.end().saturating_add(self.n_bytes())
    }

    /// The row bytes that follow the header, borrowed from the buffer.
    ///
    /// Fails with [`DecodeError::TruncatedRecord`] if the declared length
    /// runs past the end of the buffer.
    pub fn payload(&self) -> Result<&'a [u8], DecodeError> {
        let buffer = self.record.buffer();
        buffer
            .get(self.record.end()..self.payload_end())
            .ok_or(DecodeError::TruncatedRecord {
                offset: self.offset(),
                needed: self.record.size() + self.n_bytes(),
                available: buffer.len() - self.offset(),
            })
    }
}

impl<'a> Command<'a> for StartRow<'a> {
    const CODE: &'static [u8] = START_ROW;

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn from_record(record: Record<'a>) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record<'a> {
        &self.record
    }
}

impl fmt::Display for StartRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.record, f)
    }
}
