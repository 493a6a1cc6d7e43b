//! # Move Vertical Position (ESC * r Y)
//!
//! The position-reset sentinel. Every image in a stream starts with one, so
//! the offsets of successive sentinels delimit image regions.
//!
//! ```text
//! ┌────┬────┬────┬────┬────────┬──────────┐
//! │ 1B │ 2A │ 72 │ 59 │ n_dots │ reserved │
//! └────┴────┴────┴────┴────────┴──────────┘
//! ```

use std::fmt;
use std::sync::LazyLock;

use super::Command;
use super::command_schema;
use super::commands::MOVE_VERT_POS;
use crate::packed::{Field, Record, Schema, Value};

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    command_schema(
        "MoveVertPos",
        MOVE_VERT_POS,
        vec![
            Field::u8("n_dots"),
            Field::u8("reserved").allow(Value::UInt(0)),
        ],
    )
});

/// A decoded position-reset sentinel.
#[derive(Debug, Clone)]
pub struct MoveVertPos<'a> {
    record: Record<'a>,
}

impl<'a> MoveVertPos<'a> {
    /// Dot count carried by the command.
    pub fn n_dots(&self) -> u8 {
        self.record.uint("n_dots").unwrap_or_default() as u8
    }

    /// Reserved byte; 0 in well-formed streams.
    pub fn reserved(&self) -> u8 {
        self.record.uint("reserved").unwrap_or_default() as u8
    }

    pub fn offset(&self) -> usize {
        self.record.offset()
    }
}

impl<'a> Command<'a> for MoveVertPos<'a> {
    const CODE: &'static [u8] = MOVE_VERT_POS;

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

impl fmt::Display for MoveVertPos<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.record, f)
    }
}
