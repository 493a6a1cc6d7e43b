//! # Printer Command Protocol
//!
//! The subset of the dot-matrix printer protocol raspa decodes: a
//! position-reset sentinel that starts every image and a row-data command
//! that carries one raster row.
//!
//! ## Module Structure
//!
//! - [`commands`]: Signature constants and byte builders
//! - [`vertical`]: [`MoveVertPos`], the image sentinel
//! - [`row`]: [`StartRow`], one raster row
//!
//! ## Wire Layout
//!
//! | Command | Signature | Fields after signature |
//! |---------|-----------|------------------------|
//! | `MoveVertPos` | `1B 2A 72 59` | `n_dots` u8, `reserved` u8 (= 0) |
//! | `StartRow` | `62` | `n_bytes` u16 LE, then `n_bytes` of row data |

pub mod commands;
pub mod row;
pub mod vertical;

pub use row::StartRow;
pub use vertical::MoveVertPos;

use crate::error::DecodeError;
use crate::packed::{Field, Record, Schema, Validation, Value};

/// A record type located in a stream by its fixed signature.
///
/// Every command's schema starts with a `code` field whose only allowed
/// value is [`Command::CODE`]; build schemas with [`command_schema`] to get
/// that for free.
pub trait Command<'a>: Sized {
    /// Signature bytes identifying this command.
    const CODE: &'static [u8];

    /// Layout of the command, starting with the `code` field.
    fn schema() -> &'static Schema;

    fn from_record(record: Record<'a>) -> Self;

    fn record(&self) -> &Record<'a>;

    /// Decode a command at `offset`.
    fn decode(buffer: &'a [u8], offset: usize, validation: Validation) -> Result<Self, DecodeError> {
        Record::decode_with(Self::schema(), buffer, offset, validation).map(Self::from_record)
    }
}

/// Build a command schema: a `code` field bound to `code`, then `fields`.
///
/// Panics if the resulting schema is invalid; command layouts are static.
pub fn command_schema(name: &str, code: &'static [u8], fields: Vec<Field>) -> Schema {
    let mut builder =
        Schema::builder(name).field(Field::bytes("code", code.len()).allow(Value::Bytes(code)));
    for field in fields {
        builder = builder.field(field);
    }
    builder
        .build()
        .unwrap_or_else(|e| panic!("invalid {} schema: {}", name, e))
}
