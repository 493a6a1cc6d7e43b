//! # Packed Records
//!
//! Declarative descriptions of fixed-layout binary records and a decoder that
//! reads them from any offset in a byte buffer.
//!
//! ## Layout
//!
//! Fields are packed contiguously, in declaration order, with no padding:
//!
//! ```text
//! offset ──►┌──────────────┬─────────┬──────────┐
//!           │ code (bytes) │ n_dots  │ reserved │
//!           │   4 bytes    │ 1 byte  │  1 byte  │
//!           └──────────────┴─────────┴──────────┘
//!           ◄──────────── schema.size() ────────►
//! ```
//!
//! Multi-byte integers are little-endian.
//!
//! ## Modules
//!
//! - [`field`]: Field kinds, values and allowed-value sets
//! - [`schema`]: Ordered, validated field lists
//! - [`record`]: Decoding, validation and re-encoding

pub mod field;
pub mod record;
pub mod schema;

pub use field::{Field, FieldKind, Value};
pub use record::{Diagnostic, Record, Validation};
pub use schema::{Schema, SchemaBuilder};
