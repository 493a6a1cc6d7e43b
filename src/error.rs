//! # Error Types
//!
//! This module defines error types used throughout the raspa library.
//!
//! | Error | Raised by | Fatal? |
//! |-------|-----------|--------|
//! | [`DecodeError::TruncatedRecord`] | record decoding, row payload reads | for that record; ends an image's row scan |
//! | [`DecodeError::InvalidFieldValue`] | record decoding in strict mode | for that record |
//! | [`SchemaError`] | schema construction | yes |
//! | [`AssembleError::EmptyImage`] | bitmap assembly | no, the image is skipped |
//! | [`RaspaError`] | I/O, encoding, pipeline | yes |

use thiserror::Error;

/// Errors produced while decoding a record from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A field (or a row payload) would extend past the end of the buffer.
    #[error("truncated record at offset {offset}: needs {needed} bytes, {available} available")]
    TruncatedRecord {
        /// Start offset of the record being decoded
        offset: usize,
        /// Bytes required from `offset`
        needed: usize,
        /// Bytes actually present from `offset`
        available: usize,
    },

    /// A decoded value is not in its field's allowed set (strict validation only).
    #[error("field '{field}' at offset {offset} has invalid value {value}")]
    InvalidFieldValue {
        /// Name of the rejected field
        field: String,
        /// Decoded value, formatted for display
        value: String,
        /// Start offset of the record being decoded
        offset: usize,
    },
}

impl DecodeError {
    /// Start offset of the record this error refers to.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::TruncatedRecord { offset, .. } => *offset,
            DecodeError::InvalidFieldValue { offset, .. } => *offset,
        }
    }
}

/// Errors produced when building a [`crate::packed::Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field was declared with an empty name.
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// Two fields share the same name.
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    /// A byte-string field was declared with zero length.
    #[error("field '{0}' has zero length")]
    EmptyField(String),
}

/// Errors produced when assembling a bitmap from image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssembleError {
    /// The image has no rows, or its first row is empty.
    #[error("image has no usable row data")]
    EmptyImage,
}

/// Main error type for raspa operations
#[derive(Debug, Error)]
pub enum RaspaError {
    /// Record decoding failure
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid schema definition
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Invalid configuration or command-line value
    #[error("Config error: {0}")]
    Config(String),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
