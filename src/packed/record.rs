//! Record decoding: reading a [`Schema`] out of a byte buffer at an offset.

use std::fmt;

use super::field::Value;
use super::schema::Schema;
use crate::error::DecodeError;

/// What to do when a decoded value falls outside its field's allowed set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Keep the record, attach a [`Diagnostic`] and log a warning.
    #[default]
    Warn,
    /// Fail the decode with [`DecodeError::InvalidFieldValue`].
    Strict,
}

/// A non-fatal validation finding on a decoded record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    /// Schema the record was decoded with
    pub schema: String,
    pub field: String,
    /// Offending value, formatted with [`Value`]'s `Display`
    pub value: String,
    /// Start offset of the record in the source buffer
    pub offset: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {}: field '{}' has invalid value {}",
            self.schema, self.offset, self.field, self.value
        )
    }
}

/// A record decoded from a borrowed buffer.
///
/// The record never copies the buffer: byte-string values and
/// [`Record::as_bytes`] are views into it, so the buffer must outlive the
/// record. `offset + size <= buffer.len()` always holds.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    schema: &'a Schema,
    buffer: &'a [u8],
    offset: usize,
    size: usize,
    values: Vec<Value<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Record<'a> {
    /// Decode `schema` at `offset`, warning on invalid values.
    ///
    /// # Example
    ///
    /// ```
    /// use raspa::packed::{Field, Record, Schema, Value};
    ///
    /// let schema = Schema::builder("StartRow")
    ///     .field(Field::bytes("code", 1).allow(Value::Bytes(b"b")))
    ///     .field(Field::u16_le("n_bytes"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let record = Record::decode(&schema, b"xxb\x03\x00", 2).unwrap();
    /// assert_eq!(record.uint("n_bytes"), Some(3));
    /// assert_eq!(record.size(), 3);
    /// ```
    pub fn decode(schema: &'a Schema, buffer: &'a [u8], offset: usize) -> Result<Self, DecodeError> {
        Self::decode_with(schema, buffer, offset, Validation::default())
    }

    /// Decode `schema` at `offset` under the given validation policy.
    pub fn decode_with(
        schema: &'a Schema,
        buffer: &'a [u8],
        offset: usize,
        validation: Validation,
    ) -> Result<Self, DecodeError> {
        let truncated = || DecodeError::TruncatedRecord {
            offset,
            needed: schema.size(),
            available: buffer.len().saturating_sub(offset),
        };

        let mut values = Vec::with_capacity(schema.fields().len());
        let mut cursor = offset;

        for field in schema.fields() {
            let end = cursor.checked_add(field.size()).ok_or_else(truncated)?;
            let bytes = buffer.get(cursor..end).ok_or_else(truncated)?;
            values.push(field.kind.read(bytes));
            cursor = end;
        }

        let mut diagnostics = Vec::new();
        for (field, value) in schema.fields().iter().zip(&values) {
            if field.accepts(value) {
                continue;
            }

            match validation {
                Validation::Strict => {
                    return Err(DecodeError::InvalidFieldValue {
                        field: field.name.clone(),
                        value: value.to_string(),
                        offset,
                    });
                }
                Validation::Warn => {
                    tracing::warn!(
                        schema = schema.name(),
                        field = %field.name,
                        value = %value,
                        offset,
                        "field has invalid value"
                    );
                    diagnostics.push(Diagnostic {
                        schema: schema.name().to_string(),
                        field: field.name.clone(),
                        value: value.to_string(),
                        offset,
                    });
                }
            }
        }

        Ok(Self {
            schema,
            buffer,
            offset,
            size: cursor - offset,
            values,
            diagnostics,
        })
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// The whole source buffer this record was decoded from.
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Start offset of the record in the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total size of the record in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the first byte after the record.
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// The record's bytes, borrowed from the buffer.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.buffer[self.offset..self.end()]
    }

    /// Decoded values in field order.
    pub fn values(&self) -> &[Value<'a>] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<Value<'a>> {
        self.schema.index_of(name).map(|i| self.values[i])
    }

    pub fn uint(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(|v| v.as_uint())
    }

    pub fn bytes(&self, name: &str) -> Option<&'a [u8]> {
        self.get(name).and_then(|v| v.as_bytes())
    }

    /// Validation findings. Always empty under [`Validation::Strict`].
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Re-encode the decoded values per the schema layout.
    ///
    /// For a record produced by [`Record::decode`] this equals
    /// [`Record::as_bytes`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size);
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            let written = field.kind.write(value, &mut out);
            debug_assert!(written, "value type does not match field '{}'", field.name);
        }
        out
    }
}

impl fmt::Display for Record<'_> {
    /// `StartRow<code=b"b", n_bytes=3>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.schema.name())?;
        for (i, (field, value)) in self.schema.fields().iter().zip(&self.values).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field.name, value)?;
        }
        f.write_str(">")
    }
}
