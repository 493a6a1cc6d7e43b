//! Schema: an ordered list of fields packed contiguously with no padding.

use std::collections::HashSet;

use super::field::{Field, FieldKind};
use crate::error::SchemaError;

/// A validated record layout. Use [`Schema::builder`] (or [`Schema::new`])
/// to build one, then [`crate::packed::Record::decode`] to read it from bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
    size: usize,
}

impl Schema {
    /// Validate `fields` and build a schema. Field names must be non-empty
    /// and unique, and byte-string fields must have a non-zero length.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, SchemaError> {
        {
            let mut seen = HashSet::with_capacity(fields.len());
            for field in &fields {
                if field.name.is_empty() {
                    return Err(SchemaError::EmptyFieldName);
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField(field.name.clone()));
                }
                if field.kind == FieldKind::Bytes(0) {
                    return Err(SchemaError::EmptyField(field.name.clone()));
                }
            }
        }

        let size = fields.iter().map(Field::size).sum();

        Ok(Self {
            name: name.into(),
            fields,
            size,
        })
    }

    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration (wire) order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Total size of one record in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Position of the field called `name`, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Builder for [`Schema`]. Fields are laid out in the order they are added.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.name, self.fields)
    }
}
