//! Field descriptors: the decoding rule for one fixed-size binary field.

use std::fmt;

/// How the bytes of a field are interpreted.
///
/// | Kind | Size | Decoded as |
/// |------|------|------------|
/// | `U8` | 1 | [`Value::UInt`] |
/// | `U16Le` | 2 | [`Value::UInt`], little-endian |
/// | `U32Le` | 4 | [`Value::UInt`], little-endian |
/// | `Bytes(n)` | n | [`Value::Bytes`], borrowed from the buffer |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16Le,
    U32Le,
    Bytes(usize),
}

impl FieldKind {
    /// Size of the field on the wire, in bytes.
    pub const fn size(self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16Le => 2,
            FieldKind::U32Le => 4,
            FieldKind::Bytes(n) => n,
        }
    }

    /// Interpret `bytes` as this kind.
    ///
    /// `bytes` must be exactly [`FieldKind::size`] long; the record decoder
    /// slices it that way before calling.
    pub(crate) fn read(self, bytes: &[u8]) -> Value<'_> {
        debug_assert_eq!(bytes.len(), self.size());
        match self {
            FieldKind::U8 => Value::UInt(u64::from(bytes[0])),
            FieldKind::U16Le => Value::UInt(u64::from(u16::from_le_bytes([bytes[0], bytes[1]]))),
            FieldKind::U32Le => Value::UInt(u64::from(u32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]))),
            FieldKind::Bytes(_) => Value::Bytes(bytes),
        }
    }

    /// Append the wire form of `value` to `out`.
    ///
    /// Integers are truncated to the field width; byte strings are written
    /// as-is. Returns `false` if the value's type does not match the kind.
    pub(crate) fn write(self, value: &Value<'_>, out: &mut Vec<u8>) -> bool {
        match (self, value) {
            (FieldKind::U8, Value::UInt(v)) => out.push(*v as u8),
            (FieldKind::U16Le, Value::UInt(v)) => out.extend_from_slice(&(*v as u16).to_le_bytes()),
            (FieldKind::U32Le, Value::UInt(v)) => out.extend_from_slice(&(*v as u32).to_le_bytes()),
            (FieldKind::Bytes(_), Value::Bytes(b)) => out.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}

/// A decoded field value.
///
/// Byte strings borrow from the source buffer; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value<'a> {
    UInt(u64),
    Bytes(&'a [u8]),
}

impl<'a> Value<'a> {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Value::UInt(_) => None,
            Value::Bytes(b) => Some(b),
        }
    }
}

impl fmt::Display for Value<'_> {
    /// Integers print in decimal, byte strings as `b"..."` with non-printable
    /// bytes escaped (`b"\x1b*rY"`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::UInt(v) => write!(f, "{}", v),
            Value::Bytes(bytes) => {
                f.write_str("b\"")?;
                for &b in *bytes {
                    for c in std::ascii::escape_default(b) {
                        write!(f, "{}", c as char)?;
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// A named field: its [`FieldKind`] plus an optional set of allowed values.
///
/// Built with the constructor for its kind, then narrowed with
/// [`Field::allow`]:
///
/// ```
/// use raspa::packed::{Field, Value};
///
/// let reserved = Field::u8("reserved").allow(Value::UInt(0));
/// assert!(reserved.accepts(&Value::UInt(0)));
/// assert!(!reserved.accepts(&Value::UInt(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used to look the value up in a decoded record.
    pub name: String,
    pub kind: FieldKind,
    /// Accepted values. Empty means any value is accepted.
    pub allowed: Vec<Value<'static>>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            allowed: Vec::new(),
        }
    }

    pub fn u8(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::U8)
    }

    pub fn u16_le(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::U16Le)
    }

    pub fn u32_le(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::U32Le)
    }

    pub fn bytes(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, FieldKind::Bytes(len))
    }

    /// Add `value` to the allowed set.
    pub fn allow(mut self, value: Value<'static>) -> Self {
        self.allowed.push(value);
        self
    }

    /// Size of the field on the wire, in bytes.
    pub fn size(&self) -> usize {
        self.kind.size()
    }

    /// Whether `value` passes this field's allowed-value check.
    pub fn accepts(&self, value: &Value<'_>) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|allowed| allowed == value)
    }
}
