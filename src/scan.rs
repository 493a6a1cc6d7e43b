//! # Command Scanner
//!
//! Locates every occurrence of a command's signature in a byte range and
//! decodes a command at each one.
//!
//! ## Search Rule
//!
//! ```text
//! buffer:  .. 62 62 03 00 ..
//!             ▲  ▲
//!             │  └─ second match: search resumes one byte after the first
//!             └──── first match
//! ```
//!
//! Matches may overlap: after a match at `p` the search continues at `p + 1`,
//! never further. A match must *start* before the end bound; its record may
//! extend past it.

use std::marker::PhantomData;

use crate::error::DecodeError;
use crate::packed::{Record, Validation};
use crate::protocol::Command;

/// One end of a scan range.
#[derive(Debug, Clone, Copy)]
pub enum Bound<'r> {
    /// A raw byte offset.
    Offset(usize),
    /// Immediately after a decoded record.
    After(&'r Record<'r>),
    /// Exactly at a decoded record's start.
    At(&'r Record<'r>),
    /// The end of the buffer.
    End,
}

impl Bound<'_> {
    /// Normalize to a byte offset in a buffer of length `len`.
    pub fn resolve(self, len: usize) -> usize {
        match self {
            Bound::Offset(offset) => offset,
            Bound::After(record) => record.end(),
            Bound::At(record) => record.offset(),
            Bound::End => len,
        }
    }
}

impl From<usize> for Bound<'_> {
    fn from(offset: usize) -> Self {
        Bound::Offset(offset)
    }
}

impl<'r> From<Option<usize>> for Bound<'r> {
    /// `None` means "until the end of the buffer".
    fn from(offset: Option<usize>) -> Self {
        offset.map_or(Bound::End, Bound::Offset)
    }
}

/// Find the first occurrence of `needle` starting in `from..end`.
///
/// The occurrence may run past `end` but not past the haystack.
pub fn find_signature(haystack: &[u8], needle: &[u8], from: usize, end: usize) -> Option<usize> {
    if needle.is_empty() || from >= end {
        return None;
    }

    let limit = end.saturating_add(needle.len() - 1).min(haystack.len());
    haystack
        .get(from..limit)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| from + i)
}

/// Lazily decode every `C` whose signature starts in `start..end`.
///
/// ```
/// use raspa::packed::Validation;
/// use raspa::protocol::{StartRow, commands};
/// use raspa::scan::{Bound, find_commands};
///
/// let mut stream = commands::start_row(&[0x01]);
/// stream.extend(commands::start_row(&[0x02, 0x03]));
///
/// let rows: Vec<StartRow> = find_commands(&stream, Bound::Offset(0), Bound::End, Validation::Warn)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(rows.iter().map(|r| r.offset()).collect::<Vec<_>>(), vec![0, 4]);
/// ```
pub fn find_commands<'a, C: Command<'a>>(
    buffer: &'a [u8],
    start: Bound<'_>,
    end: Bound<'_>,
    validation: Validation,
) -> Commands<'a, C> {
    let end = end.resolve(buffer.len()).min(buffer.len());
    Commands {
        buffer,
        position: start.resolve(buffer.len()),
        end,
        validation,
        done: false,
        _command: PhantomData,
    }
}

/// Iterator returned by [`find_commands`].
///
/// Yields `Err` for a command that fails to decode. A truncated command ends
/// the iteration; an invalid value under strict validation does not.
#[derive(Debug)]
pub struct Commands<'a, C> {
    buffer: &'a [u8],
    position: usize,
    end: usize,
    validation: Validation,
    done: bool,
    _command: PhantomData<C>,
}

impl<C> Commands<'_, C> {
    /// Skip ahead: the next search starts no earlier than `offset`.
    pub fn resume_at(&mut self, offset: usize) {
        self.position = self.position.max(offset);
    }

    /// Exclusive end bound of the scan, as a byte offset.
    pub fn end(&self) -> usize {
        self.end
    }
}

impl<'a, C: Command<'a>> Iterator for Commands<'a, C> {
    type Item = Result<C, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(found) = find_signature(self.buffer, C::CODE, self.position, self.end) else {
            self.done = true;
            return None;
        };
        self.position = found + 1;

        match C::decode(self.buffer, found, self.validation) {
            Ok(command) => Some(Ok(command)),
            Err(e @ DecodeError::TruncatedRecord { .. }) => {
                self.done = true;
                Some(Err(e))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
