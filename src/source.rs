//! # Input Source
//!
//! Read-only, memory-mapped view of a capture file. Only the first
//! `max_len` bytes are mapped; anything beyond that window is ignored.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

use crate::error::RaspaError;

/// Default mapping window (2 MiB).
pub const DEFAULT_MAX_MAP: usize = 2 * 1024 * 1024;

/// A mapped input file.
#[derive(Debug)]
pub struct InputMap {
    inner: Inner,
    file_len: u64,
}

#[derive(Debug)]
enum Inner {
    Mapped(Mmap),
    // Zero-length mappings are rejected by the OS
    Empty,
}

impl InputMap {
    /// Map the first `max_len` bytes of the file at `path`.
    pub fn open(path: impl AsRef<Path>, max_len: usize) -> Result<Self, RaspaError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let map_len = usize::try_from(file_len).unwrap_or(usize::MAX).min(max_len);

        if file_len > map_len as u64 {
            tracing::warn!(
                path = %path.display(),
                file_len,
                mapped = map_len,
                "input larger than mapping window, tail ignored"
            );
        }

        let inner = if map_len == 0 {
            Inner::Empty
        } else {
            // SAFETY: the mapping is read-only and the file is not modified
            // by this process while the map is alive.
            let map = unsafe { MmapOptions::new().len(map_len).map(&file)? };
            Inner::Mapped(map)
        };

        tracing::debug!(path = %path.display(), file_len, mapped = map_len, "mapped input");

        Ok(Self { inner, file_len })
    }

    /// Length of the underlying file, which may exceed the mapped length.
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Whether the file was cut off by the mapping window.
    pub fn is_truncated(&self) -> bool {
        self.file_len > self.len() as u64
    }
}

impl Deref for InputMap {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.inner {
            Inner::Mapped(map) => map,
            Inner::Empty => &[],
        }
    }
}

impl AsRef<[u8]> for InputMap {
    fn as_ref(&self) -> &[u8] {
        self
    }
}
