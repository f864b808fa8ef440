//! Shared memory maps
//!
//! A [`FileMapping`] covers the first `len` bytes of an open file and is
//! shared with it: writes through a writable mapping reach the file, and
//! other processes mapping the same file observe them. The mapping is
//! released when the value is dropped or passed to [`FileMapping::unmap`].
//!
//! ```no_run
//! use solidc_system::{FileHandle, OpenMode};
//!
//! let mut file = FileHandle::open("table.bin", OpenMode::parse("r+")?)?;
//! let mut map = file.mmap(4096, true, true)?;
//! if let Some(bytes) = map.as_mut_slice() {
//!     bytes[0] = 0xFF;
//! }
//! map.flush()?;
//! # Ok::<(), solidc_system::FileError>(())
//! ```

use std::fs::File;
use std::ops::Deref;

use memmap2::{Mmap, MmapMut, MmapOptions};
use tracing::debug;

use crate::{FileError, FileResult};

/// A memory-mapped view of a file prefix.
#[derive(Debug)]
pub enum FileMapping {
    /// Mapped read-only.
    ReadOnly(Mmap),
    /// Mapped for reading and writing.
    ReadWrite(MmapMut),
}

impl FileMapping {
    /// Map `len` bytes of `file` from offset 0.
    ///
    /// `write` requests a writable mapping; there is no write-only
    /// protection, so a writable mapping is always readable too.
    pub(crate) fn map(file: &File, len: usize, write: bool) -> FileResult<Self> {
        let mut options = MmapOptions::new();
        options.len(len);
        // SAFETY: the mapping is shared with the file. Another process
        // truncating the file while mapped is undefined, the same contract
        // as mmap(2) with MAP_SHARED.
        let mapping = unsafe {
            if write {
                options.map_mut(file).map(FileMapping::ReadWrite)
            } else {
                options.map(file).map(FileMapping::ReadOnly)
            }
        };
        mapping.map_err(FileError::MemoryFailed)
    }

    /// Mapped bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            FileMapping::ReadOnly(m) => m,
            FileMapping::ReadWrite(m) => m,
        }
    }

    /// Mapped bytes, if the mapping is writable.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            FileMapping::ReadOnly(_) => None,
            FileMapping::ReadWrite(m) => Some(m),
        }
    }

    /// True if writes are allowed.
    pub fn is_writable(&self) -> bool {
        matches!(self, FileMapping::ReadWrite(_))
    }

    /// Length of the mapping in bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True if the mapping is zero bytes long.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write dirty pages back to the file. A no-op on read-only mappings.
    pub fn flush(&self) -> FileResult<()> {
        match self {
            FileMapping::ReadOnly(_) => Ok(()),
            FileMapping::ReadWrite(m) => m.flush().map_err(FileError::MemoryFailed),
        }
    }

    /// Release the mapping, flushing a writable one first.
    pub fn unmap(self) -> FileResult<()> {
        let len = self.len();
        self.flush()?;
        drop(self);
        debug!(len, "unmapped file");
        Ok(())
    }
}

impl Deref for FileMapping {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for FileMapping {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
