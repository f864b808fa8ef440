//! File handles
//!
//! A [`FileHandle`] pairs a buffered stream with the underlying OS file so
//! that buffered reads and writes, positional I/O, advisory locking and
//! memory mapping all work on one open file.
//!
//! # Overview
//!
//! - [`FileHandle::read`]/[`FileHandle::write`] go through the stream buffer
//!   and move the stream position. Writes are not flushed until
//!   [`FileHandle::flush`], [`FileHandle::close`] or drop.
//! - [`FileHandle::pread`]/[`FileHandle::pwrite`] address an absolute offset
//!   and leave the stream position where it was.
//! - [`FileHandle::lock`] takes a non-blocking, whole-file advisory lock that
//!   [`FileHandle::close`] releases.
//!
//! # Example
//!
//! ```no_run
//! use solidc_system::{FileHandle, OpenMode};
//!
//! let mut file = FileHandle::open("records.dat", OpenMode::parse("w+")?)?;
//! file.write(b"header")?;
//! file.pwrite(b"trailer", 100)?;
//! assert_eq!(file.tell()?, 6);
//!
//! let mut buf = [0u8; 7];
//! file.pread(&mut buf, 100)?;
//! assert_eq!(&buf, b"trailer");
//! file.close()?;
//! # Ok::<(), solidc_system::FileError>(())
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::lock;
use crate::mmap::FileMapping;
use crate::{FileError, FileResult};

// ============================================================
// Open Modes
// ============================================================

/// What an open file may be used for, as in the `fopen` mode letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// `r`: read an existing file.
    Read,
    /// `w`: write, creating or truncating.
    Write,
    /// `a`: append, creating if missing.
    Append,
    /// `r+`: read and write an existing file.
    ReadUpdate,
    /// `w+`: read and write, creating or truncating.
    WriteUpdate,
    /// `a+`: read anywhere, append at the end, creating if missing.
    AppendUpdate,
}

/// How to open a file. Usually parsed from an `fopen`-style string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenMode {
    access: Access,
    exclusive: bool,
}

impl OpenMode {
    /// `"r"`
    pub const READ: OpenMode = OpenMode::new(Access::Read);
    /// `"w"`
    pub const WRITE: OpenMode = OpenMode::new(Access::Write);
    /// `"a"`
    pub const APPEND: OpenMode = OpenMode::new(Access::Append);
    /// `"r+"`
    pub const READ_UPDATE: OpenMode = OpenMode::new(Access::ReadUpdate);
    /// `"w+"`
    pub const WRITE_UPDATE: OpenMode = OpenMode::new(Access::WriteUpdate);
    /// `"a+"`
    pub const APPEND_UPDATE: OpenMode = OpenMode::new(Access::AppendUpdate);

    /// Mode with the given access and no exclusive-create flag.
    pub const fn new(access: Access) -> Self {
        Self {
            access,
            exclusive: false,
        }
    }

    /// Parse an `fopen` mode: `r`, `w` or `a`, then any of `+`, `b` and
    /// `x` at most once each. `b` is accepted and ignored; `x` (fail if the
    /// file exists) is only valid with `w`.
    pub fn parse(mode: &str) -> FileResult<Self> {
        let mut chars = mode.chars();
        let base = chars.next();
        let (mut update, mut binary, mut exclusive) = (false, false, false);
        for c in chars {
            let flag = match c {
                '+' => &mut update,
                'b' => &mut binary,
                'x' => &mut exclusive,
                _ => return Err(FileError::invalid("unrecognised open mode")),
            };
            if *flag {
                return Err(FileError::invalid("repeated open mode flag"));
            }
            *flag = true;
        }

        let access = match (base, update) {
            (Some('r'), false) => Access::Read,
            (Some('r'), true) => Access::ReadUpdate,
            (Some('w'), false) => Access::Write,
            (Some('w'), true) => Access::WriteUpdate,
            (Some('a'), false) => Access::Append,
            (Some('a'), true) => Access::AppendUpdate,
            _ => return Err(FileError::invalid("unrecognised open mode")),
        };
        if exclusive && !matches!(access, Access::Write | Access::WriteUpdate) {
            return Err(FileError::invalid("exclusive create needs a 'w' mode"));
        }
        Ok(Self { access, exclusive })
    }

    /// The access letters.
    pub fn access(&self) -> Access {
        self.access
    }

    /// True if opening fails when the file already exists.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// True if the mode permits reads.
    pub fn readable(&self) -> bool {
        !matches!(self.access, Access::Write | Access::Append)
    }

    /// True if the mode permits writes.
    pub fn writable(&self) -> bool {
        !matches!(self.access, Access::Read)
    }

    fn options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self.access {
            Access::Read => options.read(true),
            Access::Write => options.write(true).create(true).truncate(true),
            Access::Append => options.append(true).create(true),
            Access::ReadUpdate => options.read(true).write(true),
            Access::WriteUpdate => options.read(true).write(true).create(true).truncate(true),
            Access::AppendUpdate => options.read(true).append(true).create(true),
        };
        if self.exclusive {
            options.create_new(true);
        }
        options
    }
}

impl FromStr for OpenMode {
    type Err = FileError;

    fn from_str(s: &str) -> FileResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = match self.access {
            Access::Read => "r",
            Access::Write => "w",
            Access::Append => "a",
            Access::ReadUpdate => "r+",
            Access::WriteUpdate => "w+",
            Access::AppendUpdate => "a+",
        };
        f.write_str(letters)?;
        if self.exclusive {
            f.write_str("x")?;
        }
        Ok(())
    }
}

// ============================================================
// File Handle
// ============================================================

/// The buffered side of a handle. Only one direction is buffered at a
/// time; switching flushes or discards the other.
enum Stream {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
}

impl Stream {
    fn file(&self) -> &File {
        match self {
            Stream::Reader(r) => r.get_ref(),
            Stream::Writer(w) => w.get_ref(),
        }
    }

    /// Unwrap to the file, dropping unread input. Unflushed output is
    /// discarded if flushing fails, and the failure is returned with the file.
    fn into_file(self) -> (File, Option<io::Error>) {
        match self {
            Stream::Reader(r) => (r.into_inner(), None),
            Stream::Writer(w) => match w.into_inner() {
                Ok(file) => (file, None),
                Err(err) => {
                    let (err, w) = err.into_parts();
                    let (file, _) = w.into_parts();
                    (file, Some(err))
                }
            },
        }
    }
}

/// An open file with a buffered stream, positional I/O, locking and mmap.
///
/// The handle is not synchronised; share it across threads only behind
/// external locking. Dropping an open handle closes it.
pub struct FileHandle {
    stream: Option<Stream>,
    path: PathBuf,
    mode: OpenMode,
    locked: bool,
    cached_size: u64,
}

impl FileHandle {
    /// Open `path` with `mode`.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> FileResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FileError::invalid("empty path"));
        }
        let file = mode
            .options()
            .open(path)
            .map_err(|e| FileError::open_failed(path, e))?;
        let cached_size = file.metadata().map_err(FileError::SystemError)?.len();
        let stream = if mode.readable() {
            Stream::Reader(BufReader::new(file))
        } else {
            Stream::Writer(BufWriter::new(file))
        };
        debug!(path = %path.display(), %mode, size = cached_size, "opened file");
        Ok(Self {
            stream: Some(stream),
            path: path.to_path_buf(),
            mode,
            locked: false,
            cached_size,
        })
    }

    /// Flush, release any lock and close the file.
    ///
    /// The handle is closed even when this fails; the first failure is
    /// returned. Closing an already closed handle is a no-op.
    pub fn close(&mut self) -> FileResult<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        let (file, flush_err) = stream.into_file();
        let mut result = Ok(());
        if let Some(err) = flush_err {
            warn!(path = %self.path.display(), error = %err, "flush failed while closing");
            result = Err(FileError::IoFailed(err));
        }
        if self.locked {
            self.locked = false;
            if let Err(source) = lock::unlock(&file) {
                warn!(path = %self.path.display(), error = %source, "unlock failed while closing");
                if result.is_ok() {
                    result = Err(FileError::LockFailed {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
        drop(file);
        debug!(path = %self.path.display(), "closed file");
        result
    }

    /// True until [`close`](Self::close).
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// True while this handle holds the advisory lock. Locks held by
    /// other processes are not reflected.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Path the handle was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the handle was opened with.
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// The OS file descriptor, while open.
    #[cfg(unix)]
    pub fn raw_fd(&self) -> Option<std::os::unix::io::RawFd> {
        use std::os::unix::io::AsRawFd;
        self.stream.as_ref().map(|s| s.file().as_raw_fd())
    }

    /// The OS file handle, while open.
    #[cfg(windows)]
    pub fn raw_handle(&self) -> Option<std::os::windows::io::RawHandle> {
        use std::os::windows::io::AsRawHandle;
        self.stream.as_ref().map(|s| s.file().as_raw_handle())
    }

    // --------------------------------------------------------
    // Buffered I/O
    // --------------------------------------------------------

    /// Read into `buf` until it is full or the file ends, returning the
    /// number of bytes read. Zero means end of file.
    pub fn read(&mut self, buf: &mut [u8]) -> FileResult<usize> {
        if !self.mode.readable() {
            return Err(FileError::invalid("handle is not open for reading"));
        }
        let reader = self.reader()?;
        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Read everything from the current position to the end of the file.
    pub fn read_all(&mut self) -> FileResult<Vec<u8>> {
        if !self.mode.readable() {
            return Err(FileError::invalid("handle is not open for reading"));
        }
        let mut out = Vec::new();
        self.reader()?.read_to_end(&mut out)?;
        Ok(out)
    }

    /// Buffer `data` for writing, returning the number of bytes accepted.
    pub fn write(&mut self, data: &[u8]) -> FileResult<usize> {
        if !self.mode.writable() {
            return Err(FileError::invalid("handle is not open for writing"));
        }
        self.writer()?.write_all(data)?;
        Ok(data.len())
    }

    /// Write the bytes of `s`.
    pub fn write_string(&mut self, s: &str) -> FileResult<usize> {
        self.write(s.as_bytes())
    }

    /// Push buffered writes to the OS and refresh the cached size.
    pub fn flush(&mut self) -> FileResult<()> {
        let file = self.sync()?;
        let size = file.metadata().map_err(FileError::SystemError)?.len();
        self.cached_size = size;
        Ok(())
    }

    /// Flush and ask the OS to persist data and metadata to storage.
    pub fn sync_all(&mut self) -> FileResult<()> {
        self.sync()?.sync_all()?;
        Ok(())
    }

    /// Move the stream position, returning the new offset from the start.
    pub fn seek(&mut self, pos: SeekFrom) -> FileResult<u64> {
        let offset = match self.stream.as_mut() {
            None => return Err(FileError::closed()),
            Some(Stream::Reader(r)) => r.seek(pos)?,
            Some(Stream::Writer(w)) => w.seek(pos)?,
        };
        Ok(offset)
    }

    /// Current stream position.
    pub fn tell(&mut self) -> FileResult<u64> {
        let offset = match self.stream.as_mut() {
            None => return Err(FileError::closed()),
            Some(Stream::Reader(r)) => r.stream_position()?,
            Some(Stream::Writer(w)) => w.stream_position()?,
        };
        Ok(offset)
    }

    /// Cut or extend the file to `len` bytes. The stream position is not moved.
    pub fn truncate(&mut self, len: u64) -> FileResult<()> {
        if !self.mode.writable() {
            return Err(FileError::invalid("handle is not open for writing"));
        }
        self.sync()?.set_len(len)?;
        self.cached_size = len;
        debug!(path = %self.path.display(), len, "truncated file");
        Ok(())
    }

    /// File size as the OS reports it after flushing. Refreshes the cache.
    pub fn size(&mut self) -> FileResult<u64> {
        self.flush()?;
        Ok(self.cached_size)
    }

    /// Size recorded at open and on the last flush, truncate or positional
    /// write. May lag behind buffered writes and other processes.
    pub fn cached_size(&self) -> u64 {
        self.cached_size
    }

    // --------------------------------------------------------
    // Positional I/O
    // --------------------------------------------------------

    /// Read at `offset` until `buf` is full or the file ends.
    ///
    /// Pending buffered writes are flushed first so they are visible. The
    /// stream position is unchanged.
    pub fn pread(&mut self, buf: &mut [u8], offset: u64) -> FileResult<usize> {
        if !self.mode.readable() {
            return Err(FileError::invalid("handle is not open for reading"));
        }
        let file = self.sync()?;
        let mut filled = 0;
        while filled < buf.len() {
            match sys::read_at(file, &mut buf[filled..], offset + filled as u64) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Write all of `data` at `offset`. The stream position is unchanged.
    ///
    /// On Linux a file opened in an append mode ignores `offset` and
    /// appends, as pwrite(2) does.
    pub fn pwrite(&mut self, data: &[u8], offset: u64) -> FileResult<usize> {
        if !self.mode.writable() {
            return Err(FileError::invalid("handle is not open for writing"));
        }
        let file = self.sync()?;
        let mut written = 0;
        while written < data.len() {
            match sys::write_at(file, &data[written..], offset + written as u64) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero).into()),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.cached_size = self.cached_size.max(offset + written as u64);
        Ok(written)
    }

    // --------------------------------------------------------
    // Locking and Mapping
    // --------------------------------------------------------

    /// Take the whole-file advisory lock without waiting.
    ///
    /// Fails with [`FileError::LockFailed`] when another process holds it.
    /// Locking a handle that already holds the lock succeeds.
    pub fn lock(&mut self) -> FileResult<()> {
        if self.locked {
            return Ok(());
        }
        let file = self.stream.as_ref().ok_or_else(FileError::closed)?.file();
        lock::try_lock_exclusive(file).map_err(|source| FileError::LockFailed {
            path: self.path.clone(),
            source,
        })?;
        self.locked = true;
        debug!(path = %self.path.display(), "locked file");
        Ok(())
    }

    /// Release the advisory lock. A no-op if this handle does not hold it.
    pub fn unlock(&mut self) -> FileResult<()> {
        if !self.locked {
            return Ok(());
        }
        let file = self.stream.as_ref().ok_or_else(FileError::closed)?.file();
        lock::unlock(file).map_err(|source| FileError::LockFailed {
            path: self.path.clone(),
            source,
        })?;
        self.locked = false;
        debug!(path = %self.path.display(), "unlocked file");
        Ok(())
    }

    /// Map the first `len` bytes of the file.
    ///
    /// The handle must be readable, and writable too when `write` is set.
    /// Buffered writes are flushed first. `len` must not exceed the file
    /// size.
    pub fn mmap(&mut self, len: usize, read: bool, write: bool) -> FileResult<FileMapping> {
        if len == 0 || !(read || write) {
            return Err(FileError::invalid("mapping needs a length and a protection"));
        }
        if !self.mode.readable() || (write && !self.mode.writable()) {
            return Err(FileError::invalid("handle mode does not allow this mapping"));
        }
        let mapping = {
            let file = self.sync()?;
            let size = file.metadata().map_err(FileError::SystemError)?.len();
            if len as u64 > size {
                return Err(FileError::invalid("mapping extends past the end of the file"));
            }
            FileMapping::map(file, len, write)?
        };
        debug!(path = %self.path.display(), len, write, "mapped file");
        Ok(mapping)
    }

    // --------------------------------------------------------
    // Stream state
    // --------------------------------------------------------

    /// Flush pending writes, or discard read-ahead, so that the OS file
    /// position matches the stream position.
    fn sync(&mut self) -> FileResult<&File> {
        match self.stream.as_mut() {
            None => Err(FileError::closed()),
            Some(Stream::Writer(w)) => {
                w.flush()?;
                Ok(w.get_ref())
            }
            Some(Stream::Reader(r)) => {
                r.seek(SeekFrom::Current(0))?;
                Ok(r.get_ref())
            }
        }
    }

    fn reader(&mut self) -> FileResult<&mut BufReader<File>> {
        if matches!(self.stream, Some(Stream::Writer(_))) {
            if let Some(Stream::Writer(w)) = self.stream.take() {
                match w.into_inner() {
                    Ok(file) => self.stream = Some(Stream::Reader(BufReader::new(file))),
                    Err(err) => {
                        let (err, w) = err.into_parts();
                        self.stream = Some(Stream::Writer(w));
                        return Err(err.into());
                    }
                }
            }
        }
        match self.stream.as_mut() {
            Some(Stream::Reader(r)) => Ok(r),
            _ => Err(FileError::closed()),
        }
    }

    fn writer(&mut self) -> FileResult<&mut BufWriter<File>> {
        if let Some(Stream::Reader(r)) = self.stream.as_mut() {
            // Rewind the OS position over unread read-ahead.
            r.seek(SeekFrom::Current(0))?;
            if let Some(Stream::Reader(r)) = self.stream.take() {
                self.stream = Some(Stream::Writer(BufWriter::new(r.into_inner())));
            }
        }
        match self.stream.as_mut() {
            Some(Stream::Writer(w)) => Ok(w),
            _ => Err(FileError::closed()),
        }
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        // Failures are already logged by close.
        let _ = self.close();
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("is_open", &self.is_open())
            .field("is_locked", &self.locked)
            .field("cached_size", &self.cached_size)
            .finish()
    }
}

#[cfg(unix)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::unix::fs::FileExt;

    pub(super) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        file.read_at(buf, offset)
    }

    pub(super) fn write_at(file: &File, data: &[u8], offset: u64) -> io::Result<usize> {
        file.write_at(data, offset)
    }
}

#[cfg(windows)]
mod sys {
    use std::fs::File;
    use std::io::{self, Seek, SeekFrom};
    use std::os::windows::fs::FileExt;

    // seek_read/seek_write move the file pointer, so put it back.
    pub(super) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let mut cursor = file;
        let pos = cursor.stream_position()?;
        let result = file.seek_read(buf, offset);
        cursor.seek(SeekFrom::Start(pos))?;
        result
    }

    pub(super) fn write_at(file: &File, data: &[u8], offset: u64) -> io::Result<usize> {
        let mut cursor = file;
        let pos = cursor.stream_position()?;
        let result = file.seek_write(data, offset);
        cursor.seek(SeekFrom::Start(pos))?;
        result
    }
}

// ============================================================
// Convenience Functions
// ============================================================

/// Read a whole file.
pub fn read_file(path: impl AsRef<Path>) -> FileResult<Vec<u8>> {
    let mut handle = FileHandle::open(path, OpenMode::READ)?;
    let data = handle.read_all()?;
    handle.close()?;
    Ok(data)
}

/// Create or replace a file with `data`.
pub fn write_file(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> FileResult<()> {
    let mut handle = FileHandle::open(path, OpenMode::WRITE)?;
    handle.write(data.as_ref())?;
    handle.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileResultCode;

    #[test]
    fn test_parse_modes() {
        assert_eq!(OpenMode::parse("r").unwrap(), OpenMode::READ);
        assert_eq!(OpenMode::parse("rb+").unwrap(), OpenMode::READ_UPDATE);
        assert_eq!(OpenMode::parse("a+b").unwrap(), OpenMode::APPEND_UPDATE);
        let wx: OpenMode = "wx".parse().unwrap();
        assert!(wx.is_exclusive());
        assert_eq!(wx.to_string(), "wx");
        assert_eq!(OpenMode::parse("w+").unwrap().to_string(), "w+");

        for bad in ["", "q", "r++", "rx", "ax", "wz"] {
            let err = OpenMode::parse(bad).unwrap_err();
            assert_eq!(err.code(), FileResultCode::InvalidArgs, "{bad:?}");
        }
    }

    #[test]
    fn test_mode_permissions() {
        assert!(OpenMode::READ.readable() && !OpenMode::READ.writable());
        assert!(!OpenMode::APPEND.readable() && OpenMode::APPEND.writable());
        assert!(OpenMode::WRITE_UPDATE.readable() && OpenMode::WRITE_UPDATE.writable());
    }

    #[test]
    fn test_switching_between_read_and_write() {
        let dir = ::tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut f = FileHandle::open(&path, OpenMode::READ_UPDATE).unwrap();
        let mut head = [0u8; 3];
        assert_eq!(f.read(&mut head).unwrap(), 3);
        assert_eq!(&head, b"012");
        // The write lands right after what was read, not after the read-ahead.
        f.write(b"abc").unwrap();
        assert_eq!(f.tell().unwrap(), 6);
        assert_eq!(f.read_all().unwrap(), b"6789");
        f.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"012abc6789");
    }

    #[test]
    fn test_seek_truncate_and_sizes() {
        let dir = ::tempfile::tempdir().unwrap();
        let mut f = FileHandle::open(dir.path().join("t.bin"), OpenMode::WRITE_UPDATE).unwrap();
        assert_eq!(f.cached_size(), 0);
        f.write(&[7u8; 64]).unwrap();
        assert_eq!(f.cached_size(), 0);
        assert_eq!(f.size().unwrap(), 64);

        f.truncate(10).unwrap();
        assert_eq!(f.cached_size(), 10);
        assert_eq!(f.seek(SeekFrom::Start(2)).unwrap(), 2);
        assert_eq!(f.read_all().unwrap().len(), 8);
        assert_eq!(f.seek(SeekFrom::End(-1)).unwrap(), 9);
    }

    #[test]
    fn test_closed_handle_rejects_io() {
        let dir = ::tempfile::tempdir().unwrap();
        let mut f = FileHandle::open(dir.path().join("c"), OpenMode::WRITE).unwrap();
        f.close().unwrap();
        assert!(!f.is_open());
        assert_eq!(f.write(b"x").unwrap_err().code(), FileResultCode::InvalidArgs);
        assert_eq!(f.tell().unwrap_err().code(), FileResultCode::InvalidArgs);
        f.close().unwrap();
    }

    #[test]
    fn test_mode_guards() {
        let dir = ::tempfile::tempdir().unwrap();
        let path = dir.path().join("ro");
        write_file(&path, "data").unwrap();
        let mut f = FileHandle::open(&path, OpenMode::READ).unwrap();
        assert_eq!(f.write(b"x").unwrap_err().code(), FileResultCode::InvalidArgs);
        assert_eq!(f.pwrite(b"x", 0).unwrap_err().code(), FileResultCode::InvalidArgs);
        assert_eq!(f.mmap(4, true, true).unwrap_err().code(), FileResultCode::InvalidArgs);
        assert_eq!(f.mmap(5, true, false).unwrap_err().code(), FileResultCode::InvalidArgs);
        let map = f.mmap(4, true, false).unwrap();
        assert_eq!(&map[..], b"data");
    }

    #[test]
    fn test_open_failures() {
        let dir = ::tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = FileHandle::open(&missing, OpenMode::READ).unwrap_err();
        assert_eq!(err.code(), FileResultCode::OpenFailed);
        assert!(err.raw_os_error().is_some());

        write_file(&missing, b"").unwrap();
        let err = FileHandle::open(&missing, OpenMode::parse("wx").unwrap()).unwrap_err();
        assert_eq!(err.code(), FileResultCode::OpenFailed);
        assert_eq!(
            FileHandle::open("", OpenMode::READ).unwrap_err().code(),
            FileResultCode::InvalidArgs
        );
    }

    #[test]
    fn test_append_mode_writes_at_end() {
        let dir = ::tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        write_file(&path, "one\n").unwrap();
        let mut f = FileHandle::open(&path, OpenMode::APPEND).unwrap();
        f.write_string("two\n").unwrap();
        drop(f);
        assert_eq!(read_file(&path).unwrap(), b"one\ntwo\n");
    }
}
