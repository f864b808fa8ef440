//! solidc System Library
//!
//! Files, directories and the process environment.
//!
//! # Modules
//!
//! - [`io`] - buffered file handles with positional I/O
//! - [`lock`] - whole-file advisory locks
//! - [`mmap`] - shared memory maps of open files
//! - [`directory`] - directory iteration, recursive walks and removal
//! - [`filepath`] - path manipulation and `makedirs`
//! - [`tempfile`] - uniquely named temporary files and directories
//! - [`environment`] - dotenv loading and well-known variables
//!
//! # Errors
//!
//! Every fallible file-system call returns [`FileResult`]. The error keeps
//! the originating [`std::io::Error`] so the OS error code survives, and
//! [`FileError::code`] maps it onto the flat [`FileResultCode`] taxonomy.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub mod directory;
pub mod environment;
pub mod filepath;
pub mod io;
pub mod lock;
pub mod mmap;
pub mod tempfile;

pub use directory::{
    file_exists, file_size, is_directory, list_directory, remove_dir, rename, walk,
    walk_depth_first, walk_with, Directory, WalkAction, WalkEntry, WalkOrder,
};
pub use environment::{load_dotenv, parse_dotenv, DotenvOptions, EnvError};
pub use io::{read_file, write_file, FileHandle, OpenMode};
pub use mmap::FileMapping;
pub use crate::tempfile::{make_tempdir, make_tempfile};

/// Flat result code for file-system operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileResultCode {
    /// The operation completed.
    Success,
    /// A null, empty or contradictory argument.
    InvalidArgs,
    /// The file or directory could not be opened.
    OpenFailed,
    /// A read, write, seek or flush failed.
    IoFailed,
    /// The advisory lock is held elsewhere or could not be released.
    LockFailed,
    /// A memory map could not be created or released.
    MemoryFailed,
    /// Any other OS failure.
    SystemError,
}

impl FileResultCode {
    /// Short human-readable description.
    pub fn as_str(self) -> &'static str {
        match self {
            FileResultCode::Success => "success",
            FileResultCode::InvalidArgs => "invalid arguments",
            FileResultCode::OpenFailed => "open failed",
            FileResultCode::IoFailed => "i/o failed",
            FileResultCode::LockFailed => "lock failed",
            FileResultCode::MemoryFailed => "memory mapping failed",
            FileResultCode::SystemError => "system error",
        }
    }
}

impl fmt::Display for FileResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T> From<&FileResult<T>> for FileResultCode {
    fn from(result: &FileResult<T>) -> Self {
        match result {
            Ok(_) => FileResultCode::Success,
            Err(err) => err.code(),
        }
    }
}

/// Errors from the file-system layer.
#[derive(Debug, Error)]
pub enum FileError {
    /// The caller passed something the operation cannot act on.
    #[error("invalid arguments: {reason}")]
    InvalidArgs {
        /// What was wrong.
        reason: &'static str,
    },

    /// Opening a file or directory failed.
    #[error("cannot open {}: {source}", .path.display())]
    OpenFailed {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A data transfer or stream operation failed.
    #[error("i/o error: {0}")]
    IoFailed(#[from] std::io::Error),

    /// Taking or releasing the advisory lock failed.
    #[error("cannot lock {}: {source}", .path.display())]
    LockFailed {
        /// Path of the locked file.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Creating or releasing a memory map failed.
    #[error("memory map failed: {0}")]
    MemoryFailed(#[source] std::io::Error),

    /// Any other OS failure, including a walk aborted by its callback.
    #[error("system error: {0}")]
    SystemError(#[source] std::io::Error),
}

impl FileError {
    pub(crate) fn invalid(reason: &'static str) -> Self {
        FileError::InvalidArgs { reason }
    }

    pub(crate) fn closed() -> Self {
        FileError::invalid("file handle is closed")
    }

    pub(crate) fn open_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::OpenFailed {
            path: path.into(),
            source,
        }
    }

    /// The flat result code for this error.
    pub fn code(&self) -> FileResultCode {
        match self {
            FileError::InvalidArgs { .. } => FileResultCode::InvalidArgs,
            FileError::OpenFailed { .. } => FileResultCode::OpenFailed,
            FileError::IoFailed(_) => FileResultCode::IoFailed,
            FileError::LockFailed { .. } => FileResultCode::LockFailed,
            FileError::MemoryFailed(_) => FileResultCode::MemoryFailed,
            FileError::SystemError(_) => FileResultCode::SystemError,
        }
    }

    /// The OS error number behind this error, if there is one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            FileError::InvalidArgs { .. } => None,
            FileError::OpenFailed { source, .. } | FileError::LockFailed { source, .. } => {
                source.raw_os_error()
            }
            FileError::IoFailed(err) | FileError::MemoryFailed(err) | FileError::SystemError(err) => {
                err.raw_os_error()
            }
        }
    }
}

/// Result alias for file-system operations.
pub type FileResult<T> = Result<T, FileError>;
