//! Temporary files and directories
//!
//! Names are a 12-character alphanumeric prefix from the OS random source
//! followed by an `XXXXXX` template that is filled on each attempt, the way
//! mkstemp(3) does. Creation is exclusive (`O_EXCL`/`CREATE_NEW`), so a
//! name is only returned once the file or directory is ours.
//!
//! The caller owns the result and removes it when done.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use tracing::debug;

use crate::environment::temp_dir;
use crate::{FileError, FileResult};

/// Length of the random prefix.
pub const PREFIX_LEN: usize = 12;

/// Template appended to the prefix and filled per attempt.
pub const TEMPLATE: &str = "XXXXXX";

const MAX_ATTEMPTS: usize = 128;

static NAME_LOCK: Mutex<()> = parking_lot::const_mutex(());

fn random_alphanumeric(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn fill_template(prefix: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + TEMPLATE.len());
    name.push_str(prefix);
    name.push_str(&random_alphanumeric(TEMPLATE.len()));
    name
}

/// Retry `create` on fresh names until one does not collide.
fn create_unique<F>(dir: &Path, mut create: F) -> FileResult<PathBuf>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let _guard = NAME_LOCK.lock();
    let prefix = random_alphanumeric(PREFIX_LEN);
    for _ in 0..MAX_ATTEMPTS {
        let candidate = dir.join(fill_template(&prefix));
        match create(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(FileError::open_failed(candidate, e)),
        }
    }
    Err(FileError::SystemError(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no unused temporary name found",
    )))
}

/// Create an empty file in the system temp directory and return its path.
pub fn make_tempfile() -> FileResult<PathBuf> {
    make_tempfile_in(temp_dir())
}

/// Create an empty file in `dir` and return its path.
pub fn make_tempfile_in(dir: impl AsRef<Path>) -> FileResult<PathBuf> {
    let path = create_unique(dir.as_ref(), |p| {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(p)
            .map(drop)
    })?;
    debug!(path = %path.display(), "created temporary file");
    Ok(path)
}

/// Create an empty directory in the system temp directory and return its path.
pub fn make_tempdir() -> FileResult<PathBuf> {
    make_tempdir_in(temp_dir())
}

/// Create an empty directory in `dir` and return its path.
pub fn make_tempdir_in(dir: impl AsRef<Path>) -> FileResult<PathBuf> {
    let path = create_unique(dir.as_ref(), |p| fs::create_dir(p))?;
    debug!(path = %path.display(), "created temporary directory");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_shape() {
        let dir = ::tempfile::tempdir().unwrap();
        let path = make_tempfile_in(dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), PREFIX_LEN + TEMPLATE.len());
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(path.is_file());
    }

    #[test]
    fn test_tempdir_in() {
        let dir = ::tempfile::tempdir().unwrap();
        let a = make_tempdir_in(dir.path()).unwrap();
        let b = make_tempdir_in(dir.path()).unwrap();
        assert_ne!(a, b);
        assert!(a.is_dir() && b.is_dir());
    }

    #[test]
    fn test_missing_parent_fails() {
        let dir = ::tempfile::tempdir().unwrap();
        let err = make_tempfile_in(dir.path().join("absent")).unwrap_err();
        assert_eq!(err.code(), crate::FileResultCode::OpenFailed);
    }
}
