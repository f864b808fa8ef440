//! Directory operations
//!
//! Entry-by-entry iteration with [`Directory`], recursive walks driven by a
//! callback, recursive removal and small metadata queries.
//!
//! # Walking
//!
//! [`walk`] visits every entry below a root before-or-after its children
//! depending on [`WalkOrder`]. The root itself is not reported. The callback
//! steers the walk through its [`WalkAction`]:
//!
//! | action | pre-order | post-order |
//! |--------|-----------|------------|
//! | `Continue` | descend into directories | keep going |
//! | `Skip` | do not descend into this directory | keep going |
//! | `Stop` | end the walk, successfully | end the walk, successfully |
//! | `Error` | end the walk with [`FileError::SystemError`] | same |
//!
//! Symbolic links are reported but never followed, so a walk cannot escape
//! the tree or loop.
//!
//! # Example
//!
//! ```no_run
//! use solidc_system::{walk, WalkAction};
//!
//! let mut rust_files = Vec::new();
//! walk("src", |entry| {
//!     if entry.is_dir() && entry.file_name() == Some("target") {
//!         return WalkAction::Skip;
//!     }
//!     if entry.path().extension().is_some_and(|ext| ext == "rs") {
//!         rust_files.push(entry.path().to_path_buf());
//!     }
//!     WalkAction::Continue
//! })?;
//! # Ok::<(), solidc_system::FileError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{FileError, FileResult};

// ============================================================
// Iteration
// ============================================================

/// An open directory yielding the names of its children.
///
/// `.` and `..` are never produced.
#[derive(Debug)]
pub struct Directory {
    path: PathBuf,
    entries: ReadDir,
}

impl Directory {
    /// Open `path` for iteration.
    pub fn open(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        let entries = fs::read_dir(path).map_err(|e| FileError::open_failed(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Path the directory was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for Directory {
    type Item = FileResult<OsString>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .next()
            .map(|entry| entry.map(|e| e.file_name()).map_err(FileError::IoFailed))
    }
}

/// Names of the children of `path`, in the order the OS returns them.
///
/// Entries that cannot be read and names that are not valid Unicode are
/// converted lossily.
pub fn list_directory(path: impl AsRef<Path>) -> FileResult<Vec<String>> {
    let mut names = Vec::new();
    for name in Directory::open(path)? {
        names.push(name?.to_string_lossy().into_owned());
    }
    Ok(names)
}

// ============================================================
// Walking
// ============================================================

/// When the walk reports a directory relative to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WalkOrder {
    /// Directory first, then its children.
    #[default]
    PreOrder,
    /// Children first, then the directory. Needed for deletion.
    PostOrder,
}

/// What the walk should do after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkAction {
    /// Keep walking.
    Continue,
    /// End the walk without error.
    Stop,
    /// Do not descend into the directory just reported (pre-order only).
    Skip,
    /// Abort the walk with an error.
    Error,
}

/// Kind of a walked entry. Links are not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Device, socket, pipe or unknown.
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry reported to a walk callback.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    path: PathBuf,
    kind: EntryKind,
    depth: usize,
}

impl WalkEntry {
    /// Full path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, if it is valid Unicode.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Entry kind.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// True for directories (not links to them).
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// 1 for children of the root, 2 for grandchildren and so on.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Pre-order walk of everything below `root`.
pub fn walk<F>(root: impl AsRef<Path>, callback: F) -> FileResult<()>
where
    F: FnMut(&WalkEntry) -> WalkAction,
{
    walk_with(root, WalkOrder::PreOrder, callback)
}

/// Post-order walk: every entry is reported after all of its descendants.
pub fn walk_depth_first<F>(root: impl AsRef<Path>, callback: F) -> FileResult<()>
where
    F: FnMut(&WalkEntry) -> WalkAction,
{
    walk_with(root, WalkOrder::PostOrder, callback)
}

/// Walk everything below `root` in the given order.
///
/// Fails with [`FileError::OpenFailed`] if `root` cannot be read.
/// Unreadable subdirectories are logged and skipped.
pub fn walk_with<F>(root: impl AsRef<Path>, order: WalkOrder, mut callback: F) -> FileResult<()>
where
    F: FnMut(&WalkEntry) -> WalkAction,
{
    walk_dir(root.as_ref(), 1, order, &mut callback).map(|_| ())
}

fn walk_dir<F>(dir: &Path, depth: usize, order: WalkOrder, callback: &mut F) -> FileResult<Flow>
where
    F: FnMut(&WalkEntry) -> WalkAction,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if depth > 1 => {
            warn!(path = %dir.display(), error = %err, "skipping unreadable directory");
            return Ok(Flow::Continue);
        }
        Err(err) => return Err(FileError::open_failed(dir, err)),
    };

    for entry in entries {
        let (path, kind) = match entry.and_then(|e| Ok((e.path(), e.file_type()?))) {
            Ok((path, ft)) => (path, EntryKind::from(ft)),
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let entry = WalkEntry { path, kind, depth };

        let mut descend = entry.is_dir();
        if order == WalkOrder::PreOrder {
            match callback(&entry) {
                WalkAction::Continue => {}
                WalkAction::Skip => descend = false,
                WalkAction::Stop => return Ok(stopped(&entry)),
                WalkAction::Error => return Err(aborted(&entry)),
            }
        }
        if descend {
            if let Flow::Stop = walk_dir(&entry.path, depth + 1, order, callback)? {
                return Ok(Flow::Stop);
            }
        }
        if order == WalkOrder::PostOrder {
            match callback(&entry) {
                WalkAction::Continue | WalkAction::Skip => {}
                WalkAction::Stop => return Ok(stopped(&entry)),
                WalkAction::Error => return Err(aborted(&entry)),
            }
        }
    }
    Ok(Flow::Continue)
}

fn stopped(entry: &WalkEntry) -> Flow {
    debug!(path = %entry.path.display(), "walk stopped by callback");
    Flow::Stop
}

fn aborted(entry: &WalkEntry) -> FileError {
    FileError::SystemError(io::Error::other(format!(
        "walk aborted by callback at {}",
        entry.path.display()
    )))
}

// ============================================================
// Removal and Queries
// ============================================================

/// Remove the directory at `path`.
///
/// Without `recursive` the directory must be empty. With it, the contents
/// are deleted children-first and then the directory itself; symbolic
/// links are removed, not followed.
pub fn remove_dir(path: impl AsRef<Path>, recursive: bool) -> FileResult<()> {
    let path = path.as_ref();
    if recursive {
        let mut failure = None;
        walk_depth_first(path, |entry| {
            let removed = if entry.is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };
            match removed {
                Ok(()) => WalkAction::Continue,
                Err(err) => {
                    failure = Some(err);
                    WalkAction::Stop
                }
            }
        })?;
        if let Some(err) = failure {
            return Err(FileError::IoFailed(err));
        }
    }
    fs::remove_dir(path)?;
    debug!(path = %path.display(), recursive, "removed directory");
    Ok(())
}

/// True if anything exists at `path`. Broken symbolic links count as
/// missing.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// True if `path` is a directory, following links.
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

/// Size of the file at `path` in bytes.
pub fn file_size(path: impl AsRef<Path>) -> FileResult<u64> {
    let path = path.as_ref();
    let meta = fs::metadata(path).map_err(|e| FileError::open_failed(path, e))?;
    Ok(meta.len())
}

/// Move `from` to `to`, replacing `to` if it is a file.
pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> FileResult<()> {
    fs::rename(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileResultCode;

    fn tree() -> ::tempfile::TempDir {
        let dir = ::tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/leaf.txt"), "x").unwrap();
        fs::write(dir.path().join("a/mid.txt"), "xy").unwrap();
        fs::write(dir.path().join("top.txt"), "xyz").unwrap();
        dir
    }

    #[test]
    fn test_directory_iterator_names() {
        let dir = tree();
        let mut names = list_directory(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["a", "top.txt"]);
        let d = Directory::open(dir.path()).unwrap();
        assert_eq!(d.path(), dir.path());
        assert_eq!(d.count(), 2);
    }

    #[test]
    fn test_skip_prunes_subtree() {
        let dir = tree();
        let mut seen = Vec::new();
        walk(dir.path(), |e| {
            seen.push(e.file_name().unwrap_or_default().to_string());
            if e.file_name() == Some("b") {
                WalkAction::Skip
            } else {
                WalkAction::Continue
            }
        })
        .unwrap();
        assert!(seen.contains(&"b".to_string()));
        assert!(!seen.contains(&"leaf.txt".to_string()));
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_stop_and_error() {
        let dir = tree();
        let mut calls = 0;
        walk(dir.path(), |_| {
            calls += 1;
            WalkAction::Stop
        })
        .unwrap();
        assert_eq!(calls, 1);

        let err = walk_depth_first(dir.path(), |_| WalkAction::Error).unwrap_err();
        assert_eq!(err.code(), FileResultCode::SystemError);
    }

    #[test]
    fn test_depths() {
        let dir = tree();
        let mut max_depth = 0;
        walk(dir.path(), |e| {
            max_depth = max_depth.max(e.depth());
            WalkAction::Continue
        })
        .unwrap();
        assert_eq!(max_depth, 3);
    }

    #[test]
    fn test_missing_root() {
        let dir = ::tempfile::tempdir().unwrap();
        let err = walk(dir.path().join("nope"), |_| WalkAction::Continue).unwrap_err();
        assert_eq!(err.code(), FileResultCode::OpenFailed);
    }

    #[test]
    fn test_remove_dir() {
        let dir = tree();
        let a = dir.path().join("a");
        let err = remove_dir(&a, false).unwrap_err();
        assert_eq!(err.code(), FileResultCode::IoFailed);
        remove_dir(&a, true).unwrap();
        assert!(!file_exists(&a));
        assert!(file_exists(dir.path().join("top.txt")));
    }

    #[test]
    fn test_queries_and_rename() {
        let dir = tree();
        let top = dir.path().join("top.txt");
        assert!(is_directory(dir.path().join("a")));
        assert!(!is_directory(&top));
        assert_eq!(file_size(&top).unwrap(), 3);
        let moved = dir.path().join("moved.txt");
        rename(&top, &moved).unwrap();
        assert!(!file_exists(&top));
        assert_eq!(file_size(&moved).unwrap(), 3);
        assert_eq!(
            file_size(&top).unwrap_err().code(),
            FileResultCode::OpenFailed
        );
    }
}
