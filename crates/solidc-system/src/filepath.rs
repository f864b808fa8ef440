//! Path manipulation
//!
//! String-in, string-out helpers over [`std::path`]. They follow the host's
//! separator rules and never touch the file system, except [`absolute`]
//! (which reads the working directory) and [`makedirs`].
//!
//! # Example
//!
//! ```
//! use solidc_system::filepath::{basename, dirname, extension, join, nameonly};
//!
//! let path = join(&["var", "log", "app.log"]);
//! assert_eq!(basename(&path), Some("app.log"));
//! assert_eq!(nameonly(&path), Some("app"));
//! assert_eq!(extension(&path), Some("log"));
//! assert_eq!(dirname("app.log"), ".");
//! ```

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::environment::home_dir;
use crate::{FileError, FileResult};

/// Final component of `path`, or `None` for a root or a path ending in `..`.
///
/// ```
/// use solidc_system::filepath::basename;
///
/// assert_eq!(basename("/home/user/notes.txt"), Some("notes.txt"));
/// assert_eq!(basename("/home/user/"), Some("user"));
/// assert_eq!(basename("/"), None);
/// ```
pub fn basename(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|s| s.to_str())
}

/// Everything but the final component.
///
/// A bare file name yields `"."` and a root yields itself, as dirname(3).
///
/// ```
/// use solidc_system::filepath::dirname;
///
/// assert_eq!(dirname("/home/user/notes.txt"), "/home/user");
/// assert_eq!(dirname("notes.txt"), ".");
/// ```
pub fn dirname(path: &str) -> String {
    let p = Path::new(path);
    match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        Some(_) => ".".to_string(),
        None => {
            let root: PathBuf = p
                .components()
                .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
                .collect();
            if root.as_os_str().is_empty() {
                ".".to_string()
            } else {
                root.to_string_lossy().into_owned()
            }
        }
    }
}

/// Extension of the final component, without the dot.
///
/// ```
/// use solidc_system::filepath::extension;
///
/// assert_eq!(extension("archive.tar.gz"), Some("gz"));
/// assert_eq!(extension(".bashrc"), None);
/// ```
pub fn extension(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|s| s.to_str())
}

/// Final component with its extension removed.
pub fn nameonly(path: &str) -> Option<&str> {
    Path::new(path).file_stem().and_then(|s| s.to_str())
}

/// Split into ([`dirname`], [`basename`]). The name is empty when the
/// path has no final component.
pub fn split(path: &str) -> (String, String) {
    (dirname(path), basename(path).unwrap_or_default().to_string())
}

/// Join components with the host separator. An absolute component
/// replaces everything before it.
pub fn join(components: &[&str]) -> String {
    let path: PathBuf = components.iter().collect();
    path.to_string_lossy().into_owned()
}

/// Resolve `.` and `..` lexically, without following links.
///
/// ```
/// use solidc_system::filepath::normalize;
///
/// # #[cfg(unix)]
/// assert_eq!(normalize("/srv/./www/../data"), "/srv/data");
/// # #[cfg(unix)]
/// assert_eq!(normalize("a/../../b"), "../b");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root is the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        ".".to_string()
    } else {
        out.to_string_lossy().into_owned()
    }
}

/// Absolute, normalised form of `path`, resolved against the working
/// directory. The path does not have to exist.
pub fn absolute(path: &str) -> FileResult<String> {
    if path.is_empty() {
        return Err(FileError::invalid("empty path"));
    }
    let p = Path::new(path);
    let full = if p.is_absolute() {
        p.to_path_buf()
    } else {
        env::current_dir().map_err(FileError::SystemError)?.join(p)
    };
    Ok(normalize(&full.to_string_lossy()))
}

/// Replace a leading `~` with the home directory.
///
/// Paths not starting with `~` or `~/`, and all paths when no home
/// directory is known, are returned unchanged.
pub fn expanduser(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(std::path::is_separator) => rest,
        _ => return path.to_string(),
    };
    match home_dir() {
        Some(home) => {
            let rest = rest.trim_start_matches(std::path::is_separator);
            if rest.is_empty() {
                home.to_string_lossy().into_owned()
            } else {
                home.join(rest).to_string_lossy().into_owned()
            }
        }
        None => path.to_string(),
    }
}

/// Create `path` and any missing ancestors. Succeeds if it already exists
/// as a directory.
pub fn makedirs(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(FileError::invalid("empty path"));
    }
    fs::create_dir_all(path)?;
    debug!(path = %path.display(), "created directories");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirname_edges() {
        assert_eq!(dirname(""), ".");
        #[cfg(unix)]
        {
            assert_eq!(dirname("/"), "/");
            assert_eq!(dirname("/etc"), "/");
            assert_eq!(dirname("a/b/"), "a");
        }
    }

    #[test]
    fn test_split_and_nameonly() {
        let (dir, name) = split(&join(&["logs", "2024", "run.tar.gz"]));
        assert_eq!(dir, join(&["logs", "2024"]));
        assert_eq!(name, "run.tar.gz");
        assert_eq!(nameonly(&name), Some("run.tar"));
        assert_eq!(split("/").1, "");
    }

    #[test]
    fn test_absolute_is_normalised() {
        let abs = absolute("x/../y").unwrap();
        assert!(Path::new(&abs).is_absolute());
        assert!(abs.ends_with('y'));
        assert!(!abs.contains(".."));
        assert!(absolute("").is_err());
    }

    #[test]
    fn test_expanduser_leaves_other_paths() {
        assert_eq!(expanduser("/abs/path"), "/abs/path");
        assert_eq!(expanduser("~other/x"), "~other/x");
        if let Some(home) = home_dir() {
            let expanded = expanduser("~/docs");
            assert!(expanded.starts_with(&*home.to_string_lossy()));
            assert!(expanded.ends_with("docs"));
            assert_eq!(expanduser("~"), home.to_string_lossy());
        }
    }

    #[test]
    fn test_makedirs() {
        let dir = ::tempfile::tempdir().unwrap();
        let deep = dir.path().join("one/two/three");
        makedirs(&deep).unwrap();
        assert!(deep.is_dir());
        makedirs(&deep).unwrap();
    }
}
