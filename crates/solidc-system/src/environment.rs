//! Environment variables and dotenv files
//!
//! # Dotenv format
//!
//! One `KEY=VALUE` per line:
//!
//! - blank lines and lines starting with `#` are ignored
//! - an optional `export ` prefix is dropped
//! - keys are `[A-Za-z_][A-Za-z0-9_]*`
//! - `"double quoted"` values process `\n`, `\t`, `\r`, `\"` and `\\`
//! - `'single quoted'` values are literal
//! - unquoted values end at a `#` preceded by whitespace and are trimmed
//!
//! # Example
//!
//! ```no_run
//! use solidc_system::environment::{load_dotenv, lookup_env, DotenvOptions};
//!
//! let applied = load_dotenv(".env", DotenvOptions::default())?;
//! println!("{applied} variables loaded");
//! if let Some(url) = lookup_env("DATABASE_URL") {
//!     println!("db: {url}");
//! }
//! # Ok::<(), solidc_system::EnvError>(())
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors from reading or parsing a dotenv file.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path of the dotenv file.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A line is not a comment, blank or valid assignment.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Options for [`load_dotenv`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DotenvOptions {
    /// Replace variables that are already set.
    pub overwrite: bool,
}

impl DotenvOptions {
    /// Set whether existing variables are replaced.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

// ============================================================
// Parsing
// ============================================================

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_quoted(body: &str, quote: char) -> Result<String, &'static str> {
    let mut out = String::new();
    let mut chars = body.chars();
    loop {
        match chars.next() {
            None => return Err("unterminated quoted value"),
            Some(c) if c == quote => break,
            Some('\\') if quote == '"' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err("unterminated quoted value"),
            },
            Some(c) => out.push(c),
        }
    }
    let trailing = chars.as_str().trim_start();
    if trailing.is_empty() || trailing.starts_with('#') {
        Ok(out)
    } else {
        Err("unexpected text after closing quote")
    }
}

fn parse_value(raw: &str) -> Result<String, &'static str> {
    let value = raw.trim_start();
    if let Some(body) = value.strip_prefix('"') {
        return parse_quoted(body, '"');
    }
    if let Some(body) = value.strip_prefix('\'') {
        return parse_quoted(body, '\'');
    }
    let end = raw
        .char_indices()
        .find(|&(i, c)| c == '#' && raw[..i].ends_with(char::is_whitespace))
        .map_or(raw.len(), |(i, _)| i);
    Ok(raw[..end].trim().to_string())
}

/// Parse one line. `Ok(None)` for blank lines and comments.
fn parse_line(line: &str) -> Result<Option<(String, String)>, &'static str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let line = line.strip_prefix("export ").map_or(line, str::trim_start);
    let (key, raw) = line.split_once('=').ok_or("missing '='")?;
    let key = key.trim();
    if key.is_empty() {
        return Err("empty key");
    }
    if !is_valid_key(key) {
        return Err("invalid key");
    }
    Ok(Some((key.to_string(), parse_value(raw)?)))
}

/// Parse dotenv text into `(key, value)` pairs in file order.
///
/// Fails on the first malformed line.
///
/// ```
/// use solidc_system::environment::parse_dotenv;
///
/// let vars = parse_dotenv("# db\nexport HOST=localhost\nPORT = 5432 # default\n")?;
/// assert_eq!(vars[0], ("HOST".to_string(), "localhost".to_string()));
/// assert_eq!(vars[1], ("PORT".to_string(), "5432".to_string()));
/// # Ok::<(), solidc_system::EnvError>(())
/// ```
pub fn parse_dotenv(src: &str) -> Result<Vec<(String, String)>, EnvError> {
    let mut vars = Vec::new();
    for (idx, line) in src.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(pair)) => vars.push(pair),
            Ok(None) => {}
            Err(reason) => return Err(EnvError::Malformed { line: idx + 1, reason }),
        }
    }
    Ok(vars)
}

/// Load a dotenv file into the process environment.
///
/// Malformed lines are logged and skipped. Variables that are already set
/// are left alone unless `options.overwrite` is true. Returns how many
/// variables were set.
///
/// Mutating the environment is not synchronised with other threads
/// reading it; call this early, before spawning threads.
pub fn load_dotenv(path: impl AsRef<Path>, options: DotenvOptions) -> Result<usize, EnvError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|source| EnvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut applied = 0;
    for (idx, line) in src.lines().enumerate() {
        match parse_line(line) {
            Ok(Some((key, value))) => {
                if !options.overwrite && env::var_os(&key).is_some() {
                    continue;
                }
                env::set_var(&key, value);
                debug!(name = %key, "applied dotenv variable");
                applied += 1;
            }
            Ok(None) => {}
            Err(reason) => {
                warn!(path = %path.display(), line = idx + 1, reason, "skipping malformed dotenv line");
            }
        }
    }
    Ok(applied)
}

// ============================================================
// Well-known Variables
// ============================================================

/// Value of `name`, if set and valid Unicode.
pub fn lookup_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Directory for temporary files: `TMPDIR`, `TMP`, `TEMP`, then the
/// platform default.
pub fn temp_dir() -> PathBuf {
    ["TMPDIR", "TMP", "TEMP"]
        .into_iter()
        .find_map(non_empty_var)
        .unwrap_or_else(env::temp_dir)
}

/// The user's home directory from `HOME`, then `USERPROFILE`.
pub fn home_dir() -> Option<PathBuf> {
    non_empty_var("HOME").or_else(|| non_empty_var("USERPROFILE"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting() {
        let vars = parse_dotenv(
            r#"
A="line one\nline two"
B='no \n escapes'
C="say \"hi\"" # trailing comment
D=  spaced value
E=a#not-a-comment
F=
"#,
        )
        .unwrap();
        let get = |k: &str| vars.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("A"), Some("line one\nline two"));
        assert_eq!(get("B"), Some("no \\n escapes"));
        assert_eq!(get("C"), Some("say \"hi\""));
        assert_eq!(get("D"), Some("spaced value"));
        assert_eq!(get("E"), Some("a#not-a-comment"));
        assert_eq!(get("F"), Some(""));
    }

    #[test]
    fn test_malformed_lines_report_position() {
        let cases = [
            ("OK=1\nnot an assignment\n", 2, "missing '='"),
            ("=value", 1, "empty key"),
            ("\n\n1ABC=x", 3, "invalid key"),
            ("Q=\"open", 1, "unterminated quoted value"),
            ("Q='x' y", 1, "unexpected text after closing quote"),
        ];
        for (src, line, reason) in cases {
            match parse_dotenv(src) {
                Err(EnvError::Malformed { line: l, reason: r }) => {
                    assert_eq!((l, r), (line, reason), "{src:?}");
                }
                other => panic!("{src:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_load_respects_overwrite() {
        let dir = ::tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "SOLIDC_ENV_TEST_KEEP=file\nSOLIDC_ENV_TEST_NEW=file\nbroken line\n",
        )
        .unwrap();
        env::set_var("SOLIDC_ENV_TEST_KEEP", "process");

        assert_eq!(load_dotenv(&path, DotenvOptions::default()).unwrap(), 1);
        assert_eq!(lookup_env("SOLIDC_ENV_TEST_KEEP").as_deref(), Some("process"));
        assert_eq!(lookup_env("SOLIDC_ENV_TEST_NEW").as_deref(), Some("file"));

        let overwrite = DotenvOptions::default().with_overwrite(true);
        assert_eq!(load_dotenv(&path, overwrite).unwrap(), 2);
        assert_eq!(lookup_env("SOLIDC_ENV_TEST_KEEP").as_deref(), Some("file"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_dotenv("/definitely/not/here/.env", DotenvOptions::default()).unwrap_err();
        assert!(matches!(err, EnvError::Io { .. }));
    }
}
