//! Owned UTF-8 string
//!
//! [`Utf8String`] holds bytes that are always valid UTF-8 and caches the
//! number of codepoints alongside them.
//!
//! # Overview
//!
//! - Constructors filter invalid input instead of failing.
//! - Mutators take *byte* indices, which must lie on codepoint boundaries.
//! - Lengths passed to [`Utf8String::remove`] count codepoints, not bytes.
//! - Case mapping uses full Unicode mappings, so the byte length may change.
//!
//! # Example
//!
//! ```
//! use solidc_text::Utf8String;
//!
//! let mut s = Utf8String::from("héllo wörld");
//! s.upper();
//! assert_eq!(s.as_str(), "HÉLLO WÖRLD");
//! assert_eq!(s.codepoint_count(), 11);
//! assert_eq!(s.byte_length(), 13);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::codec::{count_codepoints, filter_valid};
use crate::search;
use crate::{TextError, TextResult};

/// A growable string whose bytes are always valid UTF-8.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Utf8String {
    data: Vec<u8>,
    codepoints: usize,
}

impl Utf8String {
    // ============================================================
    // Construction
    // ============================================================

    /// Build from raw bytes, dropping every invalid byte.
    pub fn new(raw: impl AsRef<[u8]>) -> Self {
        Self::from_valid(filter_valid(raw.as_ref()))
    }

    /// Empty string with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            codepoints: 0,
        }
    }

    fn from_valid(data: Vec<u8>) -> Self {
        let codepoints = count_codepoints(&data);
        Self { data, codepoints }
    }

    fn recount(&mut self) {
        self.codepoints = count_codepoints(&self.data);
    }

    // ============================================================
    // Access
    // ============================================================

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The string as `&str`.
    pub fn as_str(&self) -> &str {
        // SAFETY: every constructor and mutator keeps `data` valid UTF-8.
        unsafe { std::str::from_utf8_unchecked(&self.data) }
    }

    /// Consume into the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Length in bytes.
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    /// Length in codepoints.
    pub fn codepoint_count(&self) -> usize {
        self.codepoints
    }

    /// True if the string has no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Iterate over the codepoints.
    pub fn chars(&self) -> std::str::Chars<'_> {
        self.as_str().chars()
    }

    fn check_boundary(&self, index: usize) -> TextResult<()> {
        if index > self.data.len() {
            return Err(TextError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            });
        }
        if !self.as_str().is_char_boundary(index) {
            return Err(TextError::NotCharBoundary { index });
        }
        Ok(())
    }

    // ============================================================
    // Mutation
    // ============================================================

    /// Append raw bytes, dropping invalid ones.
    pub fn append(&mut self, data: impl AsRef<[u8]>) {
        let valid = filter_valid(data.as_ref());
        self.codepoints += count_codepoints(&valid);
        self.data.extend_from_slice(&valid);
    }

    /// Append a string slice.
    pub fn push_str(&mut self, s: &str) {
        self.codepoints += s.chars().count();
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Insert raw bytes at `byte_index`, dropping invalid ones.
    pub fn insert(&mut self, byte_index: usize, data: impl AsRef<[u8]>) -> TextResult<()> {
        self.check_boundary(byte_index)?;
        let valid = filter_valid(data.as_ref());
        self.codepoints += count_codepoints(&valid);
        self.data.splice(byte_index..byte_index, valid);
        Ok(())
    }

    /// Remove up to `count` codepoints starting at `byte_index`.
    ///
    /// Returns the number of codepoints actually removed, which is smaller
    /// than `count` when the end of the string is reached first.
    pub fn remove(&mut self, byte_index: usize, count: usize) -> TextResult<usize> {
        self.check_boundary(byte_index)?;
        let (end, removed) = self.as_str()[byte_index..]
            .char_indices()
            .map(|(i, c)| byte_index + i + c.len_utf8())
            .take(count)
            .fold((byte_index, 0), |(_, n), end| (end, n + 1));
        self.data.drain(byte_index..end);
        self.codepoints -= removed;
        Ok(removed)
    }

    /// Replace the first occurrence of `old` with `new`.
    ///
    /// Returns `false` when `old` is empty or absent.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        if old.is_empty() {
            return false;
        }
        match search::find(&self.data, old.as_bytes()) {
            Some(at) => {
                self.data.splice(at..at + old.len(), new.bytes());
                self.recount();
                true
            }
            None => false,
        }
    }

    /// Replace every non-overlapping occurrence of `old`, left to right.
    ///
    /// Returns the number of replacements; 0 when `old` is empty.
    pub fn replace_all(&mut self, old: &str, new: &str) -> usize {
        let hits: Vec<usize> = search::find_all(&self.data, old.as_bytes()).collect();
        if hits.is_empty() {
            return 0;
        }

        let mut out = Vec::with_capacity(self.data.len() - hits.len() * old.len() + hits.len() * new.len());
        let mut last = 0;
        for &at in &hits {
            out.extend_from_slice(&self.data[last..at]);
            out.extend_from_slice(new.as_bytes());
            last = at + old.len();
        }
        out.extend_from_slice(&self.data[last..]);
        self.data = out;
        self.recount();
        hits.len()
    }

    /// Reverse the codepoint order, keeping each sequence intact.
    pub fn reverse(&mut self) {
        let reversed: String = self.as_str().chars().rev().collect();
        self.data = reversed.into_bytes();
    }

    /// Map to lowercase in place.
    pub fn lower(&mut self) {
        let mapped = self.as_str().to_lowercase();
        *self = Self::from_valid(mapped.into_bytes());
    }

    /// Map to uppercase in place.
    pub fn upper(&mut self) {
        let mapped = self.as_str().to_uppercase();
        *self = Self::from_valid(mapped.into_bytes());
    }

    fn retain_range(&mut self, start: usize, end: usize) {
        if start == 0 && end == self.data.len() {
            return;
        }
        self.data.truncate(end);
        self.data.drain(..start);
        self.recount();
    }

    /// Strip leading whitespace.
    pub fn ltrim(&mut self) {
        let start = self.data.len() - self.as_str().trim_start().len();
        self.retain_range(start, self.data.len());
    }

    /// Strip trailing whitespace.
    pub fn rtrim(&mut self) {
        let end = self.as_str().trim_end().len();
        self.retain_range(0, end);
    }

    /// Strip whitespace from both ends.
    pub fn trim(&mut self) {
        self.rtrim();
        self.ltrim();
    }

    /// Strip any codepoint contained in `chars` from both ends.
    pub fn trim_chars(&mut self, chars: &str) {
        let mut set: Vec<char> = chars.chars().collect();
        set.sort_unstable();
        set.dedup();
        let s = self.as_str();
        let trimmed = s.trim_matches(|c: char| set.binary_search(&c).is_ok());
        let start = trimmed.as_ptr() as usize - s.as_ptr() as usize;
        let end = start + trimmed.len();
        self.retain_range(start, end);
    }

    /// Strip a single character from both ends, repeatedly.
    pub fn trim_char(&mut self, c: char) {
        let s = self.as_str();
        let trimmed = s.trim_matches(c);
        let start = trimmed.as_ptr() as usize - s.as_ptr() as usize;
        let end = start + trimmed.len();
        self.retain_range(start, end);
    }

    // ============================================================
    // Slicing and Searching
    // ============================================================

    /// Copy `byte_length` raw bytes from `byte_index`.
    ///
    /// Boundaries are not realigned; slicing through a multi-byte sequence
    /// yields bytes that are not valid UTF-8 on their own.
    pub fn substr(&self, byte_index: usize, byte_length: usize) -> TextResult<Vec<u8>> {
        let end = byte_index.saturating_add(byte_length);
        if end > self.data.len() {
            return Err(TextError::IndexOutOfBounds {
                index: end,
                len: self.data.len(),
            });
        }
        Ok(self.data[byte_index..end].to_vec())
    }

    /// Like [`substr`](Self::substr), but `None` unless both ends lie on
    /// codepoint boundaries.
    pub fn substring(&self, byte_index: usize, byte_length: usize) -> Option<Utf8String> {
        let end = byte_index.checked_add(byte_length)?;
        self.as_str()
            .get(byte_index..end)
            .map(|s| Self::from_valid(s.as_bytes().to_vec()))
    }

    /// Byte index of the first occurrence of `needle`.
    pub fn index_of(&self, needle: &str) -> Option<usize> {
        search::find(&self.data, needle.as_bytes())
    }

    /// Byte index of the last occurrence of `needle`.
    pub fn last_index_of(&self, needle: &str) -> Option<usize> {
        search::rfind(&self.data, needle.as_bytes())
    }

    /// True if the string begins with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.data.starts_with(prefix.as_bytes())
    }

    /// True if the string ends with `suffix`.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.data.ends_with(suffix.as_bytes())
    }

    /// True if `needle` occurs anywhere.
    pub fn contains(&self, needle: &str) -> bool {
        self.index_of(needle).is_some()
    }

    /// Byte-wise ordering.
    pub fn compare(&self, other: &Utf8String) -> Ordering {
        self.data.cmp(&other.data)
    }

    /// Byte-wise equality.
    pub fn equals(&self, other: &Utf8String) -> bool {
        self.data == other.data
    }

    /// Pieces between non-overlapping occurrences of `delim`, empty pieces
    /// included.
    pub fn split(&self, delim: &str) -> TextResult<Vec<Utf8String>> {
        if delim.is_empty() {
            return Err(TextError::EmptyPattern);
        }
        let mut parts = Vec::new();
        let mut last = 0;
        for at in search::find_all(&self.data, delim.as_bytes()) {
            parts.push(Self::from_valid(self.data[last..at].to_vec()));
            last = at + delim.len();
        }
        parts.push(Self::from_valid(self.data[last..].to_vec()));
        Ok(parts)
    }

    /// New string holding `self` followed by `other`.
    pub fn concat(&self, other: &Utf8String) -> Utf8String {
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Self {
            data,
            codepoints: self.codepoints + other.codepoints,
        }
    }

    // ============================================================
    // File I/O
    // ============================================================

    /// Write the bytes to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> TextResult<()> {
        fs::write(path, &self.data)?;
        Ok(())
    }

    /// Read a whole file, dropping invalid bytes.
    pub fn read_from(path: impl AsRef<Path>) -> TextResult<Self> {
        let path = path.as_ref();
        let raw = fs::read(path)?;
        let s = Self::new(&raw);
        if s.byte_length() != raw.len() {
            debug!(
                path = %path.display(),
                dropped = raw.len() - s.byte_length(),
                "read_from: filtered invalid utf-8"
            );
        }
        Ok(s)
    }
}

// ============================================================
// Trait Implementations
// ============================================================

impl fmt::Display for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl From<&str> for Utf8String {
    fn from(s: &str) -> Self {
        Self::from_valid(s.as_bytes().to_vec())
    }
}

impl From<String> for Utf8String {
    fn from(s: String) -> Self {
        Self::from_valid(s.into_bytes())
    }
}

impl From<Utf8String> for String {
    fn from(s: Utf8String) -> Self {
        // SAFETY: `Utf8String` bytes are always valid UTF-8.
        unsafe { String::from_utf8_unchecked(s.data) }
    }
}

impl AsRef<[u8]> for Utf8String {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<str> for Utf8String {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Utf8String {
    fn eq(&self, other: &str) -> bool {
        self.data == other.as_bytes()
    }
}

impl PartialEq<&str> for Utf8String {
    fn eq(&self, other: &&str) -> bool {
        self.data == other.as_bytes()
    }
}
