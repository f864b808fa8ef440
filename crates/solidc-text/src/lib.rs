//! solidc Text Library
//!
//! UTF-8 strings that are valid by construction.
//!
//! # Modules
//!
//! - [`codec`] - codepoint encoding/decoding and structural validation
//! - [`classify`] - Unicode character-class predicates
//! - [`search`] - byte and substring search primitives
//! - [`text`] - the owned, mutable [`Utf8String`]
//!
//! # Invalid input
//!
//! Construction never fails on malformed bytes. Invalid sequences are
//! dropped and the surviving complete sequences are kept, so a string built
//! from partially corrupt input is still usable.

#![warn(missing_docs)]

use thiserror::Error;

pub mod classify;
pub mod codec;
pub mod search;
pub mod text;

pub use codec::{
    char_length, codepoint_to_utf8, count_codepoints, is_valid_utf8, utf8_to_codepoint,
    valid_byte_count, REPLACEMENT_CHARACTER,
};
pub use text::Utf8String;

/// Errors from string mutation and file I/O.
#[derive(Debug, Error)]
pub enum TextError {
    /// A byte index or range end lies past the end of the string.
    #[error("byte index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Byte length of the string.
        len: usize,
    },

    /// A byte index falls inside a multi-byte sequence.
    #[error("byte index {index} is not on a codepoint boundary")]
    NotCharBoundary {
        /// Offending index.
        index: usize,
    },

    /// A delimiter or pattern was empty.
    #[error("pattern must not be empty")]
    EmptyPattern,

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for text operations.
pub type TextResult<T> = Result<T, TextError>;
