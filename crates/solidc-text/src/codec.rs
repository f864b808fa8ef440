//! UTF-8 codec
//!
//! Encoding and decoding of single codepoints plus whole-buffer validation.
//!
//! The decoder is strict: overlong forms, surrogates (`U+D800..=U+DFFF`),
//! values above `U+10FFFF`, truncated sequences and stray continuation bytes
//! are all rejected. The lenient entry points map every rejection to
//! [`REPLACEMENT_CHARACTER`].

/// `U+FFFD`, returned for any undecodable sequence.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// Largest Unicode scalar value.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

// Smallest codepoint that legitimately needs a sequence of each length.
const MIN_FOR_LEN: [u32; 5] = [0, 0, 0x80, 0x800, 0x10000];

// ============================================================
// Encoding
// ============================================================

/// Write the shortest UTF-8 encoding of `cp` into `out`.
///
/// Returns the number of bytes written, or 0 when `cp` exceeds
/// [`MAX_CODEPOINT`]. Surrogates are encoded as three bytes; rejecting them
/// is left to the decoder.
///
/// ```
/// use solidc_text::codec::codepoint_to_utf8;
///
/// let mut buf = [0u8; 4];
/// let n = codepoint_to_utf8(0x20AC, &mut buf);
/// assert_eq!(&buf[..n], "€".as_bytes());
/// ```
pub fn codepoint_to_utf8(cp: u32, out: &mut [u8; 4]) -> usize {
    match cp {
        0..=0x7F => {
            out[0] = cp as u8;
            1
        }
        0x80..=0x7FF => {
            out[0] = 0xC0 | (cp >> 6) as u8;
            out[1] = 0x80 | (cp & 0x3F) as u8;
            2
        }
        0x800..=0xFFFF => {
            out[0] = 0xE0 | (cp >> 12) as u8;
            out[1] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            out[2] = 0x80 | (cp & 0x3F) as u8;
            3
        }
        0x10000..=MAX_CODEPOINT => {
            out[0] = 0xF0 | (cp >> 18) as u8;
            out[1] = 0x80 | ((cp >> 12) & 0x3F) as u8;
            out[2] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            out[3] = 0x80 | (cp & 0x3F) as u8;
            4
        }
        _ => {
            out[0] = 0;
            0
        }
    }
}

/// Encode `cp` into a fresh buffer; empty when `cp` is out of range.
pub fn encode(cp: u32) -> Vec<u8> {
    let mut buf = [0u8; 4];
    let n = codepoint_to_utf8(cp, &mut buf);
    buf[..n].to_vec()
}

// ============================================================
// Decoding
// ============================================================

/// Sequence length announced by a leading byte: 1 to 4, or 0 for a
/// continuation byte or a byte of `0xF8` and above.
#[inline]
pub fn char_length(byte: u8) -> usize {
    if byte & 0x80 == 0 {
        1
    } else if byte & 0xE0 == 0xC0 {
        2
    } else if byte & 0xF0 == 0xE0 {
        3
    } else if byte & 0xF8 == 0xF0 {
        4
    } else {
        0
    }
}

/// Decode the sequence at the start of `bytes`.
///
/// Returns the codepoint and its encoded length, or `None` if the leading
/// sequence is malformed, truncated, overlong, a surrogate or out of range.
pub fn decode_sequence(bytes: &[u8]) -> Option<(u32, usize)> {
    let lead = *bytes.first()?;
    let len = char_length(lead);
    if len == 0 || bytes.len() < len {
        return None;
    }
    if len == 1 {
        return Some((u32::from(lead), 1));
    }

    let mut cp = u32::from(lead & (0x7F >> len));
    for &b in &bytes[1..len] {
        if b & 0xC0 != 0x80 {
            return None;
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }

    if cp < MIN_FOR_LEN[len] || (0xD800..=0xDFFF).contains(&cp) || cp > MAX_CODEPOINT {
        return None;
    }
    Some((cp, len))
}

/// Decode the leading codepoint of `bytes`, or [`REPLACEMENT_CHARACTER`]
/// when it is invalid or `bytes` is empty.
///
/// ```
/// use solidc_text::codec::{utf8_to_codepoint, REPLACEMENT_CHARACTER};
///
/// assert_eq!(utf8_to_codepoint("é".as_bytes()), 0xE9);
/// // Overlong two-byte encoding of 'A'.
/// assert_eq!(utf8_to_codepoint(&[0xC1, 0x81]), REPLACEMENT_CHARACTER);
/// ```
pub fn utf8_to_codepoint(bytes: &[u8]) -> u32 {
    decode_sequence(bytes).map_or(REPLACEMENT_CHARACTER, |(cp, _)| cp)
}

/// Lenient codepoint iterator: each invalid byte yields
/// [`REPLACEMENT_CHARACTER`] and decoding resumes at the next byte.
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
}

impl<'a> Codepoints<'a> {
    /// Iterate over the codepoints of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.bytes.is_empty() {
            return None;
        }
        let (cp, len) = decode_sequence(self.bytes).unwrap_or((REPLACEMENT_CHARACTER, 1));
        self.bytes = &self.bytes[len..];
        Some(cp)
    }
}

// ============================================================
// Whole-Buffer Operations
// ============================================================

/// Number of bytes that are not continuation bytes (`10xxxxxx`).
///
/// Equal to the number of codepoints for valid input.
pub fn count_codepoints(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

/// Total length of the complete, valid sequences in `bytes`.
pub fn valid_byte_count(bytes: &[u8]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < bytes.len() {
        match decode_sequence(&bytes[i..]) {
            Some((_, len)) => {
                total += len;
                i += len;
            }
            None => i += 1,
        }
    }
    total
}

/// Full structural validation.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok()
}

/// Copy the valid sequences of `bytes`, dropping every invalid byte.
pub fn filter_valid(bytes: &[u8]) -> Vec<u8> {
    if is_valid_utf8(bytes) {
        return bytes.to_vec();
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match decode_sequence(&bytes[i..]) {
            Some((_, len)) => {
                out.extend_from_slice(&bytes[i..i + len]);
                i += len;
            }
            None => i += 1,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lengths() {
        assert_eq!(encode(0x41), b"A");
        assert_eq!(encode(0xE9), "é".as_bytes());
        assert_eq!(encode(0x4E16), "世".as_bytes());
        assert_eq!(encode(0x1F600), "😀".as_bytes());
        assert!(encode(0x110000).is_empty());
    }

    #[test]
    fn test_encode_out_of_range_clears_first_byte() {
        let mut buf = [0xFFu8; 4];
        assert_eq!(codepoint_to_utf8(0x110000, &mut buf), 0);
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn test_encoder_does_not_reject_surrogates() {
        let bytes = encode(0xD800);
        assert_eq!(bytes, [0xED, 0xA0, 0x80]);
        assert_eq!(utf8_to_codepoint(&bytes), REPLACEMENT_CHARACTER);
    }

    #[test]
    fn test_char_length() {
        assert_eq!(char_length(b'a'), 1);
        assert_eq!(char_length(0xC3), 2);
        assert_eq!(char_length(0xE4), 3);
        assert_eq!(char_length(0xF0), 4);
        assert_eq!(char_length(0x80), 0);
        assert_eq!(char_length(0xF8), 0);
        assert_eq!(char_length(0xFF), 0);
    }

    #[test]
    fn test_decode_rejections() {
        // Bad continuation.
        assert_eq!(utf8_to_codepoint(&[0xC3, 0x28]), REPLACEMENT_CHARACTER);
        // Overlong three-byte slash.
        assert_eq!(utf8_to_codepoint(&[0xE0, 0x80, 0xAF]), REPLACEMENT_CHARACTER);
        // Above U+10FFFF.
        assert_eq!(utf8_to_codepoint(&[0xF4, 0x90, 0x80, 0x80]), REPLACEMENT_CHARACTER);
        // Truncated.
        assert_eq!(utf8_to_codepoint(&[0xE4, 0xB8]), REPLACEMENT_CHARACTER);
        assert_eq!(utf8_to_codepoint(&[]), REPLACEMENT_CHARACTER);
        assert_eq!(utf8_to_codepoint(&[0xF4, 0x8F, 0xBF, 0xBF]), MAX_CODEPOINT);
    }

    #[test]
    fn test_valid_byte_count_and_filter() {
        let mixed = [b'a', 0xFF, 0xC3, 0xA9, 0xE4, 0xB8, b'z'];
        assert_eq!(valid_byte_count(&mixed), 4);
        assert_eq!(filter_valid(&mixed), "aéz".as_bytes());
        assert!(!is_valid_utf8(&mixed));
        assert!(is_valid_utf8(&filter_valid(&mixed)));
    }

    #[test]
    fn test_codepoints_iterator() {
        let cps: Vec<u32> = Codepoints::new(&[b'h', 0xFF, 0xC3, 0xA9]).collect();
        assert_eq!(cps, vec![0x68, REPLACEMENT_CHARACTER, 0xE9]);
    }
}
