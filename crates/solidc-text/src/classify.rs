//! Character classification.
//!
//! Codepoint predicates backed by the standard library's Unicode tables.
//! Values that are not Unicode scalar values (surrogates, anything above
//! `U+10FFFF`) belong to no class. The `is_utf8_*` variants classify the
//! leading codepoint of a byte slice.

use crate::codec::decode_sequence;

fn scalar(cp: u32) -> Option<char> {
    char::from_u32(cp)
}

/// Unicode `White_Space`.
pub fn is_codepoint_whitespace(cp: u32) -> bool {
    scalar(cp).is_some_and(char::is_whitespace)
}

/// ASCII decimal digit `0`-`9`.
pub fn is_codepoint_digit(cp: u32) -> bool {
    scalar(cp).is_some_and(|c| c.is_ascii_digit())
}

/// Unicode `Alphabetic`.
pub fn is_codepoint_alpha(cp: u32) -> bool {
    scalar(cp).is_some_and(char::is_alphabetic)
}

/// Alphabetic or numeric.
pub fn is_codepoint_alnum(cp: u32) -> bool {
    scalar(cp).is_some_and(char::is_alphanumeric)
}

/// Printable, not alphanumeric and not whitespace.
pub fn is_codepoint_punct(cp: u32) -> bool {
    scalar(cp).is_some_and(|c| {
        if c.is_ascii() {
            c.is_ascii_punctuation()
        } else {
            !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control()
        }
    })
}

fn leading(bytes: &[u8]) -> Option<u32> {
    decode_sequence(bytes).map(|(cp, _)| cp)
}

/// Classify the leading codepoint of `bytes` as whitespace.
pub fn is_utf8_whitespace(bytes: &[u8]) -> bool {
    leading(bytes).is_some_and(is_codepoint_whitespace)
}

/// Classify the leading codepoint of `bytes` as a digit.
pub fn is_utf8_digit(bytes: &[u8]) -> bool {
    leading(bytes).is_some_and(is_codepoint_digit)
}

/// Classify the leading codepoint of `bytes` as alphabetic.
pub fn is_utf8_alpha(bytes: &[u8]) -> bool {
    leading(bytes).is_some_and(is_codepoint_alpha)
}

/// Classify the leading codepoint of `bytes` as alphanumeric.
pub fn is_utf8_alnum(bytes: &[u8]) -> bool {
    leading(bytes).is_some_and(is_codepoint_alnum)
}

/// Classify the leading codepoint of `bytes` as punctuation.
pub fn is_utf8_punct(bytes: &[u8]) -> bool {
    leading(bytes).is_some_and(is_codepoint_punct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_classes() {
        assert!(is_codepoint_whitespace(u32::from(' ')));
        assert!(is_codepoint_whitespace(u32::from('\t')));
        assert!(is_codepoint_digit(u32::from('7')));
        assert!(is_codepoint_alpha(u32::from('q')));
        assert!(is_codepoint_alnum(u32::from('Z')));
        assert!(is_codepoint_punct(u32::from('!')));
        assert!(!is_codepoint_punct(u32::from('a')));
    }

    #[test]
    fn test_unicode_classes() {
        assert!(is_codepoint_whitespace(0x3000)); // ideographic space
        assert!(is_codepoint_alpha(u32::from('字')));
        assert!(!is_codepoint_digit(u32::from('٣')));
        assert!(is_codepoint_alnum(u32::from('٣')));
        assert!(is_codepoint_punct(u32::from('、')));
    }

    #[test]
    fn test_invalid_codepoints() {
        assert!(!is_codepoint_alpha(0xD800));
        assert!(!is_codepoint_whitespace(0x110000));
    }

    #[test]
    fn test_utf8_variants() {
        assert!(is_utf8_alpha("éclair".as_bytes()));
        assert!(is_utf8_whitespace("\u{00A0}x".as_bytes()));
        assert!(!is_utf8_digit(&[0xFF, b'1']));
        assert!(is_utf8_punct(",".as_bytes()));
        assert!(!is_utf8_alnum(&[]));
    }
}
