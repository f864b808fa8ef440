//! Byte-level search
//!
//! Search primitives over raw bytes. Because UTF-8 is self-synchronizing, a
//! match of a valid needle inside a valid haystack always starts and ends on
//! codepoint boundaries, so [`Utf8String`](crate::Utf8String) builds all of
//! its searching on these.

// ============================================================
// Byte Search
// ============================================================

/// First index of `byte`.
pub fn find_byte(haystack: &[u8], byte: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == byte)
}

/// Last index of `byte`.
pub fn rfind_byte(haystack: &[u8], byte: u8) -> Option<usize> {
    haystack.iter().rposition(|&b| b == byte)
}

/// Number of occurrences of `byte`.
pub fn count_byte(haystack: &[u8], byte: u8) -> usize {
    haystack.iter().filter(|&&b| b == byte).count()
}

/// True if every byte is ASCII.
pub fn is_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b < 0x80)
}

// ============================================================
// Substring Search
// ============================================================

/// First byte index of `needle`. An empty needle matches at 0.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    find_from(haystack, needle, 0)
}

/// First byte index of `needle` at or after `start`.
pub fn find_from(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if start > haystack.len() {
        return None;
    }
    let rest = &haystack[start..];
    let (&first, tail) = match needle.split_first() {
        Some(parts) => parts,
        None => return Some(start),
    };
    if needle.len() > rest.len() {
        return None;
    }

    // Anchor on the first byte, then compare the remainder.
    let last_start = rest.len() - needle.len();
    let mut offset = 0;
    while offset <= last_start {
        let hit = find_byte(&rest[offset..=last_start], first)?;
        let at = offset + hit;
        if &rest[at + 1..at + needle.len()] == tail {
            return Some(start + at);
        }
        offset = at + 1;
    }
    None
}

/// Last byte index of `needle`. An empty needle matches at the end.
pub fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    if needle.is_empty() {
        return Some(haystack.len());
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Iterator over the start indices of non-overlapping matches, left to right.
#[derive(Debug, Clone)]
pub struct Matches<'h, 'n> {
    haystack: &'h [u8],
    needle: &'n [u8],
    pos: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let at = find_from(self.haystack, self.needle, self.pos)?;
        self.pos = at + self.needle.len();
        Some(at)
    }
}

/// Non-overlapping matches of a non-empty `needle`.
///
/// An empty needle yields nothing.
pub fn find_all<'h, 'n>(haystack: &'h [u8], needle: &'n [u8]) -> Matches<'h, 'n> {
    Matches {
        haystack,
        needle,
        pos: if needle.is_empty() { haystack.len() + 1 } else { 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_search() {
        let s = b"hello world";
        assert_eq!(find_byte(s, b'o'), Some(4));
        assert_eq!(rfind_byte(s, b'o'), Some(7));
        assert_eq!(count_byte(s, b'l'), 3);
        assert_eq!(find_byte(s, b'z'), None);
    }

    #[test]
    fn test_find() {
        let s = b"abcabcab";
        assert_eq!(find(s, b"cab"), Some(2));
        assert_eq!(find_from(s, b"cab", 3), Some(5));
        assert_eq!(find(s, b"abd"), None);
        assert_eq!(find(s, b""), Some(0));
        assert_eq!(find(b"ab", b"abc"), None);
        assert_eq!(rfind(s, b"ab"), Some(6));
        assert_eq!(rfind(s, b""), Some(8));
    }

    #[test]
    fn test_find_all_non_overlapping() {
        let hits: Vec<usize> = find_all(b"aaaa", b"aa").collect();
        assert_eq!(hits, vec![0, 2]);
        assert_eq!(find_all(b"abc", b"").count(), 0);
    }

    #[test]
    fn test_multibyte_needle() {
        let s = "a世b世c".as_bytes();
        let hits: Vec<usize> = find_all(s, "世".as_bytes()).collect();
        assert_eq!(hits, vec![1, 5]);
    }

    #[test]
    fn test_is_ascii() {
        assert!(is_ascii(b"plain"));
        assert!(!is_ascii("é".as_bytes()));
    }
}
