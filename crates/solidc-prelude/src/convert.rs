//! Numeric string conversion
//!
//! Strict parsers for integers, floats and booleans. Every parser reports
//! one of three outcomes:
//!
//! - **Success** - the whole input was consumed and the value fits the target
//! - **Invalid** - empty input, no digits, or trailing characters
//! - **Overflow** - well-formed input whose value does not fit the target
//!
//! Leading whitespace and an optional sign are accepted, as C's
//! `strtoimax`/`strtod` do. Trailing characters of any kind (including
//! whitespace) make the input invalid.
//!
//! # Example
//!
//! ```
//! use solidc_prelude::convert::{str_to_int_base, str_to_u8, ConvertError};
//!
//! assert_eq!(str_to_int_base("1a", 16), Ok(26));
//! assert_eq!(str_to_u8("256"), Err(ConvertError::Overflow));
//! assert_eq!(str_to_u8("12abc"), Err(ConvertError::Invalid));
//! ```

use std::ffi::{c_long, c_ulong};
use thiserror::Error;

/// Why a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConvertError {
    /// The input is not a complete, well-formed literal.
    #[error("invalid input: not a complete numeric literal")]
    Invalid,
    /// The literal is well-formed but out of range for the target type.
    #[error("value out of range for the target type")]
    Overflow,
}

/// Tri-state conversion outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertStatus {
    /// The conversion succeeded.
    Success,
    /// The input was malformed.
    Invalid,
    /// The value did not fit.
    Overflow,
}

impl From<ConvertError> for ConvertStatus {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Invalid => ConvertStatus::Invalid,
            ConvertError::Overflow => ConvertStatus::Overflow,
        }
    }
}

impl<T> From<&Result<T, ConvertError>> for ConvertStatus {
    fn from(result: &Result<T, ConvertError>) -> Self {
        match result {
            Ok(_) => ConvertStatus::Success,
            Err(err) => (*err).into(),
        }
    }
}

/// Stable English diagnostic for a conversion outcome.
pub fn error_string(status: ConvertStatus) -> &'static str {
    match status {
        ConvertStatus::Success => "conversion successful",
        ConvertStatus::Invalid => "invalid input: not a complete numeric literal",
        ConvertStatus::Overflow => "value out of range for the target type",
    }
}

// ============================================================
// Integer parsing
// ============================================================

/// Integer types that can be produced from a sign and a magnitude.
pub trait ParseInt: Sized {
    /// Build the value, or `None` when it does not fit.
    fn from_sign_magnitude(negative: bool, magnitude: u128) -> Option<Self>;
}

macro_rules! impl_parse_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl ParseInt for $t {
                fn from_sign_magnitude(negative: bool, magnitude: u128) -> Option<Self> {
                    let value = if negative {
                        if magnitude > i128::MAX as u128 + 1 {
                            return None;
                        }
                        (magnitude as i128).wrapping_neg()
                    } else {
                        i128::try_from(magnitude).ok()?
                    };
                    <$t>::try_from(value).ok()
                }
            }
        )*
    };
}

macro_rules! impl_parse_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl ParseInt for $t {
                fn from_sign_magnitude(negative: bool, magnitude: u128) -> Option<Self> {
                    if negative && magnitude != 0 {
                        return None;
                    }
                    <$t>::try_from(magnitude).ok()
                }
            }
        )*
    };
}

impl_parse_signed!(i8, i16, i32, i64, isize);
impl_parse_unsigned!(u8, u16, u32, u64, usize);

/// C `isspace` set, which includes vertical tab.
fn is_c_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn has_hex_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() > 2 && b[0] == b'0' && (b[1] == b'x' || b[1] == b'X') && b[2].is_ascii_hexdigit()
}

/// Parse sign and magnitude. Overflow of the `u128` accumulator is reported
/// only after the whole input has been checked for trailing characters.
fn parse_magnitude(s: &str, base: u32) -> Result<(bool, u128), ConvertError> {
    if base == 1 || base > 36 {
        return Err(ConvertError::Invalid);
    }

    let s = s.trim_start_matches(is_c_space);
    let (negative, mut rest) = split_sign(s);

    let radix = match base {
        0 if has_hex_prefix(rest) => {
            rest = &rest[2..];
            16
        }
        0 if rest.len() > 1 && rest.starts_with('0') => 8,
        0 => 10,
        16 if has_hex_prefix(rest) => {
            rest = &rest[2..];
            16
        }
        b => b,
    };

    if rest.is_empty() {
        return Err(ConvertError::Invalid);
    }

    let mut magnitude: u128 = 0;
    let mut overflowed = false;
    for c in rest.chars() {
        let digit = c.to_digit(radix).ok_or(ConvertError::Invalid)?;
        match magnitude
            .checked_mul(u128::from(radix))
            .and_then(|m| m.checked_add(u128::from(digit)))
        {
            Some(m) => magnitude = m,
            None => overflowed = true,
        }
    }

    if overflowed {
        return Err(ConvertError::Overflow);
    }
    Ok((negative, magnitude))
}

/// Parse an integer of any supported width in the given base.
///
/// `base` is `0` (auto-detect `0x` hex and leading-`0` octal) or `2..=36`.
pub fn parse_int<T: ParseInt>(s: &str, base: u32) -> Result<T, ConvertError> {
    let (negative, magnitude) = parse_magnitude(s, base)?;
    T::from_sign_magnitude(negative, magnitude).ok_or(ConvertError::Overflow)
}

macro_rules! decimal_parser {
    ($($(#[$meta:meta])* $name:ident -> $t:ty;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(s: &str) -> Result<$t, ConvertError> {
                parse_int::<$t>(s, 10)
            }
        )*
    };
}

decimal_parser! {
    /// Parse a decimal `u8`.
    str_to_u8 -> u8;
    /// Parse a decimal `i8`.
    str_to_i8 -> i8;
    /// Parse a decimal `u16`.
    str_to_u16 -> u16;
    /// Parse a decimal `i16`.
    str_to_i16 -> i16;
    /// Parse a decimal `u32`.
    str_to_u32 -> u32;
    /// Parse a decimal `i32`.
    str_to_i32 -> i32;
    /// Parse a decimal `u64`.
    str_to_u64 -> u64;
    /// Parse a decimal `i64`.
    str_to_i64 -> i64;
    /// Parse a decimal `unsigned int`.
    str_to_uint -> u32;
    /// Parse a decimal `int`.
    str_to_int -> i32;
    /// Parse a decimal `unsigned long`.
    str_to_ulong -> c_ulong;
    /// Parse a decimal `long`.
    str_to_long -> c_long;
    /// Parse a decimal pointer-sized unsigned integer.
    str_to_uintptr -> usize;
}

/// Parse an `int` in `base`.
pub fn str_to_int_base(s: &str, base: u32) -> Result<i32, ConvertError> {
    parse_int(s, base)
}

/// Parse a `long` in `base`.
pub fn str_to_long_base(s: &str, base: u32) -> Result<c_long, ConvertError> {
    parse_int(s, base)
}

/// Parse an `unsigned long` in `base`.
pub fn str_to_ulong_base(s: &str, base: u32) -> Result<c_ulong, ConvertError> {
    parse_int(s, base)
}

// ============================================================
// Float parsing
// ============================================================

fn is_infinity_literal(s: &str) -> bool {
    let (_, digits) = split_sign(s);
    digits
        .get(..3)
        .map_or(false, |head| head.eq_ignore_ascii_case("inf"))
}

fn parse_float<T>(s: &str) -> Result<T, ConvertError>
where
    T: std::str::FromStr + Copy,
    T: Into<f64>,
{
    let trimmed = s.trim_start_matches(is_c_space);
    if trimmed.is_empty() {
        return Err(ConvertError::Invalid);
    }
    let value: T = trimmed.parse().map_err(|_| ConvertError::Invalid)?;
    if value.into().is_infinite() && !is_infinity_literal(trimmed) {
        return Err(ConvertError::Overflow);
    }
    Ok(value)
}

/// Parse an `f32`. Finite literals beyond `f32::MAX` are `Overflow`.
pub fn str_to_float(s: &str) -> Result<f32, ConvertError> {
    parse_float(s)
}

/// Parse an `f64`. Finite literals beyond `f64::MAX` are `Overflow`.
pub fn str_to_double(s: &str) -> Result<f64, ConvertError> {
    parse_float(s)
}

// ============================================================
// Booleans
// ============================================================

/// Parse a boolean word, case-insensitively.
///
/// `true`, `yes`, `on`, `1` are true; `false`, `no`, `off`, `0` are false.
pub fn str_to_bool(s: &str) -> Result<bool, ConvertError> {
    const TRUE_WORDS: [&str; 4] = ["true", "yes", "on", "1"];
    const FALSE_WORDS: [&str; 4] = ["false", "no", "off", "0"];

    if TRUE_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        Ok(true)
    } else if FALSE_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        Ok(false)
    } else {
        Err(ConvertError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_overflow_leaves_binding() {
        let mut out: u8 = 7;
        match str_to_u8("256") {
            Ok(v) => out = v,
            Err(e) => assert_eq!(e, ConvertError::Overflow),
        }
        assert_eq!(out, 7);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(str_to_int("abc"), Err(ConvertError::Invalid));
        assert_eq!(str_to_int(""), Err(ConvertError::Invalid));
        assert_eq!(str_to_int("   "), Err(ConvertError::Invalid));
        assert_eq!(str_to_int("-"), Err(ConvertError::Invalid));
        assert_eq!(str_to_int("12 "), Err(ConvertError::Invalid));
        assert_eq!(str_to_int("1.5"), Err(ConvertError::Invalid));
    }

    #[test]
    fn test_leading_whitespace_and_sign() {
        assert_eq!(str_to_int("  -42"), Ok(-42));
        assert_eq!(str_to_int("\t+17"), Ok(17));
        assert_eq!(str_to_i8("-128"), Ok(i8::MIN));
        assert_eq!(str_to_i8("-129"), Err(ConvertError::Overflow));
    }

    #[test]
    fn test_bases() {
        assert_eq!(str_to_int_base("1a", 16), Ok(26));
        assert_eq!(str_to_int_base("0x1A", 16), Ok(26));
        assert_eq!(str_to_int_base("12", 8), Ok(10));
        assert_eq!(str_to_int_base("1010", 2), Ok(10));
        assert_eq!(str_to_int_base("z", 36), Ok(35));
        assert_eq!(str_to_int_base("0x10", 0), Ok(16));
        assert_eq!(str_to_int_base("010", 0), Ok(8));
        assert_eq!(str_to_int_base("0", 0), Ok(0));
        assert_eq!(str_to_int_base("2", 2), Err(ConvertError::Invalid));
        assert_eq!(str_to_int_base("10", 1), Err(ConvertError::Invalid));
        assert_eq!(str_to_int_base("10", 37), Err(ConvertError::Invalid));
        assert_eq!(str_to_int_base("0x", 16), Err(ConvertError::Invalid));
    }

    #[test]
    fn test_unsigned_negative() {
        assert_eq!(str_to_u32("-0"), Ok(0));
        assert_eq!(str_to_u32("-1"), Err(ConvertError::Overflow));
    }

    #[test]
    fn test_wide_overflow() {
        assert_eq!(str_to_u64("18446744073709551615"), Ok(u64::MAX));
        assert_eq!(
            str_to_u64("18446744073709551616"),
            Err(ConvertError::Overflow)
        );
        assert_eq!(
            str_to_i64("999999999999999999999999999999999999999999999"),
            Err(ConvertError::Overflow)
        );
        assert_eq!(
            str_to_i64("99999999999999999999999999999999999999999x"),
            Err(ConvertError::Invalid)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(str_to_double("3.25"), Ok(3.25));
        assert_eq!(str_to_double("  -1e3"), Ok(-1000.0));
        assert_eq!(str_to_double("1e400"), Err(ConvertError::Overflow));
        assert_eq!(str_to_float("1e39"), Err(ConvertError::Overflow));
        assert_eq!(str_to_double("inf"), Ok(f64::INFINITY));
        assert_eq!(str_to_double("-Infinity"), Ok(f64::NEG_INFINITY));
        assert!(str_to_double("nan").unwrap().is_nan());
        assert_eq!(str_to_double("1.0x"), Err(ConvertError::Invalid));
        assert_eq!(str_to_double(""), Err(ConvertError::Invalid));
    }

    #[test]
    fn test_bool() {
        assert_eq!(str_to_bool("YES"), Ok(true));
        assert_eq!(str_to_bool("On"), Ok(true));
        assert_eq!(str_to_bool("0"), Ok(false));
        assert_eq!(str_to_bool("off"), Ok(false));
        assert_eq!(str_to_bool("maybe"), Err(ConvertError::Invalid));
    }

    #[test]
    fn test_error_string_is_stable() {
        assert_eq!(error_string(ConvertStatus::Success), "conversion successful");
        let status = ConvertStatus::from(&str_to_u8("300"));
        assert_eq!(status, ConvertStatus::Overflow);
        assert_eq!(error_string(status), ConvertError::Overflow.to_string());
    }
}
