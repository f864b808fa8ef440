//! Floating-point comparison
//!
//! Equality of floating-point values under four policies:
//!
//! | Mode | Rule |
//! |------|------|
//! | `Absolute` | `|a - b| <= epsilon` |
//! | `Relative` | `|a - b| <= epsilon * max(|a|, |b|)` |
//! | `Ulps` | IEEE-754 bit-pattern distance `<= max_ulps` |
//! | `Combined` | `Absolute` or `Relative` |
//!
//! The dispatching entry points ([`cmp_float`], [`cmp_double`],
//! [`cmp_long_double`]) resolve NaN and infinity before applying the mode:
//! NaN equals NaN, and an infinity equals only the infinity of the same sign.
//!
//! # Example
//!
//! ```
//! use solidc_prelude::float_cmp::{cmp_double, CmpConfig};
//!
//! let cfg = CmpConfig::relative(1e-9);
//! assert!(cmp_double(0.1 + 0.2, 0.3, cfg));
//! assert!(cmp_double(f64::NAN, f64::NAN, cfg));
//! assert!(!cmp_double(f64::INFINITY, f64::NEG_INFINITY, cfg));
//! ```

/// Comparison policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CmpMode {
    /// `|a - b| <= epsilon`
    Absolute,
    /// `|a - b| <= epsilon * max(|a|, |b|)`
    Relative,
    /// Bit-pattern distance `<= max_ulps`
    Ulps,
    /// Absolute or relative
    #[default]
    Combined,
}

/// Immutable comparison configuration, passed by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CmpConfig {
    /// Which rule to apply.
    pub mode: CmpMode,
    /// Tolerance for the absolute and relative rules.
    pub epsilon: f64,
    /// Tolerance for the ULPs rule.
    pub max_ulps: u64,
}

impl Default for CmpConfig {
    fn default() -> Self {
        Self {
            mode: CmpMode::Combined,
            epsilon: 1e-6,
            max_ulps: 4,
        }
    }
}

impl CmpConfig {
    /// Absolute tolerance comparison.
    pub fn absolute(epsilon: f64) -> Self {
        Self {
            mode: CmpMode::Absolute,
            epsilon,
            ..Self::default()
        }
    }

    /// Relative tolerance comparison.
    pub fn relative(epsilon: f64) -> Self {
        Self {
            mode: CmpMode::Relative,
            epsilon,
            ..Self::default()
        }
    }

    /// ULP distance comparison.
    pub fn ulps(max_ulps: u64) -> Self {
        Self {
            mode: CmpMode::Ulps,
            max_ulps,
            ..Self::default()
        }
    }

    /// Absolute-or-relative comparison.
    pub fn combined(epsilon: f64) -> Self {
        Self {
            mode: CmpMode::Combined,
            epsilon,
            ..Self::default()
        }
    }

    /// Replace the epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Replace the ULP tolerance.
    pub fn with_max_ulps(mut self, max_ulps: u64) -> Self {
        self.max_ulps = max_ulps;
        self
    }
}

/// IEEE-754 types the comparison primitives operate on.
pub trait FloatBits: Copy + PartialEq {
    /// Widen to `f64` (exact for `f32`).
    fn to_f64(self) -> f64;

    /// Bit pattern reinterpreted as a signed integer whose ordering matches
    /// the float ordering (negative values remapped through `MIN - bits`).
    fn ordered_bits(self) -> i64;

    /// Whether the value is NaN.
    fn is_nan_value(self) -> bool;

    /// Whether the value is positive or negative infinity.
    fn is_infinite_value(self) -> bool;

    /// Whether the sign bit is set.
    fn is_negative(self) -> bool;
}

impl FloatBits for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn ordered_bits(self) -> i64 {
        let bits = self.to_bits() as i32;
        let mapped = if bits < 0 {
            i32::MIN.wrapping_sub(bits)
        } else {
            bits
        };
        i64::from(mapped)
    }

    #[inline]
    fn is_nan_value(self) -> bool {
        self.is_nan()
    }

    #[inline]
    fn is_infinite_value(self) -> bool {
        self.is_infinite()
    }

    #[inline]
    fn is_negative(self) -> bool {
        self.is_sign_negative()
    }
}

impl FloatBits for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn ordered_bits(self) -> i64 {
        let bits = self.to_bits() as i64;
        if bits < 0 {
            i64::MIN.wrapping_sub(bits)
        } else {
            bits
        }
    }

    #[inline]
    fn is_nan_value(self) -> bool {
        self.is_nan()
    }

    #[inline]
    fn is_infinite_value(self) -> bool {
        self.is_infinite()
    }

    #[inline]
    fn is_negative(self) -> bool {
        self.is_sign_negative()
    }
}

// ============================================================
// Primitives
// ============================================================

/// `|a - b| <= epsilon`
pub fn cmp_absolute<F: FloatBits>(a: F, b: F, epsilon: f64) -> bool {
    (a.to_f64() - b.to_f64()).abs() <= epsilon
}

/// `|a - b| <= epsilon * max(|a|, |b|)`
pub fn cmp_relative<F: FloatBits>(a: F, b: F, epsilon: f64) -> bool {
    let (a, b) = (a.to_f64(), b.to_f64());
    let largest = a.abs().max(b.abs());
    (a - b).abs() <= epsilon * largest
}

/// Bit-pattern distance comparison.
///
/// Values of different sign compare equal only when both are zero.
pub fn cmp_ulps<F: FloatBits>(a: F, b: F, max_ulps: u64) -> bool {
    if a.is_negative() != b.is_negative() {
        return cmp_is_zero(a, 0.0) && cmp_is_zero(b, 0.0);
    }
    ulps_distance(a, b) <= u128::from(max_ulps)
}

/// Absolute or relative.
pub fn cmp_combined<F: FloatBits>(a: F, b: F, epsilon: f64) -> bool {
    cmp_absolute(a, b, epsilon) || cmp_relative(a, b, epsilon)
}

/// `|x| <= epsilon`; with `epsilon = 0` this recognises both signed zeros.
pub fn cmp_is_zero<F: FloatBits>(x: F, epsilon: f64) -> bool {
    x.to_f64().abs() <= epsilon
}

/// Resolve NaN and infinity.
///
/// Returns `Some(result)` when either operand is special, `None` when both
/// are finite and the configured mode should decide.
pub fn cmp_special_cases<F: FloatBits>(a: F, b: F) -> Option<bool> {
    if a.is_nan_value() || b.is_nan_value() {
        return Some(a.is_nan_value() && b.is_nan_value());
    }
    if a.is_infinite_value() || b.is_infinite_value() {
        return Some(a == b);
    }
    None
}

/// Distance between two values in units in the last place.
pub fn ulps_distance<F: FloatBits>(a: F, b: F) -> u128 {
    let (ia, ib) = (i128::from(a.ordered_bits()), i128::from(b.ordered_bits()));
    (ia - ib).unsigned_abs()
}

fn cmp_dispatch<F: FloatBits>(a: F, b: F, config: CmpConfig) -> bool {
    if let Some(result) = cmp_special_cases(a, b) {
        return result;
    }
    match config.mode {
        CmpMode::Absolute => cmp_absolute(a, b, config.epsilon),
        CmpMode::Relative => cmp_relative(a, b, config.epsilon),
        CmpMode::Ulps => cmp_ulps(a, b, config.max_ulps),
        CmpMode::Combined => cmp_combined(a, b, config.epsilon),
    }
}

// ============================================================
// Entry points
// ============================================================

/// Compare two `f32` values under `config`.
pub fn cmp_float(a: f32, b: f32, config: CmpConfig) -> bool {
    cmp_dispatch(a, b, config)
}

/// Compare two `f64` values under `config`.
pub fn cmp_double(a: f64, b: f64, config: CmpConfig) -> bool {
    cmp_dispatch(a, b, config)
}

/// Compare two extended-precision values under `config`.
///
/// Rust has no extended-precision float; this is the `f64` comparison.
pub fn cmp_long_double(a: f64, b: f64, config: CmpConfig) -> bool {
    cmp_dispatch(a, b, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute() {
        assert!(cmp_absolute(1.0f64, 1.0005, 1e-3));
        assert!(!cmp_absolute(1.0f64, 1.01, 1e-3));
    }

    #[test]
    fn test_relative_scales_with_magnitude() {
        assert!(cmp_relative(1_000_000.0f64, 1_000_001.0, 1e-5));
        assert!(!cmp_relative(1.0f64, 2.0, 1e-5));
    }

    #[test]
    fn test_ulps_adjacent() {
        let a = 1.0f32;
        let b = f32::from_bits(a.to_bits() + 3);
        assert!(cmp_ulps(a, b, 3));
        assert!(!cmp_ulps(a, b, 2));
        assert_eq!(ulps_distance(a, b), 3);
    }

    #[test]
    fn test_ulps_across_zero() {
        assert!(cmp_ulps(0.0f64, -0.0, 0));
        assert!(!cmp_ulps(f64::MIN_POSITIVE, -f64::MIN_POSITIVE, u64::MAX));
    }

    #[test]
    fn test_ulps_negative_ordering() {
        let a = -1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        assert_eq!(ulps_distance(a, b), 1);
        assert!(b < a);
    }

    #[test]
    fn test_special_cases() {
        let cfg = CmpConfig::default();
        assert!(cmp_float(f32::NAN, f32::NAN, cfg));
        assert!(!cmp_float(f32::NAN, 0.0, cfg));
        assert!(cmp_float(f32::INFINITY, f32::INFINITY, cfg));
        assert!(cmp_float(f32::NEG_INFINITY, f32::NEG_INFINITY, cfg));
        assert!(!cmp_float(f32::INFINITY, f32::NEG_INFINITY, cfg));
        assert!(!cmp_float(f32::INFINITY, f32::MAX, cfg));
    }

    #[test]
    fn test_combined() {
        let cfg = CmpConfig::combined(1e-6);
        assert!(cmp_double(0.0, 1e-7, cfg));
        assert!(cmp_double(1e12, 1e12 + 1.0, cfg));
        assert!(!cmp_double(1.0, 1.1, cfg));
    }

    #[test]
    fn test_long_double_alias() {
        assert!(cmp_long_double(2.0, 2.0, CmpConfig::ulps(0)));
    }
}
