//! Checked integer arithmetic
//!
//! Overflow-aware addition, subtraction and multiplication over every
//! primitive integer width. Each operation returns the two's-complement
//! wrapped result together with a flag that is `true` exactly when the
//! mathematical result does not fit the type.
//!
//! # Example
//!
//! ```
//! use solidc_prelude::checked::{checked_add, checked_mul};
//!
//! assert_eq!(checked_add(i8::MAX, 1), (i8::MIN, true));
//! assert_eq!(checked_mul(6usize, 7), (42, false));
//! ```

/// Integer types supporting overflow-reporting arithmetic.
pub trait CheckedArith: Copy + Sized {
    /// `a + b` with the overflow flag.
    fn add_overflowing(self, rhs: Self) -> (Self, bool);
    /// `a - b` with the overflow flag.
    fn sub_overflowing(self, rhs: Self) -> (Self, bool);
    /// `a * b` with the overflow flag.
    fn mul_overflowing(self, rhs: Self) -> (Self, bool);
}

macro_rules! impl_checked_arith {
    ($($t:ty),* $(,)?) => {
        $(
            impl CheckedArith for $t {
                #[inline]
                fn add_overflowing(self, rhs: Self) -> (Self, bool) {
                    self.overflowing_add(rhs)
                }

                #[inline]
                fn sub_overflowing(self, rhs: Self) -> (Self, bool) {
                    self.overflowing_sub(rhs)
                }

                #[inline]
                fn mul_overflowing(self, rhs: Self) -> (Self, bool) {
                    self.overflowing_mul(rhs)
                }
            }
        )*
    };
}

impl_checked_arith!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Add two integers, reporting overflow.
#[inline]
pub fn checked_add<T: CheckedArith>(a: T, b: T) -> (T, bool) {
    a.add_overflowing(b)
}

/// Subtract two integers, reporting overflow.
#[inline]
pub fn checked_sub<T: CheckedArith>(a: T, b: T) -> (T, bool) {
    a.sub_overflowing(b)
}

/// Multiply two integers, reporting overflow.
#[inline]
pub fn checked_mul<T: CheckedArith>(a: T, b: T) -> (T, bool) {
    a.mul_overflowing(b)
}

/// Multiply two sizes, clamping to `usize::MAX` on overflow.
///
/// Used for capacity growth where a saturated request is preferable to a
/// wrapped (and therefore smaller) one.
#[inline]
pub fn saturating_size_mul(a: usize, b: usize) -> usize {
    match checked_mul(a, b) {
        (value, false) => value,
        (_, true) => usize::MAX,
    }
}

/// Add two sizes, clamping to `usize::MAX` on overflow.
#[inline]
pub fn saturating_size_add(a: usize, b: usize) -> usize {
    match checked_add(a, b) {
        (value, false) => value,
        (_, true) => usize::MAX,
    }
}
