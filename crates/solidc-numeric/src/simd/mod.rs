//! Portable 128-bit SIMD vector.
//!
//! [`F32x4`] wraps one hardware register of four `f32` lanes. The backend is
//! chosen at compile time:
//!
//! - `sse` on x86/x86_64 with SSE2 (SSE4.1 and FMA fast paths when enabled)
//! - `neon` on aarch64
//! - `scalar` everywhere else, or whenever the `scalar` feature is on
//!
//! All backends produce identical results, except that [`F32x4::rsqrt`] and
//! [`F32x4::rcp`] are approximations on the hardware backends.
//!
//! # Masks
//!
//! Comparisons return a mask vector with each lane all-ones (true) or
//! all-zeros (false). Masks feed [`F32x4::blend`], the bitwise operators and
//! [`F32x4::movemask`].
//!
//! # Example
//!
//! ```
//! use solidc_numeric::F32x4;
//!
//! let a = F32x4::new(1.0, 2.0, 3.0, 4.0);
//! let b = F32x4::splat(2.0);
//! assert_eq!((a * b).to_array(), [2.0, 4.0, 6.0, 8.0]);
//! assert_eq!(a.hadd(), 10.0);
//! ```

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "scalar")
))]
mod sse;
#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "scalar")
))]
use sse as imp;

#[cfg(all(target_arch = "aarch64", target_feature = "neon", not(feature = "scalar")))]
mod neon;
#[cfg(all(target_arch = "aarch64", target_feature = "neon", not(feature = "scalar")))]
use neon as imp;

mod scalar;
#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2",
        not(feature = "scalar")
    ),
    all(target_arch = "aarch64", target_feature = "neon", not(feature = "scalar"))
)))]
use scalar as imp;

/// Name of the backend compiled into this build.
pub const BACKEND: &str = imp::NAME;

/// Four packed `f32` lanes `(x, y, z, w)`, 16-byte aligned.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct F32x4(imp::Raw);

impl F32x4 {
    // ========================================================================
    // Construction
    // ========================================================================

    /// All lanes zero.
    #[inline]
    pub fn zero() -> Self {
        Self(imp::zero())
    }

    /// Build from four lanes.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(imp::set(x, y, z, w))
    }

    /// Broadcast one value to all lanes.
    #[inline]
    pub fn splat(s: f32) -> Self {
        Self(imp::splat(s))
    }

    /// Load from an array (no alignment requirement).
    #[inline]
    pub fn from_array(a: [f32; 4]) -> Self {
        Self(imp::from_array(a))
    }

    /// Load the first four elements of a slice.
    ///
    /// Returns `None` if the slice is shorter than four elements.
    #[inline]
    pub fn load(src: &[f32]) -> Option<Self> {
        let lanes: [f32; 4] = src.get(..4)?.try_into().ok()?;
        Some(Self::from_array(lanes))
    }

    /// Build a vector from raw lane bit patterns.
    #[inline]
    pub fn from_bits(bits: [u32; 4]) -> Self {
        Self::from_array(bits.map(f32::from_bits))
    }

    /// A mask with the given lanes set.
    #[inline]
    pub fn mask(x: bool, y: bool, z: bool, w: bool) -> Self {
        let lane = |b: bool| if b { u32::MAX } else { 0 };
        Self::from_bits([lane(x), lane(y), lane(z), lane(w)])
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Copy the lanes out.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        imp::to_array(self.0)
    }

    /// Store the lanes into the first four elements of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than four elements.
    #[inline]
    pub fn store(self, dst: &mut [f32]) {
        dst[..4].copy_from_slice(&self.to_array());
    }

    /// Lane bit patterns.
    #[inline]
    pub fn to_bits(self) -> [u32; 4] {
        self.to_array().map(f32::to_bits)
    }

    /// Lane 0.
    #[inline]
    pub fn x(self) -> f32 {
        self.to_array()[0]
    }

    /// Lane 1.
    #[inline]
    pub fn y(self) -> f32 {
        self.to_array()[1]
    }

    /// Lane 2.
    #[inline]
    pub fn z(self) -> f32 {
        self.to_array()[2]
    }

    /// Lane 3.
    #[inline]
    pub fn w(self) -> f32 {
        self.to_array()[3]
    }

    /// Lane `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    pub fn lane(self, i: usize) -> f32 {
        self.to_array()[i]
    }

    /// Copy of `self` with lane `i` replaced.
    #[inline]
    pub fn with_lane(self, i: usize, value: f32) -> Self {
        let mut a = self.to_array();
        a[i] = value;
        Self::from_array(a)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Lane-wise `self * b + c`, fused where the target supports it.
    #[inline]
    pub fn madd(self, b: Self, c: Self) -> Self {
        Self(imp::madd(self.0, b.0, c.0))
    }

    /// Lane-wise minimum. When a lane is NaN the lane of `other` is returned.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(imp::min(self.0, other.0))
    }

    /// Lane-wise maximum. When a lane is NaN the lane of `other` is returned.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(imp::max(self.0, other.0))
    }

    /// Lane-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self(imp::abs(self.0))
    }

    /// Lane-wise square root.
    #[inline]
    pub fn sqrt(self) -> Self {
        Self(imp::sqrt(self.0))
    }

    /// Approximate `1 / sqrt(x)` per lane.
    #[inline]
    pub fn rsqrt(self) -> Self {
        Self(imp::rsqrt(self.0))
    }

    /// Approximate `1 / x` per lane.
    #[inline]
    pub fn rcp(self) -> Self {
        Self(imp::rcp(self.0))
    }

    /// Round toward negative infinity.
    #[inline]
    pub fn floor(self) -> Self {
        Self(imp::floor(self.0))
    }

    /// Round toward positive infinity.
    #[inline]
    pub fn ceil(self) -> Self {
        Self(imp::ceil(self.0))
    }

    /// Round to nearest, ties to even.
    #[inline]
    pub fn round(self) -> Self {
        Self(imp::round(self.0))
    }

    // ========================================================================
    // Comparison and Masks
    // ========================================================================

    /// Lane-wise `==` mask.
    #[inline]
    pub fn cmp_eq(self, other: Self) -> Self {
        Self(imp::cmpeq(self.0, other.0))
    }

    /// Lane-wise `!=` mask (true for NaN lanes).
    #[inline]
    pub fn cmp_neq(self, other: Self) -> Self {
        Self(imp::cmpneq(self.0, other.0))
    }

    /// Lane-wise `<` mask.
    #[inline]
    pub fn cmp_lt(self, other: Self) -> Self {
        Self(imp::cmplt(self.0, other.0))
    }

    /// Lane-wise `<=` mask.
    #[inline]
    pub fn cmp_le(self, other: Self) -> Self {
        Self(imp::cmple(self.0, other.0))
    }

    /// Lane-wise `>` mask.
    #[inline]
    pub fn cmp_gt(self, other: Self) -> Self {
        Self(imp::cmpgt(self.0, other.0))
    }

    /// Lane-wise `>=` mask.
    #[inline]
    pub fn cmp_ge(self, other: Self) -> Self {
        Self(imp::cmpge(self.0, other.0))
    }

    /// Bitwise `!self & other`.
    #[inline]
    pub fn and_not(self, other: Self) -> Self {
        Self(imp::andnot(self.0, other.0))
    }

    /// Pick lanes of `if_true` where `mask` is set and `if_false` elsewhere.
    ///
    /// Only the sign bit of each mask lane is inspected.
    #[inline]
    pub fn blend(if_false: Self, if_true: Self, mask: Self) -> Self {
        Self(imp::blend(if_false.0, if_true.0, mask.0))
    }

    /// Sign bits of the four lanes packed into bits 0..4.
    #[inline]
    pub fn movemask(self) -> u32 {
        imp::movemask(self.0)
    }

    /// True if every lane's sign bit is set.
    #[inline]
    pub fn all(self) -> bool {
        self.movemask() == 0xF
    }

    /// True if any lane's sign bit is set.
    #[inline]
    pub fn any(self) -> bool {
        self.movemask() != 0
    }

    // ========================================================================
    // Horizontal and Shuffles
    // ========================================================================

    /// Sum of all four lanes.
    #[inline]
    pub fn hadd(self) -> f32 {
        imp::hadd(self.0)
    }

    /// Minimum lane.
    #[inline]
    pub fn hmin(self) -> f32 {
        imp::hmin(self.0)
    }

    /// Maximum lane.
    #[inline]
    pub fn hmax(self) -> f32 {
        imp::hmax(self.0)
    }

    /// Rearrange lanes: result lane `k` is `self` lane `Ik`.
    ///
    /// Indices must be below 4; anything else fails to build.
    ///
    /// ```
    /// use solidc_numeric::F32x4;
    ///
    /// let v = F32x4::new(1.0, 2.0, 3.0, 4.0);
    /// assert_eq!(v.swizzle::<3, 2, 1, 0>().to_array(), [4.0, 3.0, 2.0, 1.0]);
    /// ```
    ///
    /// ```compile_fail
    /// use solidc_numeric::F32x4;
    ///
    /// let v = F32x4::splat(1.0).swizzle::<4, 0, 0, 0>();
    /// ```
    #[inline]
    pub fn swizzle<const I0: usize, const I1: usize, const I2: usize, const I3: usize>(
        self,
    ) -> Self {
        const { assert!(I0 < 4 && I1 < 4 && I2 < 4 && I3 < 4, "swizzle lane out of range") };
        let a = self.to_array();
        Self::new(a[I0], a[I1], a[I2], a[I3])
    }

    /// Broadcast lane 0.
    #[inline]
    pub fn splat_x(self) -> Self {
        Self::splat(self.x())
    }

    /// Broadcast lane 1.
    #[inline]
    pub fn splat_y(self) -> Self {
        Self::splat(self.y())
    }

    /// Broadcast lane 2.
    #[inline]
    pub fn splat_z(self) -> Self {
        Self::splat(self.z())
    }

    /// Broadcast lane 3.
    #[inline]
    pub fn splat_w(self) -> Self {
        Self::splat(self.w())
    }

    /// Transpose four row vectors in place.
    #[inline]
    pub fn transpose4(rows: &mut [F32x4; 4]) {
        let mut raw = rows.map(|r| r.0);
        imp::transpose(&mut raw);
        *rows = raw.map(Self);
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Dot product of lanes x, y, z. Lane w is ignored.
    #[inline]
    pub fn dot3(self, other: Self) -> f32 {
        (self * other).and(Self::mask(true, true, true, false)).hadd()
    }

    /// Dot product of all four lanes.
    #[inline]
    pub fn dot4(self, other: Self) -> f32 {
        (self * other).hadd()
    }

    /// 3D cross product. Lane w of the result is zero.
    #[inline]
    pub fn cross3(self, other: Self) -> Self {
        let a_yzx = self.swizzle::<1, 2, 0, 3>();
        let b_yzx = other.swizzle::<1, 2, 0, 3>();
        let c = self * b_yzx - a_yzx * other;
        c.swizzle::<1, 2, 0, 3>().with_lane(3, 0.0)
    }

    /// Squared length of lanes x, y, z.
    #[inline]
    pub fn length_sq3(self) -> f32 {
        self.dot3(self)
    }

    /// Squared length of all four lanes.
    #[inline]
    pub fn length_sq4(self) -> f32 {
        self.dot4(self)
    }

    /// Length of lanes x, y, z.
    #[inline]
    pub fn length3(self) -> f32 {
        self.length_sq3().sqrt()
    }

    /// Length of all four lanes.
    #[inline]
    pub fn length4(self) -> f32 {
        self.length_sq4().sqrt()
    }

    /// Scale lanes x, y, z to unit length, keeping w.
    ///
    /// A vector with non-positive squared length is returned unchanged.
    #[inline]
    pub fn normalize3(self) -> Self {
        let len_sq = self.length_sq3();
        if len_sq <= 0.0 {
            return self;
        }
        let scaled = self * Self::splat(1.0 / len_sq.sqrt());
        Self::blend(self, scaled, Self::mask(true, true, true, false))
    }

    /// Like [`normalize3`](Self::normalize3) using the reciprocal square root
    /// estimate. Roughly 12 bits of precision on the hardware backends.
    #[inline]
    pub fn normalize3_fast(self) -> Self {
        let len_sq = self.length_sq3();
        if len_sq <= 0.0 {
            return self;
        }
        let scaled = self * Self::splat(len_sq).rsqrt();
        Self::blend(self, scaled, Self::mask(true, true, true, false))
    }

    /// Scale all four lanes to unit length.
    ///
    /// A vector with non-positive squared length is returned unchanged.
    #[inline]
    pub fn normalize4(self) -> Self {
        let len_sq = self.length_sq4();
        if len_sq <= 0.0 {
            return self;
        }
        self * Self::splat(1.0 / len_sq.sqrt())
    }

    /// True if every lane differs from `other` by at most `eps`.
    #[inline]
    pub fn equals_eps(self, other: Self, eps: f32) -> bool {
        (self - other).abs().cmp_le(Self::splat(eps)).all()
    }

    // Bitwise helpers, also available as operators.

    /// Bitwise AND.
    #[inline]
    pub fn and(self, other: Self) -> Self {
        Self(imp::and(self.0, other.0))
    }

    /// Bitwise OR.
    #[inline]
    pub fn or(self, other: Self) -> Self {
        Self(imp::or(self.0, other.0))
    }

    /// Bitwise XOR.
    #[inline]
    pub fn xor(self, other: Self) -> Self {
        Self(imp::xor(self.0, other.0))
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for F32x4 {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.to_array();
        f.debug_tuple("F32x4").field(&x).field(&y).field(&z).field(&w).finish()
    }
}

/// Exact lane-wise equality. NaN lanes never compare equal.
impl PartialEq for F32x4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl From<[f32; 4]> for F32x4 {
    fn from(a: [f32; 4]) -> Self {
        Self::from_array(a)
    }
}

impl From<F32x4> for [f32; 4] {
    fn from(v: F32x4) -> Self {
        v.to_array()
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $imp:ident) => {
        impl $trait for F32x4 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self(imp::$imp(self.0, rhs.0))
            }
        }

        impl $trait<f32> for F32x4 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: f32) -> Self {
                Self(imp::$imp(self.0, imp::splat(rhs)))
            }
        }

        impl $assign_trait for F32x4 {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                self.0 = imp::$imp(self.0, rhs.0);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, add);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, sub);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, mul);
impl_binary_op!(Div, div, DivAssign, div_assign, div);

impl Neg for F32x4 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(imp::neg(self.0))
    }
}

impl BitAnd for F32x4 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl BitOr for F32x4 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl BitXor for F32x4 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        self.xor(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(v: F32x4) -> scalar::Raw {
        scalar::from_array(v.to_array())
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<F32x4>(), 16);
        assert_eq!(std::mem::align_of::<F32x4>(), 16);
    }

    #[test]
    fn test_construction() {
        assert_eq!(F32x4::zero().to_array(), [0.0; 4]);
        assert_eq!(F32x4::splat(2.5).to_array(), [2.5; 4]);
        let v = F32x4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!((v.x(), v.y(), v.z(), v.w()), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(F32x4::load(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(v));
        assert_eq!(F32x4::load(&[1.0, 2.0]), None);

        let mut out = [0.0f32; 6];
        v.store(&mut out[2..]);
        assert_eq!(out, [0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_arithmetic() {
        let a = F32x4::new(1.0, 2.0, 3.0, 4.0);
        let b = F32x4::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!((a + b).to_array(), [6.0, 8.0, 10.0, 12.0]);
        assert_eq!((b - a).to_array(), [4.0; 4]);
        assert_eq!((a * b).to_array(), [5.0, 12.0, 21.0, 32.0]);
        assert_eq!((b / a).to_array(), [5.0, 3.0, 7.0 / 3.0, 2.0]);
        assert_eq!((-a).to_array(), [-1.0, -2.0, -3.0, -4.0]);
        assert_eq!(a.madd(b, F32x4::splat(1.0)).to_array(), [6.0, 13.0, 22.0, 33.0]);
        assert_eq!((a * 2.0).to_array(), [2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_rounding() {
        let v = F32x4::new(1.5, -1.5, 2.5, -0.4);
        assert_eq!(v.floor().to_array(), [1.0, -2.0, 2.0, -1.0]);
        assert_eq!(v.ceil().to_array(), [2.0, -1.0, 3.0, -0.0]);
        assert_eq!(v.round().to_array(), [2.0, -2.0, 2.0, -0.0]);
    }

    #[test]
    fn test_compare_and_blend() {
        let a = F32x4::new(1.0, 5.0, 3.0, 7.0);
        let b = F32x4::new(2.0, 4.0, 3.0, 8.0);
        assert_eq!(a.cmp_lt(b).movemask(), 0b1001);
        assert_eq!(a.cmp_le(b).movemask(), 0b1101);
        assert_eq!(a.cmp_gt(b).movemask(), 0b0010);
        assert_eq!(a.cmp_ge(b).movemask(), 0b0110);
        assert_eq!(a.cmp_eq(b).movemask(), 0b0100);
        assert_eq!(a.cmp_neq(b).movemask(), 0b1011);

        let picked = F32x4::blend(a, b, a.cmp_lt(b));
        assert_eq!(picked.to_array(), [2.0, 5.0, 3.0, 8.0]);
    }

    #[test]
    fn test_blend_uses_sign_bit_only() {
        let f = F32x4::splat(0.0);
        let t = F32x4::splat(1.0);
        let partial = F32x4::from_bits([0x8000_0000, 0x7FFF_FFFF, 0, u32::MAX]);
        assert_eq!(F32x4::blend(f, t, partial).to_array(), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bitwise() {
        let m = F32x4::mask(true, false, true, false);
        let v = F32x4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!((v & m).to_array(), [1.0, 0.0, 3.0, 0.0]);
        assert_eq!(m.and_not(v).to_array(), [0.0, 2.0, 0.0, 4.0]);
        assert_eq!((m | F32x4::zero()).movemask(), 0b0101);
        assert_eq!((m ^ m).movemask(), 0);
    }

    #[test]
    fn test_horizontal() {
        let v = F32x4::new(3.0, -1.0, 7.0, 2.0);
        assert_eq!(v.hadd(), 11.0);
        assert_eq!(v.hmin(), -1.0);
        assert_eq!(v.hmax(), 7.0);
        assert_eq!(v.splat_z().to_array(), [7.0; 4]);
    }

    #[test]
    fn test_transpose() {
        let mut rows = [
            F32x4::new(0.0, 1.0, 2.0, 3.0),
            F32x4::new(4.0, 5.0, 6.0, 7.0),
            F32x4::new(8.0, 9.0, 10.0, 11.0),
            F32x4::new(12.0, 13.0, 14.0, 15.0),
        ];
        F32x4::transpose4(&mut rows);
        assert_eq!(rows[0].to_array(), [0.0, 4.0, 8.0, 12.0]);
        assert_eq!(rows[1].to_array(), [1.0, 5.0, 9.0, 13.0]);
        assert_eq!(rows[3].to_array(), [3.0, 7.0, 11.0, 15.0]);
    }

    #[test]
    fn test_geometry() {
        let x = F32x4::new(1.0, 0.0, 0.0, 9.0);
        let y = F32x4::new(0.0, 1.0, 0.0, 9.0);
        assert_eq!(x.cross3(y).to_array(), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(x.dot3(y), 0.0);
        assert_eq!(x.dot4(y), 81.0);

        let v = F32x4::new(3.0, 0.0, 4.0, 7.0);
        assert_eq!(v.length3(), 5.0);
        let n = v.normalize3();
        assert!(n.equals_eps(F32x4::new(0.6, 0.0, 0.8, 7.0), 1e-6));
        assert!(v.normalize3_fast().equals_eps(F32x4::new(0.6, 0.0, 0.8, 7.0), 1e-3));

        assert_eq!(F32x4::zero().normalize3(), F32x4::zero());
        assert_eq!(F32x4::zero().normalize4(), F32x4::zero());
    }

    #[test]
    fn test_matches_scalar_reference() {
        let a = F32x4::new(1.25, -3.5, 0.0, 1e6);
        let b = F32x4::new(-2.0, 0.5, 7.0, 3.0);
        let (ra, rb) = (reference(a), reference(b));

        assert_eq!((a + b).to_array(), scalar::to_array(scalar::add(ra, rb)));
        assert_eq!((a * b).to_array(), scalar::to_array(scalar::mul(ra, rb)));
        assert_eq!(a.min(b).to_array(), scalar::to_array(scalar::min(ra, rb)));
        assert_eq!(a.cmp_lt(b).movemask(), scalar::movemask(scalar::cmplt(ra, rb)));
        assert_eq!(a.hmax(), scalar::hmax(ra));
        assert_eq!(a.round().to_array(), scalar::to_array(scalar::round(ra)));
    }
}
