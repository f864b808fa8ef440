//! Portable scalar backend for [`F32x4`](super::F32x4).
//!
//! Selected on targets without SSE2 or NEON, or with the `scalar` feature.
//! It is always compiled so the vector backends can be checked against it.

#![allow(dead_code)]

/// Four lanes with the same alignment as a hardware register.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct Raw(pub(crate) [f32; 4]);

pub(crate) const NAME: &str = "scalar";

#[inline(always)]
fn map(v: Raw, f: impl Fn(f32) -> f32) -> Raw {
    Raw(v.0.map(f))
}

#[inline(always)]
fn zip(a: Raw, b: Raw, f: impl Fn(f32, f32) -> f32) -> Raw {
    Raw([f(a.0[0], b.0[0]), f(a.0[1], b.0[1]), f(a.0[2], b.0[2]), f(a.0[3], b.0[3])])
}

#[inline(always)]
fn zip_bits(a: Raw, b: Raw, f: impl Fn(u32, u32) -> u32) -> Raw {
    zip(a, b, |x, y| f32::from_bits(f(x.to_bits(), y.to_bits())))
}

#[inline(always)]
fn mask(b: bool) -> f32 {
    f32::from_bits(if b { u32::MAX } else { 0 })
}

// ============================================================================
// Construction and Access
// ============================================================================

#[inline(always)]
pub(crate) fn zero() -> Raw {
    Raw([0.0; 4])
}

#[inline(always)]
pub(crate) fn set(x: f32, y: f32, z: f32, w: f32) -> Raw {
    Raw([x, y, z, w])
}

#[inline(always)]
pub(crate) fn splat(s: f32) -> Raw {
    Raw([s; 4])
}

#[inline(always)]
pub(crate) fn from_array(a: [f32; 4]) -> Raw {
    Raw(a)
}

#[inline(always)]
pub(crate) fn to_array(v: Raw) -> [f32; 4] {
    v.0
}

// ============================================================================
// Arithmetic
// ============================================================================

#[inline(always)]
pub(crate) fn add(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| x + y)
}

#[inline(always)]
pub(crate) fn sub(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| x - y)
}

#[inline(always)]
pub(crate) fn mul(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| x * y)
}

#[inline(always)]
pub(crate) fn div(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| x / y)
}

#[inline(always)]
pub(crate) fn madd(a: Raw, b: Raw, c: Raw) -> Raw {
    add(mul(a, b), c)
}

#[inline(always)]
pub(crate) fn neg(v: Raw) -> Raw {
    map(v, |x| -x)
}

#[inline(always)]
pub(crate) fn abs(v: Raw) -> Raw {
    map(v, f32::abs)
}

// Matches the SSE rule: the second operand wins when either is NaN.
#[inline(always)]
pub(crate) fn min(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| if x < y { x } else { y })
}

#[inline(always)]
pub(crate) fn max(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| if x > y { x } else { y })
}

#[inline(always)]
pub(crate) fn sqrt(v: Raw) -> Raw {
    map(v, f32::sqrt)
}

#[inline(always)]
pub(crate) fn rsqrt(v: Raw) -> Raw {
    map(v, |x| 1.0 / x.sqrt())
}

#[inline(always)]
pub(crate) fn rcp(v: Raw) -> Raw {
    map(v, |x| 1.0 / x)
}

// ============================================================================
// Rounding
// ============================================================================

#[inline(always)]
pub(crate) fn floor(v: Raw) -> Raw {
    map(v, f32::floor)
}

#[inline(always)]
pub(crate) fn ceil(v: Raw) -> Raw {
    map(v, f32::ceil)
}

#[inline(always)]
pub(crate) fn round(v: Raw) -> Raw {
    map(v, f32::round_ties_even)
}

// ============================================================================
// Comparison and Bitwise
// ============================================================================

#[inline(always)]
pub(crate) fn cmpeq(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| mask(x == y))
}

#[inline(always)]
pub(crate) fn cmpneq(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| mask(x != y))
}

#[inline(always)]
pub(crate) fn cmplt(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| mask(x < y))
}

#[inline(always)]
pub(crate) fn cmple(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| mask(x <= y))
}

#[inline(always)]
pub(crate) fn cmpgt(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| mask(x > y))
}

#[inline(always)]
pub(crate) fn cmpge(a: Raw, b: Raw) -> Raw {
    zip(a, b, |x, y| mask(x >= y))
}

#[inline(always)]
pub(crate) fn and(a: Raw, b: Raw) -> Raw {
    zip_bits(a, b, |x, y| x & y)
}

#[inline(always)]
pub(crate) fn or(a: Raw, b: Raw) -> Raw {
    zip_bits(a, b, |x, y| x | y)
}

#[inline(always)]
pub(crate) fn xor(a: Raw, b: Raw) -> Raw {
    zip_bits(a, b, |x, y| x ^ y)
}

/// `!a & b`
#[inline(always)]
pub(crate) fn andnot(a: Raw, b: Raw) -> Raw {
    zip_bits(a, b, |x, y| !x & y)
}

/// Select `t` where the mask lane's sign bit is set, `f` elsewhere.
#[inline(always)]
pub(crate) fn blend(f: Raw, t: Raw, mask: Raw) -> Raw {
    let mut out = f.0;
    for (i, lane) in out.iter_mut().enumerate() {
        if mask.0[i].to_bits() >> 31 == 1 {
            *lane = t.0[i];
        }
    }
    Raw(out)
}

// ============================================================================
// Horizontal
// ============================================================================

#[inline(always)]
pub(crate) fn hadd(v: Raw) -> f32 {
    (v.0[0] + v.0[1]) + (v.0[2] + v.0[3])
}

#[inline(always)]
pub(crate) fn hmin(v: Raw) -> f32 {
    let m = min(v, Raw([v.0[1], v.0[0], v.0[3], v.0[2]]));
    if m.0[0] < m.0[2] { m.0[0] } else { m.0[2] }
}

#[inline(always)]
pub(crate) fn hmax(v: Raw) -> f32 {
    let m = max(v, Raw([v.0[1], v.0[0], v.0[3], v.0[2]]));
    if m.0[0] > m.0[2] { m.0[0] } else { m.0[2] }
}

#[inline(always)]
pub(crate) fn movemask(v: Raw) -> u32 {
    v.0.iter()
        .enumerate()
        .fold(0, |acc, (i, x)| acc | ((x.to_bits() >> 31) << i))
}

#[inline(always)]
pub(crate) fn transpose(rows: &mut [Raw; 4]) {
    let r = *rows;
    for (i, row) in rows.iter_mut().enumerate() {
        *row = Raw([r[0].0[i], r[1].0[i], r[2].0[i], r[3].0[i]]);
    }
}
