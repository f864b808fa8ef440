//! NEON backend for [`F32x4`](super::F32x4) on aarch64.

use std::arch::aarch64::*;

pub(crate) type Raw = float32x4_t;

pub(crate) const NAME: &str = "neon";

#[inline(always)]
fn bits(v: Raw) -> uint32x4_t {
    unsafe { vreinterpretq_u32_f32(v) }
}

#[inline(always)]
fn floats(v: uint32x4_t) -> Raw {
    unsafe { vreinterpretq_f32_u32(v) }
}

// ============================================================================
// Construction and Access
// ============================================================================

#[inline(always)]
pub(crate) fn zero() -> Raw {
    unsafe { vdupq_n_f32(0.0) }
}

#[inline(always)]
pub(crate) fn set(x: f32, y: f32, z: f32, w: f32) -> Raw {
    from_array([x, y, z, w])
}

#[inline(always)]
pub(crate) fn splat(s: f32) -> Raw {
    unsafe { vdupq_n_f32(s) }
}

#[inline(always)]
pub(crate) fn from_array(a: [f32; 4]) -> Raw {
    // SAFETY: `a` is four contiguous f32 values.
    unsafe { vld1q_f32(a.as_ptr()) }
}

#[inline(always)]
pub(crate) fn to_array(v: Raw) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    // SAFETY: `out` has room for four f32 values.
    unsafe { vst1q_f32(out.as_mut_ptr(), v) };
    out
}

// ============================================================================
// Arithmetic
// ============================================================================

#[inline(always)]
pub(crate) fn add(a: Raw, b: Raw) -> Raw {
    unsafe { vaddq_f32(a, b) }
}

#[inline(always)]
pub(crate) fn sub(a: Raw, b: Raw) -> Raw {
    unsafe { vsubq_f32(a, b) }
}

#[inline(always)]
pub(crate) fn mul(a: Raw, b: Raw) -> Raw {
    unsafe { vmulq_f32(a, b) }
}

#[inline(always)]
pub(crate) fn div(a: Raw, b: Raw) -> Raw {
    unsafe { vdivq_f32(a, b) }
}

#[inline(always)]
pub(crate) fn madd(a: Raw, b: Raw, c: Raw) -> Raw {
    unsafe { vfmaq_f32(c, a, b) }
}

#[inline(always)]
pub(crate) fn neg(v: Raw) -> Raw {
    unsafe { vnegq_f32(v) }
}

#[inline(always)]
pub(crate) fn abs(v: Raw) -> Raw {
    unsafe { vabsq_f32(v) }
}

#[inline(always)]
pub(crate) fn min(a: Raw, b: Raw) -> Raw {
    unsafe { vminq_f32(a, b) }
}

#[inline(always)]
pub(crate) fn max(a: Raw, b: Raw) -> Raw {
    unsafe { vmaxq_f32(a, b) }
}

#[inline(always)]
pub(crate) fn sqrt(v: Raw) -> Raw {
    unsafe { vsqrtq_f32(v) }
}

#[inline(always)]
pub(crate) fn rsqrt(v: Raw) -> Raw {
    unsafe {
        // One Newton step brings the estimate in line with the SSE approximation.
        let e = vrsqrteq_f32(v);
        vmulq_f32(e, vrsqrtsq_f32(vmulq_f32(v, e), e))
    }
}

#[inline(always)]
pub(crate) fn rcp(v: Raw) -> Raw {
    unsafe {
        let e = vrecpeq_f32(v);
        vmulq_f32(e, vrecpsq_f32(v, e))
    }
}

// ============================================================================
// Rounding
// ============================================================================

#[inline(always)]
pub(crate) fn floor(v: Raw) -> Raw {
    unsafe { vrndmq_f32(v) }
}

#[inline(always)]
pub(crate) fn ceil(v: Raw) -> Raw {
    unsafe { vrndpq_f32(v) }
}

#[inline(always)]
pub(crate) fn round(v: Raw) -> Raw {
    unsafe { vrndnq_f32(v) }
}

// ============================================================================
// Comparison and Bitwise
// ============================================================================

#[inline(always)]
pub(crate) fn cmpeq(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vceqq_f32(a, b)) }
}

#[inline(always)]
pub(crate) fn cmpneq(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vmvnq_u32(vceqq_f32(a, b))) }
}

#[inline(always)]
pub(crate) fn cmplt(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vcltq_f32(a, b)) }
}

#[inline(always)]
pub(crate) fn cmple(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vcleq_f32(a, b)) }
}

#[inline(always)]
pub(crate) fn cmpgt(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vcgtq_f32(a, b)) }
}

#[inline(always)]
pub(crate) fn cmpge(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vcgeq_f32(a, b)) }
}

#[inline(always)]
pub(crate) fn and(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vandq_u32(bits(a), bits(b))) }
}

#[inline(always)]
pub(crate) fn or(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vorrq_u32(bits(a), bits(b))) }
}

#[inline(always)]
pub(crate) fn xor(a: Raw, b: Raw) -> Raw {
    unsafe { floats(veorq_u32(bits(a), bits(b))) }
}

/// `!a & b`
#[inline(always)]
pub(crate) fn andnot(a: Raw, b: Raw) -> Raw {
    unsafe { floats(vbicq_u32(bits(b), bits(a))) }
}

/// Select `t` where the mask lane's sign bit is set, `f` elsewhere.
#[inline(always)]
pub(crate) fn blend(f: Raw, t: Raw, mask: Raw) -> Raw {
    unsafe {
        let full = vreinterpretq_u32_s32(vshrq_n_s32::<31>(vreinterpretq_s32_f32(mask)));
        vbslq_f32(full, t, f)
    }
}

// ============================================================================
// Horizontal
// ============================================================================

#[inline(always)]
pub(crate) fn hadd(v: Raw) -> f32 {
    unsafe { vaddvq_f32(v) }
}

#[inline(always)]
pub(crate) fn hmin(v: Raw) -> f32 {
    unsafe { vminvq_f32(v) }
}

#[inline(always)]
pub(crate) fn hmax(v: Raw) -> f32 {
    unsafe { vmaxvq_f32(v) }
}

#[inline(always)]
pub(crate) fn movemask(v: Raw) -> u32 {
    let weights: [u32; 4] = [1, 2, 4, 8];
    unsafe {
        let signs = vshrq_n_u32::<31>(bits(v));
        vaddvq_u32(vmulq_u32(signs, vld1q_u32(weights.as_ptr())))
    }
}

#[inline(always)]
pub(crate) fn transpose(rows: &mut [Raw; 4]) {
    let r = rows.map(to_array);
    for (i, row) in rows.iter_mut().enumerate() {
        *row = set(r[0][i], r[1][i], r[2][i], r[3][i]);
    }
}
