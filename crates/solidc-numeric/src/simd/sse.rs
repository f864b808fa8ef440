//! SSE backend for [`F32x4`](super::F32x4).
//!
//! Baseline is SSE2. Rounding and blends use SSE4.1 instructions when the
//! crate is compiled with `target-feature=+sse4.1`, and multiply-add fuses
//! when `+fma` is enabled.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

pub(crate) type Raw = __m128;

#[cfg(target_feature = "sse4.1")]
pub(crate) const NAME: &str = "sse4.1";
#[cfg(not(target_feature = "sse4.1"))]
pub(crate) const NAME: &str = "sse2";

// ============================================================================
// Construction and Access
// ============================================================================

#[inline(always)]
pub(crate) fn zero() -> Raw {
    unsafe { _mm_setzero_ps() }
}

#[inline(always)]
pub(crate) fn set(x: f32, y: f32, z: f32, w: f32) -> Raw {
    unsafe { _mm_setr_ps(x, y, z, w) }
}

#[inline(always)]
pub(crate) fn splat(s: f32) -> Raw {
    unsafe { _mm_set1_ps(s) }
}

#[inline(always)]
pub(crate) fn from_array(a: [f32; 4]) -> Raw {
    // SAFETY: `a` is four contiguous f32 values; loadu has no alignment requirement.
    unsafe { _mm_loadu_ps(a.as_ptr()) }
}

#[inline(always)]
pub(crate) fn to_array(v: Raw) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    // SAFETY: `out` has room for four f32 values; storeu has no alignment requirement.
    unsafe { _mm_storeu_ps(out.as_mut_ptr(), v) };
    out
}

// ============================================================================
// Arithmetic
// ============================================================================

#[inline(always)]
pub(crate) fn add(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_add_ps(a, b) }
}

#[inline(always)]
pub(crate) fn sub(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_sub_ps(a, b) }
}

#[inline(always)]
pub(crate) fn mul(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_mul_ps(a, b) }
}

#[inline(always)]
pub(crate) fn div(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_div_ps(a, b) }
}

#[cfg(target_feature = "fma")]
#[inline(always)]
pub(crate) fn madd(a: Raw, b: Raw, c: Raw) -> Raw {
    unsafe { _mm_fmadd_ps(a, b, c) }
}

#[cfg(not(target_feature = "fma"))]
#[inline(always)]
pub(crate) fn madd(a: Raw, b: Raw, c: Raw) -> Raw {
    unsafe { _mm_add_ps(_mm_mul_ps(a, b), c) }
}

#[inline(always)]
pub(crate) fn neg(v: Raw) -> Raw {
    unsafe { _mm_xor_ps(v, _mm_set1_ps(-0.0)) }
}

#[inline(always)]
pub(crate) fn abs(v: Raw) -> Raw {
    unsafe { _mm_andnot_ps(_mm_set1_ps(-0.0), v) }
}

#[inline(always)]
pub(crate) fn min(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_min_ps(a, b) }
}

#[inline(always)]
pub(crate) fn max(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_max_ps(a, b) }
}

#[inline(always)]
pub(crate) fn sqrt(v: Raw) -> Raw {
    unsafe { _mm_sqrt_ps(v) }
}

#[inline(always)]
pub(crate) fn rsqrt(v: Raw) -> Raw {
    unsafe { _mm_rsqrt_ps(v) }
}

#[inline(always)]
pub(crate) fn rcp(v: Raw) -> Raw {
    unsafe { _mm_rcp_ps(v) }
}

// ============================================================================
// Rounding
// ============================================================================

#[cfg(target_feature = "sse4.1")]
#[inline(always)]
pub(crate) fn floor(v: Raw) -> Raw {
    unsafe { _mm_floor_ps(v) }
}

#[cfg(target_feature = "sse4.1")]
#[inline(always)]
pub(crate) fn ceil(v: Raw) -> Raw {
    unsafe { _mm_ceil_ps(v) }
}

#[cfg(target_feature = "sse4.1")]
#[inline(always)]
pub(crate) fn round(v: Raw) -> Raw {
    unsafe { _mm_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(v) }
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
pub(crate) fn floor(v: Raw) -> Raw {
    from_array(to_array(v).map(f32::floor))
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
pub(crate) fn ceil(v: Raw) -> Raw {
    from_array(to_array(v).map(f32::ceil))
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
pub(crate) fn round(v: Raw) -> Raw {
    from_array(to_array(v).map(f32::round_ties_even))
}

// ============================================================================
// Comparison and Bitwise
// ============================================================================

#[inline(always)]
pub(crate) fn cmpeq(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_cmpeq_ps(a, b) }
}

#[inline(always)]
pub(crate) fn cmpneq(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_cmpneq_ps(a, b) }
}

#[inline(always)]
pub(crate) fn cmplt(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_cmplt_ps(a, b) }
}

#[inline(always)]
pub(crate) fn cmple(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_cmple_ps(a, b) }
}

#[inline(always)]
pub(crate) fn cmpgt(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_cmpgt_ps(a, b) }
}

#[inline(always)]
pub(crate) fn cmpge(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_cmpge_ps(a, b) }
}

#[inline(always)]
pub(crate) fn and(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_and_ps(a, b) }
}

#[inline(always)]
pub(crate) fn or(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_or_ps(a, b) }
}

#[inline(always)]
pub(crate) fn xor(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_xor_ps(a, b) }
}

/// `!a & b`
#[inline(always)]
pub(crate) fn andnot(a: Raw, b: Raw) -> Raw {
    unsafe { _mm_andnot_ps(a, b) }
}

/// Select `t` where the mask lane's sign bit is set, `f` elsewhere.
#[cfg(target_feature = "sse4.1")]
#[inline(always)]
pub(crate) fn blend(f: Raw, t: Raw, mask: Raw) -> Raw {
    unsafe { _mm_blendv_ps(f, t, mask) }
}

/// Select `t` where the mask lane's sign bit is set, `f` elsewhere.
#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
pub(crate) fn blend(f: Raw, t: Raw, mask: Raw) -> Raw {
    unsafe {
        // Broadcast each sign bit across its lane so partial masks behave like blendv.
        let full = _mm_castsi128_ps(_mm_srai_epi32::<31>(_mm_castps_si128(mask)));
        _mm_or_ps(_mm_and_ps(full, t), _mm_andnot_ps(full, f))
    }
}

// ============================================================================
// Horizontal
// ============================================================================

#[inline(always)]
pub(crate) fn hadd(v: Raw) -> f32 {
    unsafe {
        let shuf = _mm_shuffle_ps::<0b10_11_00_01>(v, v);
        let sums = _mm_add_ps(v, shuf);
        let high = _mm_movehl_ps(shuf, sums);
        _mm_cvtss_f32(_mm_add_ss(sums, high))
    }
}

#[inline(always)]
pub(crate) fn hmin(v: Raw) -> f32 {
    unsafe {
        let shuf = _mm_shuffle_ps::<0b10_11_00_01>(v, v);
        let mins = _mm_min_ps(v, shuf);
        let high = _mm_movehl_ps(shuf, mins);
        _mm_cvtss_f32(_mm_min_ss(mins, high))
    }
}

#[inline(always)]
pub(crate) fn hmax(v: Raw) -> f32 {
    unsafe {
        let shuf = _mm_shuffle_ps::<0b10_11_00_01>(v, v);
        let maxs = _mm_max_ps(v, shuf);
        let high = _mm_movehl_ps(shuf, maxs);
        _mm_cvtss_f32(_mm_max_ss(maxs, high))
    }
}

#[inline(always)]
pub(crate) fn movemask(v: Raw) -> u32 {
    unsafe { _mm_movemask_ps(v) as u32 }
}

#[inline(always)]
pub(crate) fn transpose(rows: &mut [Raw; 4]) {
    unsafe {
        let t0 = _mm_unpacklo_ps(rows[0], rows[1]);
        let t1 = _mm_unpacklo_ps(rows[2], rows[3]);
        let t2 = _mm_unpackhi_ps(rows[0], rows[1]);
        let t3 = _mm_unpackhi_ps(rows[2], rows[3]);
        rows[0] = _mm_movelh_ps(t0, t1);
        rows[1] = _mm_movehl_ps(t1, t0);
        rows[2] = _mm_movelh_ps(t2, t3);
        rows[3] = _mm_movehl_ps(t3, t2);
    }
}
