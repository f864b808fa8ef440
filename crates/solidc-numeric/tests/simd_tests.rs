//! SIMD and matrix tests
//!
//! Checks the backend-independent behaviour of `F32x4`, the vector facade
//! and the matrix transforms against plain scalar arithmetic.

use proptest::prelude::*;
use solidc_numeric::simd::BACKEND;
use solidc_numeric::{F32x4, Mat4, SimdVec3, SimdVec4, Vec3};

fn lanes() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(-100.0f32..100.0)
}

// ============================================================
// F32x4 Tests
// ============================================================

mod f32x4_tests {
    use super::*;

    #[test]
    fn test_backend_name() {
        assert!(["sse2", "sse4.1", "neon", "scalar"].contains(&BACKEND));
    }

    #[test]
    fn test_unaligned_load() {
        let data = [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0];
        let v = F32x4::load(&data[1..]).unwrap();
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_round_half_even() {
        let v = F32x4::new(0.5, 1.5, 2.5, -2.5);
        assert_eq!(v.round().to_array(), [0.0, 2.0, 2.0, -2.0]);
    }

    #[test]
    fn test_rsqrt_precision() {
        let v = F32x4::new(1.0, 4.0, 16.0, 0.25);
        let approx = v.rsqrt().to_array();
        let exact = [1.0f32, 0.5, 0.25, 2.0];
        for (a, e) in approx.iter().zip(exact) {
            assert!(((a - e) / e).abs() < 1.0 / 2048.0);
        }
    }

    proptest! {
        #[test]
        fn arithmetic_matches_scalar(a in lanes(), b in lanes()) {
            let va = F32x4::from_array(a);
            let vb = F32x4::from_array(b);
            let sum = (va + vb).to_array();
            let prod = (va * vb).to_array();
            let mx = va.max(vb).to_array();
            for i in 0..4 {
                prop_assert_eq!(sum[i], a[i] + b[i]);
                prop_assert_eq!(prod[i], a[i] * b[i]);
                prop_assert_eq!(mx[i], if a[i] > b[i] { a[i] } else { b[i] });
            }
        }

        #[test]
        fn blend_selects_by_mask(a in lanes(), b in lanes()) {
            let va = F32x4::from_array(a);
            let vb = F32x4::from_array(b);
            let picked = F32x4::blend(va, vb, va.cmp_lt(vb)).to_array();
            for i in 0..4 {
                prop_assert_eq!(picked[i], if a[i] < b[i] { b[i] } else { a[i] });
            }
        }

        #[test]
        fn horizontal_reductions(a in lanes()) {
            let v = F32x4::from_array(a);
            let expected = a.iter().cloned().fold(f32::INFINITY, f32::min);
            prop_assert_eq!(v.hmin(), expected);
            let expected = a.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(v.hmax(), expected);
            let sum: f32 = a.iter().sum();
            prop_assert!((v.hadd() - sum).abs() <= 1e-3);
        }

        #[test]
        fn transpose_is_involution(a in lanes(), b in lanes(), c in lanes(), d in lanes()) {
            let original = [a, b, c, d].map(F32x4::from_array);
            let mut rows = original;
            F32x4::transpose4(&mut rows);
            prop_assert_eq!(rows[1].to_array()[2], c[1]);
            F32x4::transpose4(&mut rows);
            prop_assert_eq!(rows, original);
        }

        #[test]
        fn movemask_reflects_signs(a in lanes()) {
            let expected = a
                .iter()
                .enumerate()
                .fold(0u32, |m, (i, x)| m | (u32::from(x.is_sign_negative()) << i));
            prop_assert_eq!(F32x4::from_array(a).movemask(), expected);
        }
    }
}

// ============================================================
// Vector Facade Tests
// ============================================================

mod vector_tests {
    use super::*;

    #[test]
    fn test_store_round_trip_through_buffer() {
        let buffer = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 8.0)];
        let out: Vec<Vec3> = buffer
            .iter()
            .map(|v| (SimdVec3::load(*v) * 2.0).store())
            .collect();
        assert_eq!(out[1], Vec3::new(-2.0, 1.0, 16.0));
    }

    proptest! {
        #[test]
        fn cross_is_orthogonal(a in prop::array::uniform3(-10.0f32..10.0),
                               b in prop::array::uniform3(-10.0f32..10.0)) {
            let va = SimdVec3::from_array(a);
            let vb = SimdVec3::from_array(b);
            let c = va.cross(vb);
            prop_assert!(c.dot(va).abs() <= 1e-2);
            prop_assert!(c.dot(vb).abs() <= 1e-2);
        }

        #[test]
        fn cross_is_anticommutative(a in prop::array::uniform3(-10.0f32..10.0),
                                    b in prop::array::uniform3(-10.0f32..10.0)) {
            let va = SimdVec3::from_array(a);
            let vb = SimdVec3::from_array(b);
            prop_assert!(va.cross(vb).equals_eps(-vb.cross(va), 1e-4));
            prop_assert!(va.cross(va).equals_eps(SimdVec3::zero(), 1e-4));
            let wa = F32x4::new(a[0], a[1], a[2], 5.0);
            let wb = F32x4::new(b[0], b[1], b[2], -3.0);
            prop_assert_eq!(wa.cross3(wb).w(), 0.0);
        }

        #[test]
        fn normalize_gives_unit_length(a in prop::array::uniform3(-10.0f32..10.0)) {
            let v = SimdVec3::from_array(a);
            prop_assume!(v.length() > 1e-3);
            prop_assert!((v.normalize().length() - 1.0).abs() < 1e-5);
            prop_assert!((v.normalize_fast().length() - 1.0).abs() < 2e-3);
        }
    }
}

// ============================================================
// Matrix Transform Tests
// ============================================================

mod transform_tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_trs_composition() {
        let t = Mat4::translate(10.0, 0.0, 0.0);
        let r = Mat4::rotate_z(FRAC_PI_2);
        let s = Mat4::scale(2.0, 2.0, 2.0);
        let p = (t * r * s).mul_vec4(SimdVec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(p.equals_eps(SimdVec4::new(10.0, 2.0, 0.0, 1.0), 1e-5));
    }

    #[test]
    fn test_translation_in_column_three() {
        let t = Mat4::translate(1.0, 2.0, 3.0);
        assert_eq!(t.cols[3].to_array(), [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(t.get(0, 3), 1.0);
    }

    #[test]
    fn test_equal_within_epsilon() {
        let a = Mat4::identity();
        let mut b = a;
        b.set(0, 0, 1.0 + f32::EPSILON / 2.0);
        assert!(a.equal(&b));
        b.set(0, 0, 1.001);
        assert!(!a.equal(&b));
    }

    proptest! {
        #[test]
        fn inverse_of_rigid_transform(angle in -3.0f32..3.0,
                                      t in prop::array::uniform3(-50.0f32..50.0)) {
            let m = Mat4::translate(t[0], t[1], t[2]) * Mat4::rotate_y(angle);
            let inv = m.inverse().unwrap();
            prop_assert!((m * inv).approx_eq(&Mat4::identity(), 1e-4));
        }

        #[test]
        fn mul_is_associative_on_vectors(a in -3.0f32..3.0, b in -3.0f32..3.0,
                                         v in prop::array::uniform4(-10.0f32..10.0)) {
            let ma = Mat4::rotate_x(a);
            let mb = Mat4::rotate_z(b) * Mat4::scale(1.0, 2.0, 3.0);
            let v = SimdVec4::from_array(v);
            let lhs = (ma * mb).mul_vec4(v);
            let rhs = ma.mul_vec4(mb.mul_vec4(v));
            prop_assert!(lhs.equals_eps(rhs, 1e-3));
        }
    }
}
