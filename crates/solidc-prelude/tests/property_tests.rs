//! Property tests for solidc-prelude
//!
//! These tests verify the arithmetic and comparison laws the rest of the
//! workspace relies on.

use proptest::prelude::*;
use solidc_prelude::checked::{checked_add, checked_mul, checked_sub};
use solidc_prelude::convert::{
    parse_int, str_to_i16, str_to_i32, str_to_i64, str_to_i8, str_to_u16, str_to_u32, str_to_u64,
    str_to_u8, ConvertError,
};
use solidc_prelude::float_cmp::{cmp_double, cmp_float, cmp_relative, cmp_ulps, CmpConfig};

// ============================================================
// Checked arithmetic
// ============================================================

proptest! {
    #[test]
    fn add_overflow_iff_out_of_range(a in any::<i32>(), b in any::<i32>()) {
        let exact = i64::from(a) + i64::from(b);
        let (wrapped, overflow) = checked_add(a, b);
        prop_assert_eq!(overflow, exact < i64::from(i32::MIN) || exact > i64::from(i32::MAX));
        prop_assert_eq!(wrapped, a.wrapping_add(b));
    }

    #[test]
    fn sub_overflow_iff_out_of_range(a in any::<i16>(), b in any::<i16>()) {
        let exact = i32::from(a) - i32::from(b);
        let (_, overflow) = checked_sub(a, b);
        prop_assert_eq!(overflow, exact < i32::from(i16::MIN) || exact > i32::from(i16::MAX));
    }

    #[test]
    fn mul_overflow_iff_out_of_range(a in any::<i64>(), b in any::<i64>()) {
        let exact = i128::from(a) * i128::from(b);
        let (wrapped, overflow) = checked_mul(a, b);
        prop_assert_eq!(overflow, exact < i128::from(i64::MIN) || exact > i128::from(i64::MAX));
        prop_assert_eq!(wrapped, a.wrapping_mul(b));
    }

    #[test]
    fn unsigned_add_overflow(a in any::<u32>(), b in any::<u32>()) {
        let exact = u64::from(a) + u64::from(b);
        prop_assert_eq!(checked_add(a, b).1, exact > u64::from(u32::MAX));
    }
}

// ============================================================
// Float comparison
// ============================================================

proptest! {
    #[test]
    fn ulps_reflexive(a in any::<f64>().prop_filter("finite", |x| x.is_finite()), k in any::<u64>()) {
        prop_assert!(cmp_ulps(a, a, k));
    }

    #[test]
    fn ulps_reflexive_f32(a in any::<f32>().prop_filter("finite", |x| x.is_finite())) {
        prop_assert!(cmp_ulps(a, a, 0));
    }

    #[test]
    fn relative_symmetric(a in -1e12f64..1e12, b in -1e12f64..1e12, eps in 0.0f64..1.0) {
        prop_assert_eq!(cmp_relative(a, b, eps), cmp_relative(b, a, eps));
    }

    #[test]
    fn nan_equals_nan_under_every_mode(eps in 0.0f64..1.0, ulps in any::<u64>()) {
        for cfg in [
            CmpConfig::absolute(eps),
            CmpConfig::relative(eps),
            CmpConfig::ulps(ulps),
            CmpConfig::combined(eps),
        ] {
            prop_assert!(cmp_double(f64::NAN, f64::NAN, cfg));
            prop_assert!(cmp_float(f32::INFINITY, f32::INFINITY, cfg));
            prop_assert!(!cmp_float(f32::INFINITY, f32::NEG_INFINITY, cfg));
        }
    }
}

// ============================================================
// Conversion round trips
// ============================================================

proptest! {
    #[test]
    fn roundtrip_i8(n in any::<i8>()) {
        prop_assert_eq!(str_to_i8(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_u8(n in any::<u8>()) {
        prop_assert_eq!(str_to_u8(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_i16(n in any::<i16>()) {
        prop_assert_eq!(str_to_i16(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_u16(n in any::<u16>()) {
        prop_assert_eq!(str_to_u16(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_i32(n in any::<i32>()) {
        prop_assert_eq!(str_to_i32(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_u32(n in any::<u32>()) {
        prop_assert_eq!(str_to_u32(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_i64(n in any::<i64>()) {
        prop_assert_eq!(str_to_i64(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_u64(n in any::<u64>()) {
        prop_assert_eq!(str_to_u64(&n.to_string()), Ok(n));
    }

    #[test]
    fn roundtrip_hex(n in any::<u64>()) {
        prop_assert_eq!(parse_int::<u64>(&format!("{:x}", n), 16), Ok(n));
        prop_assert_eq!(parse_int::<u64>(&format!("{:#x}", n), 0), Ok(n));
    }

    #[test]
    fn widened_values_overflow_narrow_targets(n in (i64::from(i16::MAX) + 1)..i64::MAX) {
        prop_assert_eq!(str_to_i16(&n.to_string()), Err(ConvertError::Overflow));
    }
}
