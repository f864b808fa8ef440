//! Key hashing
//!
//! Keys of at most 8 bytes hash to their bytes zero-extended to a `u64`
//! (little-endian); longer keys go through xxHash64 with seed 0. Double
//! hashing derives both the home slot and the probe stride from this value,
//! which spreads small keys well enough without mixing.
//!
//! Types opt into the map through [`MapKey`].

use std::hash::Hasher;

use solidc_prelude::float_cmp::{cmp_special_cases, cmp_ulps, FloatBits};
use twox_hash::XxHash64;

/// Keys no longer than this are hashed by direct byte read.
pub const SMALL_KEY_LEN: usize = 8;

/// xxHash64 of `bytes` with seed 0.
pub fn xxhash64(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

/// The first (at most 8) bytes zero-extended, little-endian.
#[inline]
pub fn small_key_hash(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; SMALL_KEY_LEN];
    let n = bytes.len().min(SMALL_KEY_LEN);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

/// Default byte hash: small-key fast path, xxHash64 otherwise.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    if bytes.len() <= SMALL_KEY_LEN {
        small_key_hash(bytes)
    } else {
        xxhash64(bytes)
    }
}

/// A type usable as a hash map key.
///
/// `key_eq` must agree with `map_hash`: equal keys hash equally.
pub trait MapKey {
    /// 64-bit hash of the key.
    fn map_hash(&self) -> u64;

    /// Key equality.
    fn key_eq(&self, other: &Self) -> bool;
}

macro_rules! impl_map_key_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl MapKey for $t {
                #[inline]
                fn map_hash(&self) -> u64 {
                    small_key_hash(&self.to_le_bytes())
                }

                #[inline]
                fn key_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_map_key_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl MapKey for u128 {
    fn map_hash(&self) -> u64 {
        hash_bytes(&self.to_le_bytes())
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for i128 {
    fn map_hash(&self) -> u64 {
        hash_bytes(&self.to_le_bytes())
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for char {
    fn map_hash(&self) -> u64 {
        u64::from(*self)
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for bool {
    fn map_hash(&self) -> u64 {
        u64::from(*self)
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for str {
    fn map_hash(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for String {
    fn map_hash(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for [u8] {
    fn map_hash(&self) -> u64 {
        hash_bytes(self)
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MapKey for Vec<u8> {
    fn map_hash(&self) -> u64 {
        hash_bytes(self)
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<const N: usize> MapKey for [u8; N] {
    fn map_hash(&self) -> u64 {
        hash_bytes(self)
    }

    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: MapKey + ?Sized> MapKey for &T {
    fn map_hash(&self) -> u64 {
        (**self).map_hash()
    }

    fn key_eq(&self, other: &Self) -> bool {
        (**self).key_eq(*other)
    }
}

impl<T: MapKey + ?Sized> MapKey for Box<T> {
    fn map_hash(&self) -> u64 {
        (**self).map_hash()
    }

    fn key_eq(&self, other: &Self) -> bool {
        (**self).key_eq(other)
    }
}

// ============================================================
// Floating-Point Keys
// ============================================================

/// A floating-point map key.
///
/// Both zeros are one key and every NaN is one key; all other values compare
/// by exact bit pattern.
///
/// ```
/// use solidc_containers::{FloatKey, HashMap};
///
/// let mut m = HashMap::new();
/// m.set(FloatKey(f64::NAN), "nan").unwrap();
/// m.set(FloatKey(-0.0), "zero").unwrap();
/// assert_eq!(m.get(&FloatKey(f64::NAN)), Some(&"nan"));
/// assert_eq!(m.get(&FloatKey(0.0)), Some(&"zero"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FloatKey<F>(pub F);

impl<F: FloatBits> MapKey for FloatKey<F> {
    fn map_hash(&self) -> u64 {
        let x = self.0.to_f64();
        let canonical = if x.is_nan() {
            f64::NAN
        } else if x == 0.0 {
            0.0
        } else {
            x
        };
        small_key_hash(&canonical.to_bits().to_le_bytes())
    }

    fn key_eq(&self, other: &Self) -> bool {
        cmp_special_cases(self.0, other.0).unwrap_or_else(|| cmp_ulps(self.0, other.0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_keys_are_raw_bytes() {
        assert_eq!(42u32.map_hash(), 42);
        assert_eq!((-1i8).map_hash(), 0xFF);
        assert_eq!("ab".map_hash(), 0x6261);
        assert_eq!(small_key_hash(&[]), 0);
    }

    #[test]
    fn test_long_keys_use_xxhash() {
        let key = "a key longer than eight bytes";
        assert_eq!(key.map_hash(), xxhash64(key.as_bytes()));
        assert_ne!(key.map_hash(), small_key_hash(key.as_bytes()));
    }

    #[test]
    fn test_xxhash_known_value() {
        // Reference value of XXH64("", seed = 0).
        assert_eq!(xxhash64(b""), 0xEF46_DB37_51D8_E999);
    }

    #[test]
    fn test_string_forms_agree() {
        let owned = String::from("consistent hashing");
        assert_eq!(owned.map_hash(), "consistent hashing".map_hash());
        assert_eq!(owned.as_bytes().map_hash(), owned.map_hash());
    }

    #[test]
    fn test_float_key_equivalence() {
        assert!(FloatKey(0.0f64).key_eq(&FloatKey(-0.0)));
        assert_eq!(FloatKey(0.0f64).map_hash(), FloatKey(-0.0f64).map_hash());
        assert!(FloatKey(f32::NAN).key_eq(&FloatKey(-f32::NAN)));
        assert_eq!(FloatKey(f32::NAN).map_hash(), FloatKey(-f32::NAN).map_hash());
        assert!(!FloatKey(1.0f64).key_eq(&FloatKey(1.0 + f64::EPSILON)));
        assert!(!FloatKey(f64::INFINITY).key_eq(&FloatKey(f64::NEG_INFINITY)));
    }
}
