//! Vector types.
//!
//! Two families with different jobs:
//!
//! - [`Vec2`], [`Vec3`], [`Vec4`]: plain `#[repr(C)]` storage records with
//!   no padding. Use these in arrays, buffers and files.
//! - [`SimdVec2`], [`SimdVec3`], [`SimdVec4`]: register-backed compute
//!   types. Unused lanes of the 2D and 3D forms are kept at zero.
//!
//! Convert between them with `load` / `store`.
//!
//! # Example
//!
//! ```
//! use solidc_numeric::{SimdVec3, Vec3};
//!
//! let positions = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
//! let a = SimdVec3::load(positions[0]);
//! let b = SimdVec3::load(positions[1]);
//! assert_eq!(a.cross(b).store(), Vec3::new(0.0, 0.0, 1.0));
//! ```

use std::ops::{Add, Mul, Neg, Sub};

use crate::simd::F32x4;

// ============================================================================
// Storage Records
// ============================================================================

/// Two packed `f32` components.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

/// Three packed `f32` components.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

/// Four packed `f32` components.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

impl Vec2 {
    /// Construct from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vec3 {
    /// Construct from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Vec4 {
    /// Construct from components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

// ============================================================================
// Shared Compute Operations
// ============================================================================

macro_rules! simd_vec_common {
    ($name:ident) => {
        impl $name {
            /// All components zero.
            #[inline]
            pub fn zero() -> Self {
                Self(F32x4::zero())
            }

            /// The underlying register.
            #[inline]
            pub fn simd(self) -> F32x4 {
                self.0
            }

            /// Component-wise sum.
            #[inline]
            pub fn add(self, other: Self) -> Self {
                Self(self.0 + other.0)
            }

            /// Component-wise difference.
            #[inline]
            pub fn sub(self, other: Self) -> Self {
                Self(self.0 - other.0)
            }

            /// Component-wise product.
            #[inline]
            pub fn mul(self, other: Self) -> Self {
                Self(self.0 * other.0)
            }

            /// Multiply every component by `s`.
            #[inline]
            pub fn scale(self, s: f32) -> Self {
                Self(self.0 * s)
            }

            /// Negate every component.
            #[inline]
            pub fn negate(self) -> Self {
                Self(-self.0)
            }

            /// Component-wise minimum.
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Component-wise maximum.
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// Component-wise absolute value.
            #[inline]
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Linear interpolation: `self + (other - self) * t`.
            #[inline]
            pub fn lerp(self, other: Self, t: f32) -> Self {
                Self((other.0 - self.0).madd(F32x4::splat(t), self.0))
            }

            /// Euclidean distance to `other`.
            #[inline]
            pub fn distance(self, other: Self) -> f32 {
                other.sub(self).length()
            }

            /// True if every component differs by at most `eps`.
            #[inline]
            pub fn equals_eps(self, other: Self, eps: f32) -> bool {
                self.0.equals_eps(other.0, eps)
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }
    };
}

// ============================================================================
// SimdVec2
// ============================================================================

/// 2D compute vector. Lanes z and w are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct SimdVec2(F32x4);

simd_vec_common!(SimdVec2);

impl SimdVec2 {
    /// Construct from components.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self(F32x4::new(x, y, 0.0, 0.0))
    }

    /// Load a storage record.
    #[inline]
    pub fn load(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }

    /// Store into a storage record.
    #[inline]
    pub fn store(self) -> Vec2 {
        let [x, y, _, _] = self.0.to_array();
        Vec2::new(x, y)
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        let [x, y, _, _] = self.0.to_array();
        [x, y]
    }

    /// X component.
    #[inline]
    pub fn x(self) -> f32 {
        self.0.x()
    }

    /// Y component.
    #[inline]
    pub fn y(self) -> f32 {
        self.0.y()
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.0.dot3(other.0)
    }

    /// Squared length.
    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    /// Length.
    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Unit vector in the same direction; a zero vector is returned unchanged.
    #[inline]
    pub fn normalize(self) -> Self {
        Self(self.0.normalize3())
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y(), self.x())
    }
}

// ============================================================================
// SimdVec3
// ============================================================================

/// 3D compute vector. Lane w is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct SimdVec3(F32x4);

simd_vec_common!(SimdVec3);

impl SimdVec3 {
    /// Construct from components.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(F32x4::new(x, y, z, 0.0))
    }

    /// Broadcast `s` to x, y and z.
    #[inline]
    pub fn splat(s: f32) -> Self {
        Self::new(s, s, s)
    }

    /// Wrap a register, clearing lane w.
    #[inline]
    pub fn from_simd(v: F32x4) -> Self {
        Self(v.with_lane(3, 0.0))
    }

    /// Load a storage record.
    #[inline]
    pub fn load(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Store into a storage record.
    #[inline]
    pub fn store(self) -> Vec3 {
        let [x, y, z, _] = self.0.to_array();
        Vec3::new(x, y, z)
    }

    /// Build from an array.
    #[inline]
    pub fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        let [x, y, z, _] = self.0.to_array();
        [x, y, z]
    }

    /// X component.
    #[inline]
    pub fn x(self) -> f32 {
        self.0.x()
    }

    /// Y component.
    #[inline]
    pub fn y(self) -> f32 {
        self.0.y()
    }

    /// Z component.
    #[inline]
    pub fn z(self) -> f32 {
        self.0.z()
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.0.dot3(other.0)
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self(self.0.cross3(other.0))
    }

    /// Squared length.
    #[inline]
    pub fn length_sq(self) -> f32 {
        self.0.length_sq3()
    }

    /// Length.
    #[inline]
    pub fn length(self) -> f32 {
        self.0.length3()
    }

    /// Unit vector in the same direction; a zero vector is returned unchanged.
    #[inline]
    pub fn normalize(self) -> Self {
        Self(self.0.normalize3())
    }

    /// Approximate [`normalize`](Self::normalize) via reciprocal square root.
    #[inline]
    pub fn normalize_fast(self) -> Self {
        Self(self.0.normalize3_fast())
    }
}

// ============================================================================
// SimdVec4
// ============================================================================

/// 4D compute vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct SimdVec4(F32x4);

simd_vec_common!(SimdVec4);

impl SimdVec4 {
    /// Construct from components.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(F32x4::new(x, y, z, w))
    }

    /// Broadcast `s` to all components.
    #[inline]
    pub fn splat(s: f32) -> Self {
        Self(F32x4::splat(s))
    }

    /// Wrap a register.
    #[inline]
    pub fn from_simd(v: F32x4) -> Self {
        Self(v)
    }

    /// Extend a 3D vector with the given w.
    #[inline]
    pub fn from_vec3(v: SimdVec3, w: f32) -> Self {
        Self(v.0.with_lane(3, w))
    }

    /// Load a storage record.
    #[inline]
    pub fn load(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Store into a storage record.
    #[inline]
    pub fn store(self) -> Vec4 {
        let [x, y, z, w] = self.0.to_array();
        Vec4::new(x, y, z, w)
    }

    /// Build from an array.
    #[inline]
    pub fn from_array(a: [f32; 4]) -> Self {
        Self(F32x4::from_array(a))
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        self.0.to_array()
    }

    /// Drop the w component.
    #[inline]
    pub fn xyz(self) -> SimdVec3 {
        SimdVec3::from_simd(self.0)
    }

    /// X component.
    #[inline]
    pub fn x(self) -> f32 {
        self.0.x()
    }

    /// Y component.
    #[inline]
    pub fn y(self) -> f32 {
        self.0.y()
    }

    /// Z component.
    #[inline]
    pub fn z(self) -> f32 {
        self.0.z()
    }

    /// W component.
    #[inline]
    pub fn w(self) -> f32 {
        self.0.w()
    }

    /// Dot product over all four components.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.0.dot4(other.0)
    }

    /// Squared length.
    #[inline]
    pub fn length_sq(self) -> f32 {
        self.0.length_sq4()
    }

    /// Length.
    #[inline]
    pub fn length(self) -> f32 {
        self.0.length4()
    }

    /// Unit vector in the same direction; a zero vector is returned unchanged.
    #[inline]
    pub fn normalize(self) -> Self {
        Self(self.0.normalize4())
    }

    /// Rotate about the X axis by `angle` radians. W is preserved.
    pub fn rotate_x(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let [x, y, z, w] = self.to_array();
        Self::new(x, y * c - z * s, y * s + z * c, w)
    }

    /// Rotate about the Y axis by `angle` radians. W is preserved.
    pub fn rotate_y(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let [x, y, z, w] = self.to_array();
        Self::new(x * c + z * s, y, -x * s + z * c, w)
    }

    /// Rotate about the Z axis by `angle` radians. W is preserved.
    pub fn rotate_z(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let [x, y, z, w] = self.to_array();
        Self::new(x * c - y * s, x * s + y * c, z, w)
    }
}

impl From<Vec4> for SimdVec4 {
    fn from(v: Vec4) -> Self {
        Self::load(v)
    }
}

impl From<Vec3> for SimdVec3 {
    fn from(v: Vec3) -> Self {
        Self::load(v)
    }
}

impl From<Vec2> for SimdVec2 {
    fn from(v: Vec2) -> Self {
        Self::load(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_storage_layout() {
        assert_eq!(std::mem::size_of::<Vec2>(), 8);
        assert_eq!(std::mem::size_of::<Vec3>(), 12);
        assert_eq!(std::mem::size_of::<Vec4>(), 16);
        assert_eq!(std::mem::size_of::<SimdVec3>(), 16);
        assert_eq!(std::mem::align_of::<SimdVec3>(), 16);
    }

    #[test]
    fn test_load_store() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let s = SimdVec3::load(v);
        assert_eq!(s.simd().w(), 0.0);
        assert_eq!(s.store(), v);
        assert_eq!(SimdVec2::load(Vec2::new(4.0, 5.0)).store(), Vec2::new(4.0, 5.0));
    }

    #[test]
    fn test_vec3_ops() {
        let a = SimdVec3::new(1.0, 2.0, 3.0);
        let b = SimdVec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(b), 32.0);
        assert_eq!((a + b).to_array(), [5.0, 7.0, 9.0]);
        assert_eq!((b - a).to_array(), [3.0; 3]);
        assert_eq!(a.cross(b).to_array(), [-3.0, 6.0, -3.0]);
        assert_eq!(a.lerp(b, 0.5).to_array(), [2.5, 3.5, 4.5]);
        assert_eq!(SimdVec3::new(3.0, 4.0, 0.0).length(), 5.0);
        assert_eq!(SimdVec3::zero().normalize(), SimdVec3::zero());
    }

    #[test]
    fn test_vec2_ops() {
        let v = SimdVec2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert!(v.normalize().equals_eps(SimdVec2::new(0.6, 0.8), 1e-6));
        assert_eq!(v.perp().to_array(), [-4.0, 3.0]);
        assert_eq!(v.distance(SimdVec2::zero()), 5.0);
    }

    #[test]
    fn test_vec4_rotation() {
        let v = SimdVec4::new(1.0, 0.0, 0.0, 1.0);
        let r = v.rotate_z(FRAC_PI_2);
        assert!(r.equals_eps(SimdVec4::new(0.0, 1.0, 0.0, 1.0), 1e-6));

        let r = SimdVec4::new(0.0, 1.0, 0.0, 2.0).rotate_x(FRAC_PI_2);
        assert!(r.equals_eps(SimdVec4::new(0.0, 0.0, 1.0, 2.0), 1e-6));

        let r = SimdVec4::new(0.0, 0.0, 1.0, 0.0).rotate_y(FRAC_PI_2);
        assert!(r.equals_eps(SimdVec4::new(1.0, 0.0, 0.0, 0.0), 1e-6));
    }
}
