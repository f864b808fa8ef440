//! 3x3 and 4x4 matrices.
//!
//! # Overview
//!
//! Both matrix types are column-major: `m[col][row]`. [`Mat4`] stores its
//! columns as [`F32x4`] registers so products and transforms run entirely
//! in SIMD. [`Mat3`] keeps plain arrays and loads columns on demand.
//!
//! Transform constructors follow the OpenGL conventions: right-handed view
//! space, clip-space depth in `[-1, 1]`.
//!
//! # Example
//!
//! ```
//! use solidc_numeric::{Mat4, SimdVec4};
//!
//! let t = Mat4::translate(1.0, 2.0, 3.0);
//! let p = t.mul_vec4(SimdVec4::new(0.0, 0.0, 0.0, 1.0));
//! assert_eq!(p.to_array(), [1.0, 2.0, 3.0, 1.0]);
//! ```

use std::fmt;
use std::ops::Mul;

use crate::simd::F32x4;
use crate::vector::{SimdVec3, SimdVec4};

// ============================================================
// Mat3
// ============================================================

/// Column-major 3x3 matrix.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// Columns, `m[col][row]`.
    pub m: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// The zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Build from columns.
    pub const fn from_cols(m: [[f32; 3]; 3]) -> Self {
        Self { m }
    }

    /// Build from rows, as a matrix is usually written on paper.
    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self::from_cols(rows).transpose()
    }

    /// Diagonal matrix.
    pub fn from_diagonal(d: [f32; 3]) -> Self {
        let mut out = Self::ZERO;
        for (i, v) in d.into_iter().enumerate() {
            out.m[i][i] = v;
        }
        out
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col][row]
    }

    /// Set the element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[col][row] = value;
    }

    /// Column `i` as a compute vector.
    #[inline]
    pub fn col(&self, i: usize) -> SimdVec3 {
        SimdVec3::from_array(self.m[i])
    }

    /// Row `i` as a compute vector.
    #[inline]
    pub fn row(&self, i: usize) -> SimdVec3 {
        SimdVec3::new(self.m[0][i], self.m[1][i], self.m[2][i])
    }

    /// Matrix product `self * other`.
    pub fn mul(self, other: Self) -> Self {
        let mut out = Self::ZERO;
        for j in 0..3 {
            out.m[j] = self.mul_vec3(other.col(j)).to_array();
        }
        out
    }

    /// Matrix-vector product.
    #[inline]
    pub fn mul_vec3(&self, v: SimdVec3) -> SimdVec3 {
        let v = v.simd();
        let c0 = self.col(0).simd();
        let c1 = self.col(1).simd();
        let c2 = self.col(2).simd();
        SimdVec3::from_simd(c2.madd(v.splat_z(), c1.madd(v.splat_y(), c0 * v.splat_x())))
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for c in 0..3 {
            for r in 0..3 {
                out.m[r][c] = self.m[c][r];
            }
        }
        out
    }

    /// Determinant, `c0 . (c1 x c2)`.
    pub fn determinant(&self) -> f32 {
        self.col(0).dot(self.col(1).cross(self.col(2)))
    }

    /// Inverse via the adjugate, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let (c0, c1, c2) = (self.col(0), self.col(1), self.col(2));
        let r0 = c1.cross(c2);
        let r1 = c2.cross(c0);
        let r2 = c0.cross(c1);
        let det = c0.dot(r0);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        // The cross products are the rows of the inverse.
        Some(Self::from_rows([
            r0.scale(inv_det).to_array(),
            r1.scale(inv_det).to_array(),
            r2.scale(inv_det).to_array(),
        ]))
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> f32 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// Multiply every element by `s`.
    pub fn scale_by(&self, s: f32) -> Self {
        let mut out = *self;
        for col in &mut out.m {
            for v in col.iter_mut() {
                *v *= s;
            }
        }
        out
    }

    /// True if every element differs by at most `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Mat3::mul(self, rhs)
    }
}

// ============================================================
// Mat4
// ============================================================

/// Column-major 4x4 matrix of SIMD columns.
#[repr(C, align(16))]
#[derive(Clone, Copy, PartialEq)]
pub struct Mat4 {
    /// Columns.
    pub cols: [F32x4; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[f32; 4]> = (0..4).map(|r| self.row(r).to_array()).collect();
        f.debug_struct("Mat4").field("rows", &rows).finish()
    }
}

impl Mat4 {
    // ========================================================
    // Construction
    // ========================================================

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::from_diagonal([1.0; 4])
    }

    /// The zero matrix.
    pub fn zero() -> Self {
        Self { cols: [F32x4::zero(); 4] }
    }

    /// Build from SIMD columns.
    pub fn from_simd_cols(cols: [F32x4; 4]) -> Self {
        Self { cols }
    }

    /// Build from column arrays.
    pub fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols: cols.map(F32x4::from_array) }
    }

    /// Build from rows, as a matrix is usually written on paper.
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self::from_cols(rows).transpose()
    }

    /// Diagonal matrix.
    pub fn from_diagonal(d: [f32; 4]) -> Self {
        let mut out = Self::zero();
        for (i, v) in d.into_iter().enumerate() {
            out.cols[i] = out.cols[i].with_lane(i, v);
        }
        out
    }

    /// Columns as arrays.
    pub fn to_cols(&self) -> [[f32; 4]; 4] {
        self.cols.map(F32x4::to_array)
    }

    /// Rows as arrays.
    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        self.transpose().to_cols()
    }

    // ========================================================
    // Access
    // ========================================================

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col].lane(row)
    }

    /// Set the element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.cols[col] = self.cols[col].with_lane(row, value);
    }

    /// Column `i`.
    #[inline]
    pub fn col(&self, i: usize) -> SimdVec4 {
        SimdVec4::from_simd(self.cols[i])
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> SimdVec4 {
        SimdVec4::new(
            self.cols[0].lane(i),
            self.cols[1].lane(i),
            self.cols[2].lane(i),
            self.cols[3].lane(i),
        )
    }

    // ========================================================
    // Arithmetic
    // ========================================================

    #[inline]
    fn mul_simd(&self, v: F32x4) -> F32x4 {
        let [c0, c1, c2, c3] = self.cols;
        c3.madd(v.splat_w(), c2.madd(v.splat_z(), c1.madd(v.splat_y(), c0 * v.splat_x())))
    }

    /// Matrix product `self * other`.
    pub fn mul(self, other: Self) -> Self {
        Self { cols: other.cols.map(|c| self.mul_simd(c)) }
    }

    /// Matrix-vector product.
    #[inline]
    pub fn mul_vec4(&self, v: SimdVec4) -> SimdVec4 {
        SimdVec4::from_simd(self.mul_simd(v.simd()))
    }

    /// Transform a point (w = 1), dropping the resulting w.
    pub fn transform_point(&self, p: SimdVec3) -> SimdVec3 {
        self.mul_vec4(SimdVec4::from_vec3(p, 1.0)).xyz()
    }

    /// Transform a direction (w = 0).
    pub fn transform_direction(&self, d: SimdVec3) -> SimdVec3 {
        self.mul_vec4(SimdVec4::from_vec3(d, 0.0)).xyz()
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        let mut out = *self;
        for (c, o) in out.cols.iter_mut().zip(other.cols) {
            *c += o;
        }
        out
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Self) -> Self {
        let mut out = *self;
        for (c, o) in out.cols.iter_mut().zip(other.cols) {
            *c -= o;
        }
        out
    }

    /// Multiply every element by `s`.
    pub fn scale_by(&self, s: f32) -> Self {
        Self { cols: self.cols.map(|c| c * s) }
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        let mut cols = self.cols;
        F32x4::transpose4(&mut cols);
        Self { cols }
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> f32 {
        (0..4).map(|i| self.get(i, i)).sum()
    }

    // ========================================================
    // Transforms
    // ========================================================

    /// Translation by `(x, y, z)`.
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.cols[3] = F32x4::new(x, y, z, 1.0);
        m
    }

    /// Non-uniform scale.
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_diagonal([x, y, z, 1.0])
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about an arbitrary axis by `angle` radians.
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn rotate(axis: SimdVec3, angle: f32) -> Self {
        if axis.length_sq() <= 0.0 {
            return Self::identity();
        }
        let [x, y, z] = axis.normalize().to_array();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self::from_cols([
            [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
            [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
            [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed view matrix looking from `eye` toward `target`.
    pub fn look_at(eye: SimdVec3, target: SimdVec3, up: SimdVec3) -> Self {
        let f = (target - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);
        Self::from_cols([
            [s.x(), u.x(), -f.x(), 0.0],
            [s.y(), u.y(), -f.y(), 0.0],
            [s.z(), u.z(), -f.z(), 0.0],
            [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
        ])
    }

    /// Perspective projection. `fovy` is the vertical field of view in radians.
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fovy * 0.5).tan();
        let depth = near - far;
        Self::from_cols([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / depth, -1.0],
            [0.0, 0.0, 2.0 * far * near / depth, 0.0],
        ])
    }

    /// Orthographic projection of the box `[left, right] x [bottom, top] x [near, far]`.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rl = right - left;
        let tb = top - bottom;
        let fnr = far - near;
        Self::from_cols([
            [2.0 / rl, 0.0, 0.0, 0.0],
            [0.0, 2.0 / tb, 0.0, 0.0],
            [0.0, 0.0, -2.0 / fnr, 0.0],
            [-(right + left) / rl, -(top + bottom) / tb, -(far + near) / fnr, 1.0],
        ])
    }

    // ========================================================
    // Inverse and Determinant
    // ========================================================

    /// Cofactor expansion over the flattened column-major elements,
    /// evaluated in `f64`. Returns the adjugate and the determinant.
    fn adjugate(&self) -> ([f64; 16], f64) {
        let mut m = [0.0f64; 16];
        for (i, v) in self.to_cols().iter().flatten().enumerate() {
            m[i] = f64::from(*v);
        }
        let mut inv = [0.0f64; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        (inv, det)
    }

    /// Determinant.
    pub fn determinant(&self) -> f32 {
        self.adjugate().1 as f32
    }

    /// General inverse, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let (adj, det) = self.adjugate();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let mut cols = [[0.0f32; 4]; 4];
        for (i, v) in adj.iter().enumerate() {
            cols[i / 4][i % 4] = (v * inv_det) as f32;
        }
        Some(Self::from_cols(cols))
    }

    // ========================================================
    // Comparison
    // ========================================================

    /// True if every element differs by at most `f32::EPSILON`.
    pub fn equal(&self, other: &Self) -> bool {
        self.approx_eq(other, f32::EPSILON)
    }

    /// True if every element differs by at most `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.equals_eps(*b, eps))
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Mat4::mul(self, rhs)
    }
}

impl Mul<SimdVec4> for Mat4 {
    type Output = SimdVec4;

    fn mul(self, rhs: SimdVec4) -> SimdVec4 {
        self.mul_vec4(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_mat3_basics() {
        let a = Mat3::from_rows([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        assert_eq!(a.get(0, 1), 2.0);
        assert_eq!(a.determinant(), 1.0);
        assert_eq!(a.mul(Mat3::IDENTITY), a);
        assert_eq!(a.transpose().transpose(), a);

        let inv = a.inverse().expect("invertible");
        assert!(a.mul(inv).approx_eq(&Mat3::IDENTITY, 1e-5));
        assert_eq!(Mat3::ZERO.inverse(), None);
    }

    #[test]
    fn test_mat3_mul_vec() {
        let a = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let v = a.mul_vec3(SimdVec3::new(1.0, 0.0, -1.0));
        assert_eq!(v.to_array(), [-2.0, -2.0, -2.0]);
    }

    #[test]
    fn test_mat4_identity_and_layout() {
        let i = Mat4::identity();
        assert_eq!(i.get(2, 2), 1.0);
        assert_eq!(i.get(2, 1), 0.0);
        assert_eq!(std::mem::size_of::<Mat4>(), 64);
        assert_eq!(std::mem::align_of::<Mat4>(), 16);
    }

    #[test]
    fn test_mat4_mul_order() {
        let t = Mat4::translate(1.0, 0.0, 0.0);
        let s = Mat4::scale(2.0, 2.0, 2.0);
        let p = SimdVec4::new(1.0, 1.0, 1.0, 1.0);
        // Scale first, then translate.
        assert_eq!((t * s).mul_vec4(p).to_array(), [3.0, 2.0, 2.0, 1.0]);
        assert_eq!((s * t).mul_vec4(p).to_array(), [4.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_mat4_rotations() {
        let r = Mat4::rotate_z(FRAC_PI_2);
        let v = r.mul_vec4(SimdVec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(v.equals_eps(SimdVec4::new(0.0, 1.0, 0.0, 1.0), 1e-6));

        let axis = Mat4::rotate(SimdVec3::new(0.0, 0.0, 2.0), FRAC_PI_2);
        assert!(axis.approx_eq(&r, 1e-6));
        assert!(Mat4::rotate(SimdVec3::new(1.0, 0.0, 0.0), 0.7).approx_eq(&Mat4::rotate_x(0.7), 1e-6));
        assert!(Mat4::rotate(SimdVec3::new(0.0, 1.0, 0.0), 0.7).approx_eq(&Mat4::rotate_y(0.7), 1e-6));
    }

    #[test]
    fn test_mat4_inverse() {
        let m = Mat4::translate(1.0, 2.0, 3.0) * Mat4::rotate_y(0.3) * Mat4::scale(2.0, 3.0, 4.0);
        let inv = m.inverse().expect("invertible");
        assert!((m * inv).approx_eq(&Mat4::identity(), 1e-5));
        assert!((m.determinant() - 24.0).abs() < 1e-4);
        assert_eq!(Mat4::zero().inverse(), None);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = SimdVec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at(eye, SimdVec3::zero(), SimdVec3::new(0.0, 1.0, 0.0));
        assert!(view.transform_point(eye).equals_eps(SimdVec3::zero(), 1e-6));
        let target = view.transform_point(SimdVec3::zero());
        assert!(target.equals_eps(SimdVec3::new(0.0, 0.0, -5.0), 1e-6));
    }

    #[test]
    fn test_projections() {
        let p = Mat4::perspective(FRAC_PI_2, 1.0, 1.0, 10.0);
        let near = p.mul_vec4(SimdVec4::new(0.0, 0.0, -1.0, 1.0));
        assert!((near.z() / near.w() + 1.0).abs() < 1e-6);
        let far = p.mul_vec4(SimdVec4::new(0.0, 0.0, -10.0, 1.0));
        assert!((far.z() / far.w() - 1.0).abs() < 1e-5);

        let o = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0);
        let corner = o.transform_point(SimdVec3::new(2.0, 1.0, -10.0));
        assert!(corner.equals_eps(SimdVec3::new(1.0, 1.0, 1.0), 1e-6));
    }
}
