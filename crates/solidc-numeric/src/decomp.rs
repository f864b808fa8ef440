//! Matrix decompositions
//!
//! Small fixed-size factorizations on [`Mat3`] and [`Mat4`]:
//!
//! - **LU**: `P·A = L·U` with partial pivoting ([`mat4_lu`], [`mat3_lu`])
//! - **Triangular solves** and linear systems ([`mat4_solve`], [`mat3_solve`])
//! - **Jacobi eigendecomposition** for symmetric 3x3 ([`mat3_eigen_symmetric`])
//! - **SVD** for 3x3 ([`mat3_svd`])
//! - **QR** for 4x4 by modified Gram-Schmidt ([`mat4_qr`])
//! - **Power iteration** for the dominant eigenpair ([`mat4_power_iteration`])
//! - Norms, condition number and positive-definiteness tests
//!
//! # Numerical Stability
//!
//! LU pivots on the largest remaining column entry and reports a pivot
//! below `1e-6` as [`DecompError::Singular`]. The Jacobi and SVD routines
//! accumulate in `f64` and round to `f32` at the end.
//!
//! # Example
//!
//! ```
//! use solidc_numeric::decomp::mat4_solve;
//! use solidc_numeric::{Mat4, SimdVec4};
//!
//! let a = Mat4::from_diagonal([2.0, 1.0, 1.0, 1.0]);
//! let x = mat4_solve(&a, SimdVec4::new(4.0, 3.0, 1.0, 1.0));
//! assert!(x.equals_eps(SimdVec4::new(2.0, 3.0, 1.0, 1.0), 1e-5));
//! ```

use thiserror::Error;
use tracing::{debug, trace};

use crate::matrix::{Mat3, Mat4};
use crate::simd::F32x4;
use crate::vector::{SimdVec3, SimdVec4};

/// Pivots below this magnitude are treated as zero.
pub const PIVOT_EPSILON: f32 = 1e-6;

/// Off-diagonal magnitude below which Jacobi rotation stops.
pub const JACOBI_EPSILON: f64 = 1e-10;

/// Maximum number of Jacobi rotations, each zeroing the largest
/// off-diagonal entry.
pub const JACOBI_MAX_ROTATIONS: usize = 32;

/// Singular values at or below this are treated as zero.
pub const SINGULAR_EPSILON: f64 = 1e-6;

// ============================================================
// Error Types
// ============================================================

/// Errors that can occur during matrix decomposition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecompError {
    /// A pivot fell below [`PIVOT_EPSILON`].
    #[error("matrix is singular at pivot {pivot_index}: value = {value:.2e}")]
    Singular {
        /// Column at which elimination stopped.
        pivot_index: usize,
        /// The offending pivot.
        value: f64,
    },
    /// A leading principal minor is not positive.
    #[error("matrix is not positive definite at minor {index}")]
    NotPositiveDefinite {
        /// Size of the failing minor minus one.
        index: usize,
    },
}

// ============================================================
// LU Decomposition
// ============================================================

struct LuParts<const N: usize> {
    l: [[f32; N]; N],
    u: [[f32; N]; N],
    perm: [usize; N],
    swaps: usize,
}

/// Row-major LU with partial pivoting.
fn lu_rows<const N: usize>(a: [[f32; N]; N]) -> Result<LuParts<N>, DecompError> {
    let mut u = a;
    let mut l = [[0.0f32; N]; N];
    let mut perm: [usize; N] = std::array::from_fn(|i| i);
    let mut swaps = 0;

    for k in 0..N {
        let mut p = k;
        for i in (k + 1)..N {
            if u[i][k].abs() > u[p][k].abs() {
                p = i;
            }
        }

        let pivot = u[p][k];
        if pivot.abs() < PIVOT_EPSILON {
            debug!(pivot_index = k, value = pivot, "lu: singular pivot");
            return Err(DecompError::Singular {
                pivot_index: k,
                value: f64::from(pivot),
            });
        }

        if p != k {
            u.swap(p, k);
            l.swap(p, k);
            perm.swap(p, k);
            swaps += 1;
        }

        for i in (k + 1)..N {
            let factor = u[i][k] / u[k][k];
            l[i][k] = factor;
            for j in k..N {
                u[i][j] -= factor * u[k][j];
            }
            u[i][k] = 0.0;
        }
    }

    for (i, row) in l.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    Ok(LuParts { l, u, perm, swaps })
}

/// LU factors of a [`Mat4`]: `P·A = L·U`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lu4 {
    /// Unit lower-triangular factor.
    pub l: Mat4,
    /// Upper-triangular factor.
    pub u: Mat4,
    /// Permutation matrix.
    pub p: Mat4,
    /// Row `i` of `P·A` is row `perm[i]` of `A`.
    pub perm: [usize; 4],
    /// Number of row swaps performed.
    pub swaps: usize,
}

impl Lu4 {
    /// Solve `A·x = b` using the stored factors.
    pub fn solve(&self, b: SimdVec4) -> SimdVec4 {
        let b = b.to_array();
        let pb = SimdVec4::from_array(self.perm.map(|i| b[i]));
        backward_substitution_mat4(&self.u, forward_substitution_mat4(&self.l, pb))
    }

    /// Determinant of `A`.
    pub fn determinant(&self) -> f32 {
        let diag: f32 = (0..4).map(|i| self.u.get(i, i)).product();
        if self.swaps % 2 == 0 {
            diag
        } else {
            -diag
        }
    }
}

/// LU factors of a [`Mat3`]: `P·A = L·U`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lu3 {
    /// Unit lower-triangular factor.
    pub l: Mat3,
    /// Upper-triangular factor.
    pub u: Mat3,
    /// Permutation matrix.
    pub p: Mat3,
    /// Row `i` of `P·A` is row `perm[i]` of `A`.
    pub perm: [usize; 3],
    /// Number of row swaps performed.
    pub swaps: usize,
}

impl Lu3 {
    /// Solve `A·x = b` using the stored factors.
    pub fn solve(&self, b: SimdVec3) -> SimdVec3 {
        let b = b.to_array();
        let pb = SimdVec3::from_array(self.perm.map(|i| b[i]));
        backward_substitution_mat3(&self.u, forward_substitution_mat3(&self.l, pb))
    }

    /// Determinant of `A`.
    pub fn determinant(&self) -> f32 {
        let diag: f32 = (0..3).map(|i| self.u.get(i, i)).product();
        if self.swaps % 2 == 0 {
            diag
        } else {
            -diag
        }
    }
}

fn permutation_rows<const N: usize>(perm: &[usize; N]) -> [[f32; N]; N] {
    let mut p = [[0.0f32; N]; N];
    for (i, &src) in perm.iter().enumerate() {
        p[i][src] = 1.0;
    }
    p
}

/// LU decomposition of a 4x4 matrix with partial pivoting.
pub fn mat4_lu(a: &Mat4) -> Result<Lu4, DecompError> {
    let parts = lu_rows(a.to_rows())?;
    Ok(Lu4 {
        l: Mat4::from_rows(parts.l),
        u: Mat4::from_rows(parts.u),
        p: Mat4::from_rows(permutation_rows(&parts.perm)),
        perm: parts.perm,
        swaps: parts.swaps,
    })
}

/// LU decomposition of a 3x3 matrix with partial pivoting.
pub fn mat3_lu(a: &Mat3) -> Result<Lu3, DecompError> {
    let parts = lu_rows(a.transpose().m)?;
    Ok(Lu3 {
        l: Mat3::from_rows(parts.l),
        u: Mat3::from_rows(parts.u),
        p: Mat3::from_rows(permutation_rows(&parts.perm)),
        perm: parts.perm,
        swaps: parts.swaps,
    })
}

// ============================================================
// Triangular Solves
// ============================================================

fn forward_rows<const N: usize>(l: &[[f32; N]; N], b: [f32; N]) -> [f32; N] {
    let mut x = [0.0f32; N];
    for i in 0..N {
        let sum: f32 = (0..i).map(|j| l[i][j] * x[j]).sum();
        x[i] = (b[i] - sum) / l[i][i];
    }
    x
}

fn backward_rows<const N: usize>(u: &[[f32; N]; N], b: [f32; N]) -> [f32; N] {
    let mut x = [0.0f32; N];
    for i in (0..N).rev() {
        let sum: f32 = ((i + 1)..N).map(|j| u[i][j] * x[j]).sum();
        x[i] = (b[i] - sum) / u[i][i];
    }
    x
}

/// Solve `L·x = b` for lower-triangular `L` with a non-zero diagonal.
pub fn forward_substitution_mat4(l: &Mat4, b: SimdVec4) -> SimdVec4 {
    SimdVec4::from_array(forward_rows(&l.to_rows(), b.to_array()))
}

/// Solve `U·x = b` for upper-triangular `U` with a non-zero diagonal.
pub fn backward_substitution_mat4(u: &Mat4, b: SimdVec4) -> SimdVec4 {
    SimdVec4::from_array(backward_rows(&u.to_rows(), b.to_array()))
}

/// Solve `L·x = b` for lower-triangular `L` with a non-zero diagonal.
pub fn forward_substitution_mat3(l: &Mat3, b: SimdVec3) -> SimdVec3 {
    SimdVec3::from_array(forward_rows(&l.transpose().m, b.to_array()))
}

/// Solve `U·x = b` for upper-triangular `U` with a non-zero diagonal.
pub fn backward_substitution_mat3(u: &Mat3, b: SimdVec3) -> SimdVec3 {
    SimdVec3::from_array(backward_rows(&u.transpose().m, b.to_array()))
}

/// Solve `A·x = b`, reporting a singular `A`.
pub fn mat4_try_solve(a: &Mat4, b: SimdVec4) -> Result<SimdVec4, DecompError> {
    Ok(mat4_lu(a)?.solve(b))
}

/// Solve `A·x = b`. Returns the zero vector if `A` is singular.
pub fn mat4_solve(a: &Mat4, b: SimdVec4) -> SimdVec4 {
    mat4_try_solve(a, b).unwrap_or_else(|_| SimdVec4::zero())
}

/// Solve `A·x = b`, reporting a singular `A`.
pub fn mat3_try_solve(a: &Mat3, b: SimdVec3) -> Result<SimdVec3, DecompError> {
    Ok(mat3_lu(a)?.solve(b))
}

/// Solve `A·x = b`. Returns the zero vector if `A` is singular.
pub fn mat3_solve(a: &Mat3, b: SimdVec3) -> SimdVec3 {
    mat3_try_solve(a, b).unwrap_or_else(|_| SimdVec3::zero())
}

// ============================================================
// Jacobi Eigendecomposition
// ============================================================

type M3 = [[f64; 3]; 3];

const IDENTITY3: M3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn mul3(a: &M3, b: &M3) -> M3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn transpose3(a: &M3) -> M3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in a.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            out[j][i] = *v;
        }
    }
    out
}

fn to_f64_rows(a: &Mat3) -> M3 {
    let mut out = [[0.0; 3]; 3];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = f64::from(a.get(r, c));
        }
    }
    out
}

fn from_f64_rows(a: &M3) -> Mat3 {
    Mat3::from_rows(a.map(|row| row.map(|v| v as f32)))
}

/// Cyclic-by-largest Jacobi on a symmetric matrix (row-major `f64`).
///
/// Returns the diagonal after rotation, the accumulated rotations (whose
/// columns are the eigenvectors) and how many rotations were applied.
fn jacobi3(mut a: M3) -> ([f64; 3], M3, usize) {
    let mut v = IDENTITY3;
    let mut applied = 0;

    for rotation in 0..JACOBI_MAX_ROTATIONS {
        let (p, q) = [(0, 1), (0, 2), (1, 2)]
            .into_iter()
            .fold((0, 1), |best, (i, j)| {
                if a[i][j].abs() > a[best.0][best.1].abs() {
                    (i, j)
                } else {
                    best
                }
            });

        let off = a[p][q].abs();
        if off < JACOBI_EPSILON {
            trace!(rotation, residual = off, "jacobi: converged");
            break;
        }

        let phi = 0.5 * (2.0 * a[p][q]).atan2(a[q][q] - a[p][p]);
        let (s, c) = phi.sin_cos();
        let mut j = IDENTITY3;
        j[p][p] = c;
        j[q][q] = c;
        j[p][q] = s;
        j[q][p] = -s;

        a = mul3(&transpose3(&j), &mul3(&a, &j));
        v = mul3(&v, &j);
        applied += 1;
    }

    ([a[0][0], a[1][1], a[2][2]], v, applied)
}

/// Eigenvalues and eigenvectors of a symmetric 3x3 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigen3 {
    /// Eigenvalues in the order the rotation left them on the diagonal.
    pub values: [f32; 3],
    /// Orthonormal eigenvectors as columns; column `i` pairs with `values[i]`.
    pub vectors: Mat3,
}

/// Jacobi eigendecomposition of a symmetric 3x3 matrix.
///
/// Only the symmetric part of `a` is meaningful; the upper and lower
/// triangles are assumed to agree.
pub fn mat3_eigen_symmetric(a: &Mat3) -> Eigen3 {
    let (values, vectors, _) = jacobi3(to_f64_rows(a));
    Eigen3 {
        values: values.map(|v| v as f32),
        vectors: from_f64_rows(&vectors),
    }
}

// ============================================================
// Singular Value Decomposition
// ============================================================

/// Factors `A = U·diag(S)·Vᵀ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd3 {
    /// Left singular vectors (columns), right-handed.
    pub u: Mat3,
    /// Singular values, descending.
    pub s: [f32; 3],
    /// Right singular vectors (columns).
    pub v: Mat3,
}

impl Svd3 {
    /// Rebuild `U·diag(S)·Vᵀ`.
    pub fn reconstruct(&self) -> Mat3 {
        self.u
            .mul(Mat3::from_diagonal(self.s))
            .mul(self.v.transpose())
    }
}

fn col3(m: &M3, c: usize) -> [f64; 3] {
    [m[0][c], m[1][c], m[2][c]]
}

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm3(a: [f64; 3]) -> f64 {
    dot3(a, a).sqrt()
}

fn scale3(a: [f64; 3], s: f64) -> [f64; 3] {
    a.map(|x| x * s)
}

/// Any unit vector orthogonal to the unit vector `a`.
fn orthogonal3(a: [f64; 3]) -> [f64; 3] {
    let axis = if a[0].abs() < 0.9 { [1.0, 0.0, 0.0] } else { [0.0, 1.0, 0.0] };
    let c = cross3(a, axis);
    scale3(c, 1.0 / norm3(c))
}

/// Singular value decomposition of a 3x3 matrix.
///
/// `V` comes from the Jacobi eigenvectors of `AᵀA`, sorted by descending
/// eigenvalue. Left vectors for zero singular values are completed with
/// cross products so `U` is always orthonormal. If `U` comes out
/// left-handed its third column is negated together with the third column
/// of `V`, which keeps the product unchanged.
pub fn mat3_svd(a: &Mat3) -> Svd3 {
    let a64 = to_f64_rows(a);
    let ata = mul3(&transpose3(&a64), &a64);
    let (values, vectors, _) = jacobi3(ata);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));

    let mut v = [[0.0f64; 3]; 3];
    let mut sigma = [0.0f64; 3];
    for (k, &src) in order.iter().enumerate() {
        sigma[k] = values[src].max(0.0).sqrt();
        for r in 0..3 {
            v[r][k] = vectors[r][src];
        }
    }

    // Left vectors as columns, built in column form then stored row-major.
    let mut u_cols = [[0.0f64; 3]; 3];
    for k in 0..3 {
        if sigma[k] > SINGULAR_EPSILON {
            let vk = col3(&v, k);
            let av = [dot3(a64[0], vk), dot3(a64[1], vk), dot3(a64[2], vk)];
            u_cols[k] = scale3(av, 1.0 / sigma[k]);
        }
    }

    let degenerate = |u: [f64; 3]| (norm3(u) - 1.0).abs() > 1e-3;
    if degenerate(u_cols[0]) {
        u_cols[0] = [1.0, 0.0, 0.0];
    }
    if degenerate(u_cols[1]) {
        u_cols[1] = orthogonal3(u_cols[0]);
    }
    if sigma[2] <= SINGULAR_EPSILON || degenerate(u_cols[2]) {
        let c = cross3(u_cols[0], u_cols[1]);
        u_cols[2] = scale3(c, 1.0 / norm3(c));
    }

    let det_u = dot3(u_cols[0], cross3(u_cols[1], u_cols[2]));
    if det_u < 0.0 {
        u_cols[2] = scale3(u_cols[2], -1.0);
        for row in v.iter_mut() {
            row[2] = -row[2];
        }
    }

    let u = Mat3::from_cols(u_cols.map(|c| c.map(|x| x as f32)));
    Svd3 {
        u,
        s: sigma.map(|x| x as f32),
        v: from_f64_rows(&v),
    }
}

// ============================================================
// QR Decomposition
// ============================================================

/// Factors `A = Q·R`.
#[derive(Debug, Clone, PartialEq)]
pub struct Qr4 {
    /// Orthonormal columns.
    pub q: Mat4,
    /// Upper-triangular factor.
    pub r: Mat4,
}

/// QR decomposition of a 4x4 matrix by modified Gram-Schmidt.
///
/// Residual norms below [`PIVOT_EPSILON`] are clamped to it, so a
/// rank-deficient input still yields finite factors.
pub fn mat4_qr(a: &Mat4) -> Qr4 {
    let mut q = [F32x4::zero(); 4];
    let mut r = Mat4::zero();

    for i in 0..4 {
        let mut v = a.cols[i];
        for j in 0..i {
            let rji = q[j].dot4(v);
            r.set(j, i, rji);
            v -= q[j] * rji;
        }
        let norm = v.length4().max(PIVOT_EPSILON);
        r.set(i, i, norm);
        q[i] = v / norm;
    }

    Qr4 {
        q: Mat4::from_simd_cols(q),
        r,
    }
}

// ============================================================
// Power Iteration
// ============================================================

/// Dominant eigenpair estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerIteration {
    /// Unit eigenvector estimate.
    pub vector: SimdVec4,
    /// Eigenvalue estimate `(A·v)·v`.
    pub value: f32,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether successive estimates came within the tolerance.
    pub converged: bool,
}

/// Power iteration from the normalized all-ones start vector.
///
/// Stops when two successive eigenvalue estimates differ by less than `tol`
/// or after `max_iter` steps, returning the best estimate so far.
pub fn mat4_power_iteration(a: &Mat4, max_iter: usize, tol: f32) -> PowerIteration {
    let mut v = SimdVec4::splat(1.0).normalize();
    let mut value = a.mul_vec4(v).dot(v);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        iterations += 1;
        let w = a.mul_vec4(v);
        if w.length_sq() <= 0.0 {
            // v is in the null space; the estimate cannot improve.
            break;
        }
        v = w.normalize();
        let next = a.mul_vec4(v).dot(v);
        let delta = (next - value).abs();
        value = next;
        if delta < tol {
            converged = true;
            trace!(iterations, residual = delta, "power iteration: converged");
            break;
        }
    }

    PowerIteration {
        vector: v,
        value,
        iterations,
        converged,
    }
}

// ============================================================
// Norms and Properties
// ============================================================

/// Frobenius norm, `sqrt(sum of squared elements)`.
pub fn mat4_norm_frobenius(a: &Mat4) -> f32 {
    let sums = F32x4::new(
        a.cols[0].dot4(a.cols[0]),
        a.cols[1].dot4(a.cols[1]),
        a.cols[2].dot4(a.cols[2]),
        a.cols[3].dot4(a.cols[3]),
    );
    sums.hadd().sqrt()
}

/// Frobenius norm of a 3x3 matrix.
pub fn mat3_norm_frobenius(a: &Mat3) -> f32 {
    (0..3).map(|c| a.col(c).length_sq()).sum::<f32>().sqrt()
}

/// Frobenius condition number `‖A‖·‖A⁻¹‖`; infinite for singular `A`.
pub fn mat4_condition_number(a: &Mat4) -> f32 {
    match a.inverse() {
        Some(inv) => mat4_norm_frobenius(a) * mat4_norm_frobenius(&inv),
        None => f32::INFINITY,
    }
}

fn det_rows(m: &[[f64; 4]; 4], n: usize) -> f64 {
    match n {
        1 => m[0][0],
        2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
        _ => {
            // Laplace expansion along the first row.
            let mut det = 0.0;
            for c in 0..n {
                let mut minor = [[0.0f64; 4]; 4];
                for r in 1..n {
                    let mut mc = 0;
                    for cc in 0..n {
                        if cc != c {
                            minor[r - 1][mc] = m[r][cc];
                            mc += 1;
                        }
                    }
                }
                let sign = if c % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * m[0][c] * det_rows(&minor, n - 1);
            }
            det
        }
    }
}

fn check_minors(rows: &[[f64; 4]; 4], n: usize) -> Result<(), DecompError> {
    for k in 1..=n {
        if det_rows(rows, k) <= 0.0 {
            return Err(DecompError::NotPositiveDefinite { index: k - 1 });
        }
    }
    Ok(())
}

/// Sylvester's criterion: every leading principal minor is positive.
///
/// The criterion characterizes positive definiteness for symmetric
/// matrices; the caller is responsible for passing one.
pub fn mat4_check_positive_definite(a: &Mat4) -> Result<(), DecompError> {
    let rows = a.to_rows().map(|r| r.map(f64::from));
    check_minors(&rows, 4)
}

/// True if every leading principal minor of `a` is positive.
pub fn mat4_is_positive_definite(a: &Mat4) -> bool {
    mat4_check_positive_definite(a).is_ok()
}

/// True if every leading principal minor of `a` is positive.
pub fn mat3_is_positive_definite(a: &Mat3) -> bool {
    let mut rows = [[0.0f64; 4]; 4];
    for (r, row) in to_f64_rows(a).iter().enumerate() {
        rows[r][..3].copy_from_slice(row);
    }
    check_minors(&rows, 3).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_jacobi_counts_rotations() {
        let (values, _, applied) = jacobi3([[2.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, -1.0]]);
        assert_eq!(applied, 0);
        assert_eq!(values, [2.0, 5.0, -1.0]);

        let dense = [[4.0, 1.0, 2.0], [1.0, 3.0, 0.5], [2.0, 0.5, 6.0]];
        let (values, _, applied) = jacobi3(dense);
        assert!(applied > 0 && applied <= JACOBI_MAX_ROTATIONS);
        let trace: f64 = values.iter().sum();
        assert!((trace - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_lu_reconstructs() {
        let a = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 1.0, 0.0, 1.0],
            [0.0, 4.0, 1.0, 2.0],
            [3.0, 0.0, 2.0, 1.0],
        ]);
        let lu = mat4_lu(&a).unwrap();
        assert!((lu.p * a).approx_eq(&(lu.l * lu.u), 1e-5));
        for i in 0..4 {
            assert_eq!(lu.l.get(i, i), 1.0);
            for j in 0..i {
                assert_eq!(lu.u.get(i, j), 0.0);
            }
        }
        assert!(approx_eq(lu.determinant(), a.determinant(), 1e-3));
    }

    #[test]
    fn test_lu_singular() {
        let a = Mat4::from_rows([
            [1.0, 2.0, 0.0, 0.0],
            [2.0, 4.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert!(matches!(mat4_lu(&a), Err(DecompError::Singular { pivot_index: 1, .. })));
        assert_eq!(mat4_solve(&a, SimdVec4::splat(1.0)), SimdVec4::zero());
        assert!(mat4_try_solve(&a, SimdVec4::splat(1.0)).is_err());
    }

    #[test]
    fn test_mat3_lu_solve() {
        let a = Mat3::from_rows([[4.0, 3.0, 0.0], [6.0, 3.0, 0.0], [0.0, 0.0, 2.0]]);
        let lu = mat3_lu(&a).unwrap();
        assert!(approx_eq(lu.determinant(), -12.0, 1e-5));
        let x = mat3_solve(&a, SimdVec3::new(10.0, 12.0, 4.0));
        assert!(x.equals_eps(SimdVec3::new(1.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn test_triangular_solves() {
        let l = Mat4::from_rows([
            [2.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
            [0.0, 3.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 4.0],
        ]);
        let x = forward_substitution_mat4(&l, SimdVec4::new(2.0, 3.0, 7.0, 9.0));
        assert!(x.equals_eps(SimdVec4::new(1.0, 2.0, 1.0, 2.0), 1e-6));

        let u = l.transpose();
        let b = u.mul_vec4(SimdVec4::new(1.0, -1.0, 2.0, 0.5));
        let x = backward_substitution_mat4(&u, b);
        assert!(x.equals_eps(SimdVec4::new(1.0, -1.0, 2.0, 0.5), 1e-5));
    }

    #[test]
    fn test_jacobi_diagonal_input() {
        let a = Mat3::from_diagonal([3.0, 1.0, 2.0]);
        let e = mat3_eigen_symmetric(&a);
        assert_eq!(e.values, [3.0, 1.0, 2.0]);
        assert!(e.vectors.approx_eq(&Mat3::IDENTITY, 1e-6));
    }

    #[test]
    fn test_qr_rank_deficient_is_finite() {
        let a = Mat4::from_cols([
            [1.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let qr = mat4_qr(&a);
        assert_eq!(qr.r.get(1, 1), PIVOT_EPSILON);
        assert!(qr.q.to_cols().iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_norms() {
        let a = Mat4::from_diagonal([1.0, 2.0, 2.0, 4.0]);
        assert_eq!(mat4_norm_frobenius(&a), 5.0);
        assert!(approx_eq(mat4_condition_number(&Mat4::identity()), 4.0, 1e-6));
        assert_eq!(mat4_condition_number(&Mat4::zero()), f32::INFINITY);
        assert_eq!(mat3_norm_frobenius(&Mat3::from_diagonal([3.0, 4.0, 0.0])), 5.0);
    }

    #[test]
    fn test_positive_definite() {
        let spd = Mat4::from_rows([
            [4.0, 1.0, 0.0, 0.0],
            [1.0, 3.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert!(mat4_is_positive_definite(&spd));
        let indefinite = Mat4::from_diagonal([1.0, -1.0, 1.0, 1.0]);
        assert_eq!(
            mat4_check_positive_definite(&indefinite),
            Err(DecompError::NotPositiveDefinite { index: 1 })
        );
        assert!(mat3_is_positive_definite(&Mat3::IDENTITY));
        assert!(!mat3_is_positive_definite(&Mat3::from_diagonal([1.0, 1.0, 0.0])));
    }

    #[test]
    fn test_error_display() {
        let e = DecompError::Singular { pivot_index: 2, value: 0.0 };
        assert_eq!(e.to_string(), "matrix is singular at pivot 2: value = 0.00e0");
    }
}
