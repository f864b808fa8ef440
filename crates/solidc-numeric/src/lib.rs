//! solidc Numeric Library
//!
//! Small fixed-size linear algebra on top of a portable 128-bit SIMD vector.
//!
//! # Architecture
//!
//! The crate is layered bottom-up:
//!
//! | Layer | Module | Contents |
//! |-------|--------|----------|
//! | SIMD primitive | [`simd`] | [`F32x4`]: four `f32` lanes, arch-dispatched at compile time |
//! | Vector facade | [`vector`] | `Vec2/3/4` storage records, `SimdVec2/3/4` compute types |
//! | Matrices | [`matrix`] | Column-major [`Mat3`] and [`Mat4`] |
//! | Decompositions | [`decomp`] | LU, triangular solves, Jacobi eigen, SVD, QR, power iteration |
//!
//! # Storage vs. compute
//!
//! Arrays of positions should be stored as [`Vec3`] (12 bytes, unaligned)
//! and loaded into [`SimdVec3`] (16 bytes, aligned) for arithmetic. The
//! split keeps bulk storage dense while every computation runs on full
//! registers.
//!
//! # Backends
//!
//! | Target | Backend |
//! |--------|---------|
//! | x86 / x86_64 with SSE2 | `sse` (SSE4.1 and FMA paths when enabled at compile time) |
//! | aarch64 with NEON | `neon` |
//! | anything else, or the `scalar` feature | `scalar` |
//!
//! Selection happens at compile time only; the observable semantics are
//! identical across backends.

#![warn(missing_docs)]

pub mod decomp;
pub mod matrix;
pub mod simd;
pub mod vector;

pub use decomp::DecompError;
pub use matrix::{Mat3, Mat4};
pub use simd::F32x4;
pub use vector::{SimdVec2, SimdVec3, SimdVec4, Vec2, Vec3, Vec4};
