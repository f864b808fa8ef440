//! solidc Prelude - numeric foundations
//!
//! Leaf-level numeric building blocks shared by the rest of solidc.
//!
//! # Overview
//!
//! The prelude contains:
//! - Checked integer arithmetic that reports overflow alongside the wrapped
//!   two's-complement result ([`checked`])
//! - Floating-point comparison by absolute/relative tolerance or ULP distance,
//!   with explicit NaN and infinity rules ([`float_cmp`])
//! - Strict numeric string conversion with a tri-state
//!   `{Success, Invalid, Overflow}` outcome ([`convert`])
//!
//! # Conventions
//!
//! - Nothing in this crate panics on user input
//! - Fallible conversions return `Result`; the caller's binding is left
//!   untouched on error
//! - Comparison configuration is a small `Copy` value passed by value

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod checked;
pub mod convert;
pub mod float_cmp;

pub use checked::{checked_add, checked_mul, checked_sub, CheckedArith};
pub use convert::{error_string, ConvertError, ConvertStatus};
pub use float_cmp::{cmp_double, cmp_float, cmp_long_double, CmpConfig, CmpMode};
