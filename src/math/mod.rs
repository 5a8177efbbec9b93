//! Arithmetic utilities for pair calculations.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe operations
//! on domain newtypes, 256-bit [`mul_div`] and [`isqrt`], and the
//! constant-product quote helpers.

mod checked;
mod quote;
mod sqrt;

pub use checked::{mul_div, CheckedArithmetic};
pub use quote::{
    get_amount_in, get_amount_out, quote, FEE_COMPLEMENT, FEE_DENOMINATOR, FEE_NUMERATOR,
};
pub use sqrt::isqrt;
