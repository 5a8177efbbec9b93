//! Integer square root over 256-bit values.

use alloy_primitives::U256;

/// Floor of the square root of `n`, via Newton's method.
///
/// Converges from above, so the first non-decreasing step ends the loop.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use pivot_amm::math::isqrt;
///
/// assert_eq!(isqrt(U256::from(16u8)), U256::from(4u8));
/// assert_eq!(isqrt(U256::from(17u8)), U256::from(4u8));
/// ```
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    let two = U256::from(2u8);
    let mut x = n;
    // ceil(n / 2) without risking n + 1 overflow
    let mut y = n / two + n % two;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    x
}
