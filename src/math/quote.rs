//! Constant-product quote helpers.
//!
//! These are the exact formulas the pair's invariant check accepts: a swap
//! that requests `get_amount_out(amount_in, ..)` after depositing
//! `amount_in` always passes, and one more unit of output always fails.
//! All divisions floor, which rounds every quote in the pool's favour.
//!
//! ```text
//! amount_in_with_fee = amount_in × 997
//! amount_out = amount_in_with_fee × reserve_out
//!              / (reserve_in × 1000 + amount_in_with_fee)
//! ```

use alloy_primitives::U256;

use super::mul_div;
use crate::domain::Amount;
use crate::error::AmmError;

/// Fee denominator: balances are scaled by this before the fee is taken.
pub const FEE_DENOMINATOR: u64 = 1_000;

/// Fee numerator: `3 / 1000` = 0.3% of every input.
pub const FEE_NUMERATOR: u64 = 3;

/// `FEE_DENOMINATOR − FEE_NUMERATOR`, the share of input that moves the price.
pub const FEE_COMPLEMENT: u64 = FEE_DENOMINATOR - FEE_NUMERATOR;

/// Maximum output for an exact input against the given reserves.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
///
/// # Examples
///
/// ```
/// use pivot_amm::domain::Amount;
/// use pivot_amm::math::get_amount_out;
///
/// let out = get_amount_out(
///     Amount::new(7_500),
///     Amount::new(7_000_000_000_000_000_000),
///     Amount::new(1_000_000_000_000_000_000),
/// );
/// assert_eq!(out, Ok(Amount::new(1_068)));
/// ```
pub fn get_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }

    let amount_in_with_fee = amount_in.to_u256() * U256::from(FEE_COMPLEMENT);
    let denominator = reserve_in
        .to_u256()
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or(AmmError::Overflow("amount out denominator overflow"))?;

    let amount_out = mul_div(amount_in_with_fee, reserve_out.to_u256(), denominator)?;
    Amount::try_from_u256(amount_out, "amount out exceeds 128 bits")
}

/// Minimum input required to receive exactly `amount_out`.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out ≥ reserve_out`.
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
pub fn get_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    let numerator = reserve_in
        .to_u256()
        .checked_mul(amount_out.to_u256())
        .and_then(|n| n.checked_mul(U256::from(FEE_DENOMINATOR)))
        .ok_or(AmmError::Overflow("amount in numerator overflow"))?;
    // amount_out < reserve_out was checked above
    let denominator = (reserve_out.to_u256() - amount_out.to_u256()) * U256::from(FEE_COMPLEMENT);

    let amount_in = numerator / denominator + U256::from(1u8);
    Amount::try_from_u256(amount_in, "amount in exceeds 128 bits")
}

/// Amount of the other asset equivalent to `amount_a` at the current
/// reserve ratio, with no fee.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let amount_b = mul_div(amount_a.to_u256(), reserve_b.to_u256(), reserve_a.to_u256())?;
    Amount::try_from_u256(amount_b, "quote exceeds 128 bits")
}
