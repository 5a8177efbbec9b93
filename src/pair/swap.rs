//! Swap request, observed flows and the fee-adjusted invariant check.
//!
//! A swap is settled optimistically: outputs leave first, then inputs are
//! inferred from how far the pair's balances sit above
//! `reserve − amount_out`.  The trade is accepted only if the product of
//! fee-adjusted balances does not fall below the product of the reserves:
//!
//! ```text
//! (balance0 × 1000 − amount0_in × 3) × (balance1 × 1000 − amount1_in × 3)
//!     ≥ reserve0 × reserve1 × 1000²
//! ```

use alloy_primitives::{Address, U256};

use super::ReserveState;
use crate::domain::Amount;
use crate::error::AmmError;
use crate::math::{FEE_DENOMINATOR, FEE_NUMERATOR};

/// Parameters of one swap call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest<'a> {
    /// `token0` to pay out.
    pub amount0_out: Amount,
    /// `token1` to pay out.
    pub amount1_out: Amount,
    /// Recipient of the outputs.
    pub to: Address,
    /// Opaque bytes forwarded to the callee, if any.
    pub data: &'a [u8],
}

impl<'a> SwapRequest<'a> {
    /// Creates a request with no callback data.
    pub const fn new(amount0_out: Amount, amount1_out: Amount, to: Address) -> Self {
        Self {
            amount0_out,
            amount1_out,
            to,
            data: &[],
        }
    }

    /// Attaches bytes to forward to the swap callee.
    #[must_use]
    pub fn with_data(mut self, data: &'a [u8]) -> Self {
        self.data = data;
        self
    }
}

/// What a settled swap moved, per asset and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapFlows {
    /// `token0` observed coming in.
    pub amount0_in: Amount,
    /// `token1` observed coming in.
    pub amount1_in: Amount,
    /// `token0` paid out.
    pub amount0_out: Amount,
    /// `token1` paid out.
    pub amount1_out: Amount,
}

impl SwapFlows {
    /// Returns `(amount_in, amount_out)` for the asset at `index` (0 or 1).
    #[must_use]
    pub const fn side(&self, index: u8) -> (Amount, Amount) {
        if index == 0 {
            (self.amount0_in, self.amount0_out)
        } else {
            (self.amount1_in, self.amount1_out)
        }
    }
}

/// Rejects requests that cannot settle before anything moves.
pub(crate) fn validate_request(
    amount0_out: Amount,
    amount1_out: Amount,
    reserves: &ReserveState,
) -> Result<(), AmmError> {
    if amount0_out.is_zero() && amount1_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if amount0_out >= reserves.reserve0() || amount1_out >= reserves.reserve1() {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(())
}

/// Infers inputs as `max(0, balance − (reserve − amount_out))` per asset.
///
/// Callers must have checked `amount_out < reserve` on both sides.
#[must_use]
pub fn observed_inputs(
    balance0: Amount,
    balance1: Amount,
    reserves: &ReserveState,
    amount0_out: Amount,
    amount1_out: Amount,
) -> (Amount, Amount) {
    let floor0 = reserves.reserve0().saturating_sub(&amount0_out);
    let floor1 = reserves.reserve1().saturating_sub(&amount1_out);
    (balance0.saturating_sub(&floor0), balance1.saturating_sub(&floor1))
}

/// Checks the fee-adjusted constant product against the pre-swap reserves.
///
/// # Errors
///
/// - [`AmmError::InvariantViolation`] if the adjusted product decreased.
/// - [`AmmError::Overflow`] if balances are too large to multiply in
///   256 bits; such balances could never be recorded as reserves anyway.
pub fn check_invariant(
    balance0: Amount,
    balance1: Amount,
    flows: &SwapFlows,
    reserves: &ReserveState,
) -> Result<(), AmmError> {
    let denominator = U256::from(FEE_DENOMINATOR);
    let fee = U256::from(FEE_NUMERATOR);

    // balance ≥ amount_in always holds, so neither subtraction can wrap
    let adjusted0 = balance0.to_u256() * denominator - flows.amount0_in.to_u256() * fee;
    let adjusted1 = balance1.to_u256() * denominator - flows.amount1_in.to_u256() * fee;

    let lhs = adjusted0
        .checked_mul(adjusted1)
        .ok_or(AmmError::Overflow("adjusted balance product"))?;
    let rhs = reserves.product() * denominator * denominator;
    if lhs < rhs {
        return Err(AmmError::InvariantViolation);
    }
    Ok(())
}
