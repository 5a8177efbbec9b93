//! Minimum trade size on the pivot side of a swap.

use super::SwapFlows;
use crate::domain::{Amount, PivotAsset};
use crate::error::AmmError;

/// Rejects swaps that move too little of the pivot asset.
///
/// The pivot-side amount is the larger of what came in and what went out
/// on the pivot asset, so the threshold applies whether the trader sells
/// or buys the pivot.  A threshold of zero disables the guard.
///
/// # Examples
///
/// ```
/// use pivot_amm::domain::{Amount, PivotAsset};
/// use pivot_amm::pair::{MinimumSizeGuard, SwapFlows};
///
/// let guard = MinimumSizeGuard::new(PivotAsset::Token1, Amount::new(1_000));
/// let flows = SwapFlows {
///     amount1_in: Amount::new(1_000),
///     amount0_out: Amount::new(6_978),
///     ..SwapFlows::default()
/// };
/// assert!(guard.check(&flows).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumSizeGuard {
    pivot: PivotAsset,
    min_trade_size: Amount,
}

impl MinimumSizeGuard {
    /// Creates a guard on `pivot` with the given threshold.
    #[must_use]
    pub const fn new(pivot: PivotAsset, min_trade_size: Amount) -> Self {
        Self {
            pivot,
            min_trade_size,
        }
    }

    /// Returns the guarded asset.
    #[must_use]
    pub const fn pivot(&self) -> PivotAsset {
        self.pivot
    }

    /// Returns the threshold.
    #[must_use]
    pub const fn min_trade_size(&self) -> Amount {
        self.min_trade_size
    }

    /// Returns `false` when the threshold is zero.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.min_trade_size.is_zero()
    }

    /// `max(amount_in, amount_out)` on the pivot asset.
    #[must_use]
    pub fn pivot_amount(&self, flows: &SwapFlows) -> Amount {
        let (amount_in, amount_out) = flows.side(self.pivot.index());
        amount_in.max(amount_out)
    }

    /// Checks a swap's flows against the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnderMinimumTradeSize`] if the guard is enabled
    /// and the pivot-side amount is below the threshold.
    pub fn check(&self, flows: &SwapFlows) -> Result<(), AmmError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let pivot_amount = self.pivot_amount(flows);
        if pivot_amount < self.min_trade_size {
            return Err(AmmError::UnderMinimumTradeSize {
                pivot_amount: pivot_amount.get(),
                min_trade_size: self.min_trade_size.get(),
            });
        }
        Ok(())
    }
}
