//! Last-synchronized reserve bookkeeping.

use alloy_primitives::U256;

use crate::domain::Amount;
use crate::error::AmmError;

/// Largest reserve a pair will record: `2^112 − 1`.
///
/// Keeps `reserve0 × reserve1 × 1000²` comfortably inside 256 bits.
pub const MAX_RESERVE: Amount = Amount::new((1u128 << 112) - 1);

/// The pair's belief about its own ledger balances as of the last sync.
///
/// Reserves never exceed the pair's actual balances once a call commits;
/// a balance above the reserve is an unsettled deposit (or donation) that
/// the next `mint`, `swap`, `sync` or `skim` accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReserveState {
    reserve0: Amount,
    reserve1: Amount,
}

impl ReserveState {
    /// Builds the state a sync against `balance0`/`balance1` would record.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if either balance exceeds
    /// [`MAX_RESERVE`].
    pub fn synced(balance0: Amount, balance1: Amount) -> Result<Self, AmmError> {
        if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
            return Err(AmmError::Overflow("balance exceeds 112-bit reserve"));
        }
        Ok(Self {
            reserve0: balance0,
            reserve1: balance1,
        })
    }

    /// Returns the `token0` reserve.
    #[must_use]
    pub const fn reserve0(&self) -> Amount {
        self.reserve0
    }

    /// Returns the `token1` reserve.
    #[must_use]
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }

    /// Returns `(reserve0, reserve1)`.
    #[must_use]
    pub const fn get(&self) -> (Amount, Amount) {
        (self.reserve0, self.reserve1)
    }

    /// Returns `true` if neither asset has a reserve.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reserve0.is_zero() && self.reserve1.is_zero()
    }

    /// `reserve0 × reserve1` in 256 bits; cannot overflow given [`MAX_RESERVE`].
    #[must_use]
    pub fn product(&self) -> U256 {
        self.reserve0.to_u256() * self.reserve1.to_u256()
    }

    /// Returns how far each balance sits above its reserve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if a balance is below its reserve,
    /// which means the ledger took assets from the pair behind its back.
    pub fn excess(&self, balance0: Amount, balance1: Amount) -> Result<(Amount, Amount), AmmError> {
        let excess0 = balance0
            .checked_sub(&self.reserve0)
            .ok_or(AmmError::Underflow("token0 balance below reserve"))?;
        let excess1 = balance1
            .checked_sub(&self.reserve1)
            .ok_or(AmmError::Underflow("token1 balance below reserve"))?;
        Ok((excess0, excess1))
    }
}
