//! The fungible-asset ledger capability a pair consumes.
//!
//! A pair never stores asset balances itself.  It reads what it holds from
//! the ledger and pushes assets out through it, so every amount it acts on
//! is observed rather than declared by a caller.

use alloy_primitives::Address;

use crate::domain::Amount;
use crate::error::AmmError;

/// Balance storage and transfers for any number of fungible assets.
///
/// Each asset is identified by its address; `holder` is any account,
/// including a pair's own address.
///
/// # Errors
///
/// Implementations surface failures as [`AmmError`]:
///
/// - [`AmmError::InsufficientBalance`]: `from` holds less than `amount`.
/// - [`AmmError::Overflow`]: the recipient balance would overflow.
pub trait AssetLedger {
    /// Returns `holder`'s balance of `asset`; unknown holders hold zero.
    fn balance_of(&self, asset: Address, holder: Address) -> Result<Amount, AmmError>;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// A failed transfer must leave balances untouched.
    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;
}
