//! Optional flash-swap callback invoked between output and input.
//!
//! A swap transfers its outputs first, then calls the supplied
//! [`SwapCallee`], then measures what came in.  The callee may use the
//! outputs it just received and pay the input from inside the callback.
//! The pair stays locked for the whole call, so any attempt by the callee
//! to `mint`, `burn`, `swap`, `skim` or `sync` the same pair fails with
//! [`AmmError::Locked`]; read-only accessors remain available.

use alloy_primitives::Address;

use super::AssetLedger;
use crate::domain::Amount;
use crate::error::AmmError;

/// Capability a swap recipient may implement to run code mid-swap.
pub trait SwapCallee<L: AssetLedger + ?Sized> {
    /// Called once per swap, after outputs were transferred to the
    /// recipient.  Returning `Err` aborts the swap with that error.
    fn on_swap(
        &mut self,
        ledger: &mut L,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError>;
}

impl<L, F> SwapCallee<L> for F
where
    L: AssetLedger + ?Sized,
    F: FnMut(&mut L, Address, Amount, Amount, &[u8]) -> Result<(), AmmError>,
{
    fn on_swap(
        &mut self,
        ledger: &mut L,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError> {
        self(ledger, sender, amount0_out, amount1_out, data)
    }
}
