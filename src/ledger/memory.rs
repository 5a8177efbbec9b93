//! In-memory multi-asset ledger.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::domain::Amount;
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::AssetLedger;

/// One asset movement recorded by [`MemoryLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    /// Asset moved.
    pub asset: Address,
    /// Sender; `Address::ZERO` for issuance.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Amount moved.
    pub amount: Amount,
}

/// A ledger holding balances for any number of assets in memory.
///
/// Every transfer is appended to a log so callers can observe exactly what
/// moved.  The ledger is cheap to snapshot, which is how
/// [`PairRegistry::atomically`](crate::factory::PairRegistry::atomically)
/// discards the asset movements of a failed call.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use pivot_amm::domain::Amount;
/// use pivot_amm::ledger::MemoryLedger;
/// use pivot_amm::traits::AssetLedger;
///
/// let usd = Address::repeat_byte(0xaa);
/// let alice = Address::repeat_byte(0x01);
/// let bob = Address::repeat_byte(0x02);
///
/// let mut ledger = MemoryLedger::new();
/// ledger.issue(usd, alice, Amount::new(100)).expect("issued");
/// ledger.transfer(usd, alice, bob, Amount::new(40)).expect("funded");
/// assert_eq!(ledger.balance_of(usd, bob), Ok(Amount::new(40)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: HashMap<(Address, Address), Amount>,
    transfers: Vec<TransferRecord>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `amount` of `asset` out of thin air for `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the holder's balance overflows.
    pub fn issue(&mut self, asset: Address, holder: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self.balance(asset, holder);
        self.balances
            .insert((asset, holder), balance.safe_add(&amount)?);
        self.transfers.push(TransferRecord {
            asset,
            from: Address::ZERO,
            to: holder,
            amount,
        });
        Ok(())
    }

    /// Returns every transfer recorded so far, oldest first.
    #[must_use]
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Drains the transfer log.
    pub fn take_transfers(&mut self) -> Vec<TransferRecord> {
        std::mem::take(&mut self.transfers)
    }

    fn balance(&self, asset: Address, holder: Address) -> Amount {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or_default()
    }
}

impl AssetLedger for MemoryLedger {
    fn balance_of(&self, asset: Address, holder: Address) -> Result<Amount, AmmError> {
        Ok(self.balance(asset, holder))
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let from_balance = self
            .balance(asset, from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.balances.insert((asset, from), from_balance);
        // read after the debit so self-transfers net out
        let to_balance = self.balance(asset, to).safe_add(&amount)?;
        self.balances.insert((asset, to), to_balance);

        tracing::trace!(%asset, %from, %to, %amount, "transfer");
        self.transfers.push(TransferRecord {
            asset,
            from,
            to,
            amount,
        });
        Ok(())
    }
}
