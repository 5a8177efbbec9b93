//! Liquidity-claim accounting and the mint/burn share formulas.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use super::ReserveState;
use crate::domain::{Amount, Liquidity};
use crate::error::AmmError;
use crate::math::{isqrt, mul_div, CheckedArithmetic};

/// Claims permanently locked by the first mint so the supply never
/// returns to zero.
pub const MINIMUM_LIQUIDITY: Liquidity = Liquidity::new(1_000);

/// Holder that receives [`MINIMUM_LIQUIDITY`]; nothing can move it out.
pub const LOCKED_LIQUIDITY_HOLDER: Address = Address::ZERO;

/// Fungible liquidity claims against one pair.
///
/// `total_supply` always equals the sum of all holder balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiquidityAccount {
    total_supply: Liquidity,
    balances: HashMap<Address, Liquidity>,
}

impl LiquidityAccount {
    /// Returns the total claims outstanding.
    #[must_use]
    pub const fn total_supply(&self) -> Liquidity {
        self.total_supply
    }

    /// Returns the claims held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> Liquidity {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    /// Raw entry for `holder`; `None` if it never held claims.
    pub(crate) fn holding(&self, holder: &Address) -> Option<Liquidity> {
        self.balances.get(holder).copied()
    }

    /// Restores the supply and the given holder entries verbatim.
    pub(crate) fn rewind(
        &mut self,
        total_supply: Liquidity,
        holdings: impl IntoIterator<Item = (Address, Option<Liquidity>)>,
    ) {
        self.total_supply = total_supply;
        for (holder, holding) in holdings {
            match holding {
                Some(balance) => self.balances.insert(holder, balance),
                None => self.balances.remove(&holder),
            };
        }
    }

    pub(crate) fn mint(&mut self, to: Address, value: Liquidity) -> Result<(), AmmError> {
        let supply = self.total_supply.safe_add(&value)?;
        let balance = self.balance_of(&to).safe_add(&value)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    pub(crate) fn burn(&mut self, from: Address, value: Liquidity) -> Result<(), AmmError> {
        let balance = self
            .balance_of(&from)
            .checked_sub(&value)
            .ok_or(AmmError::InsufficientBalance)?;
        let supply = self.total_supply.safe_sub(&value)?;
        self.total_supply = supply;
        self.balances.insert(from, balance);
        Ok(())
    }

    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        if from == LOCKED_LIQUIDITY_HOLDER {
            return Err(AmmError::ZeroAddress);
        }
        let from_balance = self
            .balance_of(&from)
            .checked_sub(&value)
            .ok_or(AmmError::InsufficientBalance)?;
        self.balances.insert(from, from_balance);
        let to_balance = self.balance_of(&to).safe_add(&value)?;
        self.balances.insert(to, to_balance);
        Ok(())
    }
}

/// Claims to issue for a deposit of `amount0`/`amount1`.
///
/// - Empty pair: `isqrt(amount0 × amount1) − MINIMUM_LIQUIDITY`.
/// - Otherwise: `min(amount0 × supply / reserve0, amount1 × supply / reserve1)`,
///   so only the scarcer side of an unbalanced deposit is credited.
///
/// # Errors
///
/// Returns [`AmmError::InsufficientLiquidityMinted`] if the result is zero
/// (including a first deposit whose root does not exceed
/// [`MINIMUM_LIQUIDITY`]).
pub fn liquidity_to_mint(
    amount0: Amount,
    amount1: Amount,
    reserves: &ReserveState,
    total_supply: Liquidity,
) -> Result<Liquidity, AmmError> {
    if total_supply.is_zero() {
        let root = isqrt(amount0.to_u256() * amount1.to_u256());
        let minimum = MINIMUM_LIQUIDITY.to_u256();
        if root <= minimum {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        return Liquidity::try_from_u256(root - minimum, "initial liquidity");
    }

    let supply = total_supply.to_u256();
    let share0 = mul_div(amount0.to_u256(), supply, reserves.reserve0().to_u256())?;
    let share1 = mul_div(amount1.to_u256(), supply, reserves.reserve1().to_u256())?;
    let liquidity = Liquidity::try_from_u256(share0.min(share1), "minted liquidity")?;
    if liquidity.is_zero() {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    Ok(liquidity)
}

/// Assets returned for burning `liquidity` claims, pro rata to reserves.
///
/// # Errors
///
/// Returns [`AmmError::InsufficientLiquidityBurned`] if the pair has no
/// supply or either payout rounds down to zero.
pub fn amounts_for_burn(
    liquidity: Liquidity,
    reserves: &ReserveState,
    total_supply: Liquidity,
) -> Result<(Amount, Amount), AmmError> {
    if total_supply.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    let share = |reserve: Amount| -> Result<Amount, AmmError> {
        let raw: U256 = mul_div(liquidity.to_u256(), reserve.to_u256(), total_supply.to_u256())?;
        Amount::try_from_u256(raw, "burn payout")
    };
    let amount0 = share(reserves.reserve0())?;
    let amount1 = share(reserves.reserve1())?;
    if amount0.is_zero() || amount1.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    Ok((amount0, amount1))
}
