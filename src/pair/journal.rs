//! Staged pair updates and the undo log behind
//! [`PairRegistry::atomically`](crate::factory::PairRegistry::atomically).
//!
//! A call mutates pair state in place through a [`PairUpdate`], which
//! remembers only the values it overwrote: the reserves, the supply,
//! `k_last` and the balances of the holders it touched.  A failed call is
//! reverted from that record.  While a transaction is open the record of
//! each successful call is kept in the pair's [`Journal`], so the whole
//! transaction can be unwound later.

use alloy_primitives::{Address, U256};

use super::{LiquidityAccount, PairState, ReserveState};
use crate::domain::{Amount, Liquidity, PairEvent};
use crate::error::AmmError;

/// Values one successful call overwrote.
#[derive(Debug, Clone)]
pub(super) struct Undo {
    reserves: ReserveState,
    k_last: Option<U256>,
    total_supply: Liquidity,
    /// First-touch holdings, `None` for holders that had no entry.
    holdings: Vec<(Address, Option<Liquidity>)>,
    /// Event log length before the call.
    events: usize,
}

impl Undo {
    pub(super) const fn events(&self) -> usize {
        self.events
    }

    pub(super) fn apply(self, state: &mut PairState) {
        state.reserves = self.reserves;
        state.k_last = self.k_last;
        state.liquidity.rewind(self.total_supply, self.holdings);
    }
}

/// Open transactions on one pair and the undo records they collected.
#[derive(Debug, Default)]
pub(super) struct Journal {
    depth: usize,
    entries: Vec<Undo>,
}

impl Journal {
    /// Opens a transaction and returns its mark.
    pub(super) fn begin(&mut self) -> usize {
        self.depth += 1;
        self.entries.len()
    }

    pub(super) fn record(&mut self, undo: Undo) {
        if self.depth > 0 {
            self.entries.push(undo);
        }
    }

    /// Closes the innermost transaction, keeping its effects.
    pub(super) fn release(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Closes the innermost transaction and returns the records made since
    /// `mark`, oldest first.
    pub(super) fn unwind(&mut self, mark: usize) -> Vec<Undo> {
        self.depth = self.depth.saturating_sub(1);
        let mark = mark.min(self.entries.len());
        self.entries.split_off(mark)
    }
}

/// In-place changes to a pair's state for the duration of one call.
pub(super) struct PairUpdate<'s> {
    state: &'s mut PairState,
    undo: Undo,
    events: Vec<PairEvent>,
}

impl<'s> PairUpdate<'s> {
    pub(super) fn new(state: &'s mut PairState, events: usize) -> Self {
        let undo = Undo {
            reserves: state.reserves,
            k_last: state.k_last,
            total_supply: state.liquidity.total_supply(),
            holdings: Vec::new(),
            events,
        };
        Self {
            state,
            undo,
            events: Vec::new(),
        }
    }

    pub(super) fn reserves(&self) -> &ReserveState {
        &self.state.reserves
    }

    pub(super) fn liquidity(&self) -> &LiquidityAccount {
        &self.state.liquidity
    }

    pub(super) fn emit(&mut self, event: PairEvent) {
        self.events.push(event);
    }

    pub(super) fn mint_liquidity(&mut self, to: Address, value: Liquidity) -> Result<(), AmmError> {
        self.touch(to);
        self.state.liquidity.mint(to, value)?;
        self.emit(PairEvent::Transfer {
            from: Address::ZERO,
            to,
            value,
        });
        Ok(())
    }

    pub(super) fn burn_liquidity(
        &mut self,
        from: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        self.touch(from);
        self.state.liquidity.burn(from, value)?;
        self.emit(PairEvent::Transfer {
            from,
            to: Address::ZERO,
            value,
        });
        Ok(())
    }

    pub(super) fn transfer_liquidity(
        &mut self,
        from: Address,
        to: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        self.touch(from);
        self.touch(to);
        self.state.liquidity.transfer(from, to, value)?;
        self.emit(PairEvent::Transfer { from, to, value });
        Ok(())
    }

    pub(super) fn update_reserves(
        &mut self,
        balance0: Amount,
        balance1: Amount,
    ) -> Result<(), AmmError> {
        self.state.reserves = ReserveState::synced(balance0, balance1)?;
        self.emit(PairEvent::Sync {
            reserve0: balance0,
            reserve1: balance1,
        });
        Ok(())
    }

    pub(super) fn record_k_last(&mut self) {
        self.state.k_last = Some(self.state.reserves.product());
    }

    /// Keeps the changes; returns their undo record and the new events.
    pub(super) fn finish(self) -> (Undo, Vec<PairEvent>) {
        (self.undo, self.events)
    }

    /// Discards the changes.
    pub(super) fn revert(self) {
        self.undo.apply(self.state);
    }

    fn touch(&mut self, holder: Address) {
        if self.undo.holdings.iter().all(|(seen, _)| *seen != holder) {
            let holding = self.state.liquidity.holding(&holder);
            self.undo.holdings.push((holder, holding));
        }
    }
}
