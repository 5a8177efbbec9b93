//! Constant-product pair with a pivot-asset minimum trade size.
//!
//! A [`Pair`] holds reserves of two assets (sorted as `token0 < token1`)
//! and issues fungible liquidity claims against them.  Assets live in an
//! external [`AssetLedger`]; the pair only ever reads its own balances and
//! transfers out of its own account.
//!
//! # Settlement Model
//!
//! Callers deposit into the pair's ledger account first, then invoke the
//! entry point that accounts for the deposit:
//!
//! | Entry point | Accounts for | Pays out |
//! |---|---|---|
//! | [`Pair::mint`] | both-sided deposit | liquidity claims |
//! | [`Pair::burn`] | claims sent to the pair | both assets, pro rata |
//! | [`Pair::swap`] | one- or two-sided input | requested outputs |
//! | [`Pair::skim`] | nothing | balance above reserves |
//! | [`Pair::sync`] | balance above reserves | nothing |
//!
//! # Swap Invariant
//!
//! After every swap the fee-adjusted product of balances is at least the
//! product of the pre-swap reserves (0.3% fee on inputs, see
//! [`check_invariant`]).  On top of that, the larger of input and output
//! on the pivot asset must reach the pair's minimum trade size.
//!
//! # Atomicity
//!
//! Every entry point holds a non-reentrant lock for its whole duration and
//! reverts its own state changes if any check fails, so a failed call
//! leaves the pair exactly as it was.  Ledger transfers made before the
//! failure, and changes a callee made to other pairs, are undone by
//! [`PairRegistry::atomically`](crate::factory::PairRegistry::atomically),
//! which rolls back the ledger and every pair of the registry together.

mod guard;
mod journal;
mod liquidity;
mod lock;
mod reserves;
mod swap;

#[cfg(test)]
mod proptest_properties;

use core::cell::RefCell;

use alloy_primitives::{Address, U256};
use tracing::{debug, instrument};

pub use guard::MinimumSizeGuard;
pub use liquidity::{
    amounts_for_burn, liquidity_to_mint, LiquidityAccount, LOCKED_LIQUIDITY_HOLDER,
    MINIMUM_LIQUIDITY,
};
use journal::{Journal, PairUpdate};
use lock::ReentrancyLock;
pub use reserves::{ReserveState, MAX_RESERVE};
use swap::validate_request;
pub use swap::{check_invariant, observed_inputs, SwapFlows, SwapRequest};

use crate::domain::{Amount, AssetPair, Liquidity, PairEvent, PivotAsset};
use crate::error::AmmError;
use crate::traits::{AssetLedger, SwapCallee};

#[derive(Debug, Clone, Default)]
struct PairState {
    reserves: ReserveState,
    liquidity: LiquidityAccount,
    k_last: Option<U256>,
}

/// A two-asset constant-product pool guarded by a minimum trade size.
///
/// Pairs are created by [`PairRegistry`](crate::factory::PairRegistry) and
/// operated through `&self`: the lock and state use interior mutability so
/// that a [`SwapCallee`] holding a reference to the pair can still read it,
/// while any attempt to re-enter a mutating entry point fails with
/// [`AmmError::Locked`].
///
/// # Example
///
/// ```rust
/// use alloy_primitives::Address;
/// use pivot_amm::domain::{Amount, PivotSelector};
/// use pivot_amm::factory::PairRegistry;
/// use pivot_amm::ledger::MemoryLedger;
/// use pivot_amm::pair::SwapRequest;
/// use pivot_amm::traits::AssetLedger;
///
/// let usd = Address::repeat_byte(0xee);
/// let wise = Address::repeat_byte(0x11);
/// let alice = Address::repeat_byte(0x01);
///
/// let mut registry = PairRegistry::new(Address::repeat_byte(0xfa));
/// let address = registry
///     .create_pair(usd, wise, Amount::new(1_000), PivotSelector::AssetA)
///     .expect("pair created");
/// let pair = registry.pair(address).expect("registered");
///
/// let mut ledger = MemoryLedger::new();
/// ledger.issue(usd, address, Amount::new(1_000_000)).expect("funded");
/// ledger.issue(wise, address, Amount::new(7_000_000)).expect("funded");
/// pair.mint(&mut ledger, alice, alice).expect("minted");
///
/// // sell 10 000 USD (token1) for WISE (token0)
/// ledger.issue(usd, address, Amount::new(10_000)).expect("paid");
/// let out = pivot_amm::math::get_amount_out(
///     Amount::new(10_000),
///     Amount::new(1_000_000),
///     Amount::new(7_000_000),
/// )
/// .expect("quoted");
/// pair.swap(&mut ledger, alice, SwapRequest::new(out, Amount::ZERO, alice), None)
///     .expect("swapped");
/// assert_eq!(ledger.balance_of(wise, alice), Ok(out));
/// ```
#[derive(Debug)]
pub struct Pair {
    address: Address,
    registry: Address,
    assets: AssetPair,
    guard: MinimumSizeGuard,
    lock: ReentrancyLock,
    state: RefCell<PairState>,
    events: RefCell<Vec<PairEvent>>,
    journal: RefCell<Journal>,
}

impl Pair {
    pub(crate) fn new(
        address: Address,
        registry: Address,
        assets: AssetPair,
        guard: MinimumSizeGuard,
    ) -> Self {
        Self {
            address,
            registry,
            assets,
            guard,
            lock: ReentrancyLock::default(),
            state: RefCell::new(PairState::default()),
            events: RefCell::new(Vec::new()),
            journal: RefCell::new(Journal::default()),
        }
    }

    // -- identity --------------------------------------------------------

    /// Returns the pair's own ledger account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the registry that created the pair.
    #[must_use]
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Returns the sorted asset pair.
    #[must_use]
    pub const fn assets(&self) -> &AssetPair {
        &self.assets
    }

    /// Returns the lower-addressed asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.assets.token0()
    }

    /// Returns the higher-addressed asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.assets.token1()
    }

    /// Returns which sorted asset is the pivot.
    #[must_use]
    pub const fn pivot(&self) -> PivotAsset {
        self.guard.pivot()
    }

    /// Returns the pivot asset's address.
    #[must_use]
    pub const fn pivot_asset(&self) -> Address {
        self.guard.pivot().asset(&self.assets)
    }

    /// Returns the minimum pivot-side amount per swap; zero means unguarded.
    #[must_use]
    pub const fn min_trade_size(&self) -> Amount {
        self.guard.min_trade_size()
    }

    // -- state -----------------------------------------------------------

    /// Returns `(reserve0, reserve1)` as of the last sync.
    #[must_use]
    pub fn reserves(&self) -> (Amount, Amount) {
        self.state.borrow().reserves.get()
    }

    /// Returns the full reserve state.
    #[must_use]
    pub fn reserve_state(&self) -> ReserveState {
        self.state.borrow().reserves
    }

    /// Returns the total liquidity claims outstanding.
    #[must_use]
    pub fn total_supply(&self) -> Liquidity {
        self.state.borrow().liquidity.total_supply()
    }

    /// Returns the claims held by `holder`.
    #[must_use]
    pub fn liquidity_of(&self, holder: Address) -> Liquidity {
        self.state.borrow().liquidity.balance_of(&holder)
    }

    /// `reserve0 × reserve1` recorded after the latest mint or burn.
    #[must_use]
    pub fn k_last(&self) -> Option<U256> {
        self.state.borrow().k_last
    }

    /// Returns `true` while an entry point is executing.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Returns a copy of the event log, oldest first.
    ///
    /// The log keeps growing until drained with [`Pair::take_events`].
    #[must_use]
    pub fn events(&self) -> Vec<PairEvent> {
        self.events.borrow().clone()
    }

    /// Drains the event log.
    ///
    /// Events drained inside [`PairRegistry::atomically`](crate::factory::PairRegistry::atomically)
    /// stay drained if the transaction rolls back.
    pub fn take_events(&self) -> Vec<PairEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    // -- liquidity claims --------------------------------------------------

    /// Moves liquidity claims between holders.
    ///
    /// Sending claims to [`Pair::address`] is how a holder prepares a
    /// [`Pair::burn`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `value`.
    /// - [`AmmError::ZeroAddress`] if `from` is the locked-claims holder.
    pub fn transfer_liquidity(
        &self,
        from: Address,
        to: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        self.commit(|update| update.transfer_liquidity(from, to, value))
    }

    // -- entry points ------------------------------------------------------

    /// Issues liquidity claims to `to` for the assets deposited since the
    /// last sync.
    ///
    /// The first mint also locks [`MINIMUM_LIQUIDITY`] at
    /// [`LOCKED_LIQUIDITY_HOLDER`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if the deposit earns no claims.
    /// - [`AmmError::Locked`] if called from inside another entry point.
    /// - [`AmmError::Overflow`] if a balance exceeds [`MAX_RESERVE`].
    #[instrument(level = "debug", skip_all, fields(pair = %self.address))]
    pub fn mint<L: AssetLedger + ?Sized>(
        &self,
        ledger: &mut L,
        sender: Address,
        to: Address,
    ) -> Result<Liquidity, AmmError> {
        let _guard = self.lock.acquire()?;
        let (balance0, balance1) = self.balances(ledger)?;

        let (liquidity, amount0, amount1) = self.commit(|update| {
            let (amount0, amount1) = update.reserves().excess(balance0, balance1)?;
            let total_supply = update.liquidity().total_supply();
            let liquidity = liquidity_to_mint(amount0, amount1, update.reserves(), total_supply)?;
            if total_supply.is_zero() {
                update.mint_liquidity(LOCKED_LIQUIDITY_HOLDER, MINIMUM_LIQUIDITY)?;
            }
            update.mint_liquidity(to, liquidity)?;
            update.update_reserves(balance0, balance1)?;
            update.record_k_last();
            update.emit(PairEvent::Mint {
                sender,
                amount0,
                amount1,
            });
            Ok((liquidity, amount0, amount1))
        })?;

        debug!(%to, %amount0, %amount1, %liquidity, "minted");
        Ok(liquidity)
    }

    /// Burns every claim the pair holds on itself and pays both assets to
    /// `to`, pro rata to the reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout is zero.
    /// - [`AmmError::Locked`] if called from inside another entry point.
    /// - Any error from the ledger's transfers.
    #[instrument(level = "debug", skip_all, fields(pair = %self.address))]
    pub fn burn<L: AssetLedger + ?Sized>(
        &self,
        ledger: &mut L,
        sender: Address,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let _guard = self.lock.acquire()?;
        let (reserves, liquidity, total_supply) = {
            let state = self.state.borrow();
            (
                state.reserves,
                state.liquidity.balance_of(&self.address),
                state.liquidity.total_supply(),
            )
        };
        let (amount0, amount1) = amounts_for_burn(liquidity, &reserves, total_supply)?;

        ledger.transfer(self.token0(), self.address, to, amount0)?;
        ledger.transfer(self.token1(), self.address, to, amount1)?;
        let (balance0, balance1) = self.balances(ledger)?;

        self.commit(|update| {
            update.burn_liquidity(self.address, liquidity)?;
            update.update_reserves(balance0, balance1)?;
            update.record_k_last();
            update.emit(PairEvent::Burn {
                sender,
                amount0,
                amount1,
                to,
            });
            Ok(())
        })?;

        debug!(%to, %amount0, %amount1, %liquidity, "burned");
        Ok((amount0, amount1))
    }

    /// Pays the requested outputs to `request.to`, optionally runs
    /// `callee`, then verifies the inputs that arrived.
    ///
    /// Checks run in this order, and the first failure is reported:
    ///
    /// 1. at least one output is non-zero ([`AmmError::InsufficientOutputAmount`])
    /// 2. each output is below its reserve ([`AmmError::InsufficientLiquidity`])
    /// 3. the recipient is not one of the assets ([`AmmError::InvalidRecipient`])
    /// 4. at least one input was observed ([`AmmError::InsufficientInputAmount`])
    /// 5. the pivot-side amount reaches the minimum ([`AmmError::UnderMinimumTradeSize`])
    /// 6. the fee-adjusted product did not decrease ([`AmmError::InvariantViolation`])
    ///
    /// # Errors
    ///
    /// Any of the above, [`AmmError::Locked`] on re-entry, or an error
    /// returned by the ledger or the callee.
    #[instrument(level = "debug", skip_all, fields(pair = %self.address))]
    pub fn swap<L: AssetLedger + ?Sized>(
        &self,
        ledger: &mut L,
        sender: Address,
        request: SwapRequest<'_>,
        callee: Option<&mut dyn SwapCallee<L>>,
    ) -> Result<SwapFlows, AmmError> {
        let _guard = self.lock.acquire()?;
        let flows = self
            .settle_swap(ledger, sender, request, callee)
            .inspect_err(|err| debug!(code = err.code(), %err, "swap rejected"))?;
        debug!(
            to = %request.to,
            amount0_in = %flows.amount0_in,
            amount1_in = %flows.amount1_in,
            amount0_out = %flows.amount0_out,
            amount1_out = %flows.amount1_out,
            "swapped"
        );
        Ok(flows)
    }

    fn settle_swap<L: AssetLedger + ?Sized>(
        &self,
        ledger: &mut L,
        sender: Address,
        request: SwapRequest<'_>,
        callee: Option<&mut dyn SwapCallee<L>>,
    ) -> Result<SwapFlows, AmmError> {
        let SwapRequest {
            amount0_out,
            amount1_out,
            to,
            data,
        } = request;
        let reserves = self.reserve_state();
        validate_request(amount0_out, amount1_out, &reserves)?;
        if self.assets.contains(&to) {
            return Err(AmmError::InvalidRecipient);
        }

        if !amount0_out.is_zero() {
            ledger.transfer(self.token0(), self.address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            ledger.transfer(self.token1(), self.address, to, amount1_out)?;
        }
        if let Some(callee) = callee {
            callee.on_swap(ledger, sender, amount0_out, amount1_out, data)?;
        }

        let (balance0, balance1) = self.balances(ledger)?;
        let (amount0_in, amount1_in) =
            observed_inputs(balance0, balance1, &reserves, amount0_out, amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        let flows = SwapFlows {
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
        };
        self.guard.check(&flows)?;
        check_invariant(balance0, balance1, &flows, &reserves)?;

        self.commit(|update| {
            update.update_reserves(balance0, balance1)?;
            update.emit(PairEvent::Swap {
                sender,
                amount0_in,
                amount1_in,
                amount0_out,
                amount1_out,
                to,
            });
            Ok(())
        })?;
        Ok(flows)
    }

    /// Sends any balance above the reserves to `to`, leaving reserves as
    /// they were.
    ///
    /// # Errors
    ///
    /// [`AmmError::Locked`] on re-entry, or any ledger error.
    #[instrument(level = "debug", skip_all, fields(pair = %self.address))]
    pub fn skim<L: AssetLedger + ?Sized>(
        &self,
        ledger: &mut L,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let _guard = self.lock.acquire()?;
        let reserves = self.reserve_state();
        let (balance0, balance1) = self.balances(ledger)?;
        let (excess0, excess1) = reserves.excess(balance0, balance1)?;
        if !excess0.is_zero() {
            ledger.transfer(self.token0(), self.address, to, excess0)?;
        }
        if !excess1.is_zero() {
            ledger.transfer(self.token1(), self.address, to, excess1)?;
        }
        debug!(%to, %excess0, %excess1, "skimmed");
        Ok((excess0, excess1))
    }

    /// Overwrites the reserves with the pair's current balances.
    ///
    /// This works on a pair with no liquidity supply too: a donation synced
    /// before the first mint becomes non-zero reserves while the supply
    /// stays zero.  The first mint then prices claims on its own deposit
    /// (the balance above those reserves), and the synced donation is
    /// shared by all claim holders.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Overflow`] if a balance exceeds [`MAX_RESERVE`].
    /// - [`AmmError::Locked`] on re-entry.
    #[instrument(level = "debug", skip_all, fields(pair = %self.address))]
    pub fn sync<L: AssetLedger + ?Sized>(&self, ledger: &mut L) -> Result<(), AmmError> {
        let _guard = self.lock.acquire()?;
        let (balance0, balance1) = self.balances(ledger)?;
        self.commit(|update| update.update_reserves(balance0, balance1))?;
        debug!(%balance0, %balance1, "synced");
        Ok(())
    }

    fn balances<L: AssetLedger + ?Sized>(&self, ledger: &L) -> Result<(Amount, Amount), AmmError> {
        Ok((
            ledger.balance_of(self.token0(), self.address)?,
            ledger.balance_of(self.token1(), self.address)?,
        ))
    }

    /// Runs `f` against the live state; its changes stay only on `Ok`,
    /// and its events are logged only then.
    fn commit<T>(
        &self,
        f: impl FnOnce(&mut PairUpdate<'_>) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let mut state = self.state.borrow_mut();
        let mut update = PairUpdate::new(&mut state, self.events.borrow().len());
        match f(&mut update) {
            Ok(value) => {
                let (undo, events) = update.finish();
                self.journal.borrow_mut().record(undo);
                self.events.borrow_mut().extend(events);
                Ok(value)
            }
            Err(err) => {
                update.revert();
                Err(err)
            }
        }
    }

    // -- transactions ------------------------------------------------------

    /// Opens a transaction; changes committed until it closes can be
    /// rolled back together.
    #[must_use]
    pub(crate) fn begin(&self) -> usize {
        self.journal.borrow_mut().begin()
    }

    /// Closes the innermost transaction, keeping its changes.
    pub(crate) fn release(&self) {
        self.journal.borrow_mut().release();
    }

    /// Closes the innermost transaction, undoing every change committed
    /// since `mark` and dropping the events they logged.
    pub(crate) fn rollback(&self, mark: usize) {
        let undone = self.journal.borrow_mut().unwind(mark);
        let mut state = self.state.borrow_mut();
        let mut events = self.events.borrow_mut();
        for undo in undone.into_iter().rev() {
            events.truncate(undo.events());
            undo.apply(&mut state);
        }
    }
}

/// Runs `f` as one transaction over `ledger` and `pairs`.
///
/// If `f` fails, the ledger and every listed pair are put back exactly as
/// they were before the call, whichever of them `f` touched.
pub(crate) fn atomically<'p, L, T>(
    pairs: impl IntoIterator<Item = &'p Pair>,
    ledger: &mut L,
    f: impl FnOnce(&mut L) -> Result<T, AmmError>,
) -> Result<T, AmmError>
where
    L: AssetLedger + Clone,
{
    let marks: Vec<(&Pair, usize)> = pairs.into_iter().map(|pair| (pair, pair.begin())).collect();
    let snapshot = ledger.clone();
    match f(ledger) {
        Ok(value) => {
            for (pair, _) in &marks {
                pair.release();
            }
            Ok(value)
        }
        Err(err) => {
            for (pair, mark) in marks {
                pair.rollback(mark);
            }
            *ledger = snapshot;
            debug!(code = err.code(), "transaction aborted; ledger and pairs reverted");
            Err(err)
        }
    }
}
