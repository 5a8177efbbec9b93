//! Property-based tests for pair invariants.
//!
//! 1. **Product monotonicity**: `reserve0 × reserve1` never decreases across
//!    a random sequence of swaps.
//! 2. **Quote exactness**: the quoted output settles, one unit more is
//!    rejected by the invariant.
//! 3. **Liquidity round trip**: minting then burning never returns more
//!    than was deposited; on a fresh pair the shortfall is exactly the
//!    share backing the locked minimum.
//! 4. **Scarcer-side crediting**: an unbalanced deposit earns exactly the
//!    smaller of the two proportional shares.
//! 5. **Guard threshold**: a swap is rejected for size iff its pivot-side
//!    amount is below the minimum.

#![allow(clippy::panic)]

use alloy_primitives::{Address, U256};
use proptest::prelude::*;

use super::{atomically, MinimumSizeGuard, Pair, SwapRequest, MINIMUM_LIQUIDITY};
use crate::domain::{Amount, AssetPair, Liquidity, PivotAsset};
use crate::error::AmmError;
use crate::ledger::MemoryLedger;
use crate::math::get_amount_out;
use crate::traits::AssetLedger;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn token0() -> Address {
    Address::repeat_byte(0x11)
}

fn token1() -> Address {
    Address::repeat_byte(0xee)
}

fn lp() -> Address {
    Address::repeat_byte(0x01)
}

fn trader() -> Address {
    Address::repeat_byte(0x02)
}

fn token(index: u8) -> Address {
    if index == 0 {
        token0()
    } else {
        token1()
    }
}

fn empty_pair(min_trade_size: u128) -> Pair {
    let Ok(assets) = AssetPair::new(token0(), token1()) else {
        panic!("valid assets");
    };
    Pair::new(
        Address::repeat_byte(0xab),
        Address::repeat_byte(0xfa),
        assets,
        MinimumSizeGuard::new(PivotAsset::Token0, Amount::new(min_trade_size)),
    )
}

fn seeded(min_trade_size: u128, r0: u128, r1: u128) -> (Pair, MemoryLedger) {
    let pair = empty_pair(min_trade_size);
    let mut ledger = MemoryLedger::new();
    let Ok(()) = ledger.issue(token0(), pair.address(), Amount::new(r0)) else {
        panic!("issue");
    };
    let Ok(()) = ledger.issue(token1(), pair.address(), Amount::new(r1)) else {
        panic!("issue");
    };
    let Ok(_) = pair.mint(&mut ledger, lp(), lp()) else {
        panic!("seed mint");
    };
    (pair, ledger)
}

/// Pays `amount_in` of asset `index_in` and requests `amount_out` of the other.
fn pay_and_swap(
    pair: &Pair,
    ledger: &mut MemoryLedger,
    index_in: u8,
    amount_in: u128,
    amount_out: Amount,
) -> Result<(), AmmError> {
    let address = pair.address();
    atomically([pair], ledger, |l| {
        l.issue(token(index_in), address, Amount::new(amount_in))?;
        let request = if index_in == 0 {
            SwapRequest::new(Amount::ZERO, amount_out, trader())
        } else {
            SwapRequest::new(amount_out, Amount::ZERO, trader())
        };
        pair.swap(l, trader(), request, None).map(|_| ())
    })
}

fn quote_for(pair: &Pair, index_in: u8, amount_in: u128) -> Option<Amount> {
    let (r0, r1) = pair.reserves();
    let (reserve_in, reserve_out) = if index_in == 0 { (r0, r1) } else { (r1, r0) };
    get_amount_out(Amount::new(amount_in), reserve_in, reserve_out).ok()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// First deposits in [1e6, 1e12]: every payout of a full burn stays non-zero.
fn deposit_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000u128
}

/// Reserves in [1e6, 1e24], far above the locked minimum.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000_000_000_000_000u128
}

/// A swap step: input side and input size in thousandths of its reserve.
fn step_strategy() -> impl Strategy<Value = (u8, u128)> {
    (0u8..=1u8, 1u128..=500u128)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_product_never_decreases(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..12),
    ) {
        let (pair, mut ledger) = seeded(0, r0, r1);
        let mut previous = pair.reserve_state().product();
        for (index_in, permille) in steps {
            let (r0, r1) = pair.reserves();
            let reserve_in = if index_in == 0 { r0 } else { r1 };
            let amount_in = (reserve_in.get() / 1_000 * permille).max(1);
            let Some(out) = quote_for(&pair, index_in, amount_in) else {
                continue;
            };
            if out.is_zero() {
                continue;
            }
            prop_assert_eq!(pay_and_swap(&pair, &mut ledger, index_in, amount_in, out), Ok(()));
            let current = pair.reserve_state().product();
            prop_assert!(current >= previous, "k decreased: {} < {}", current, previous);
            previous = current;
        }
    }

    #[test]
    fn prop_quote_is_exact(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        permille in 1u128..=200u128,
    ) {
        let (pair, mut ledger) = seeded(0, r0, r1);
        let amount_in = (r0 / 1_000 * permille).max(1);
        let Some(out) = quote_for(&pair, 0, amount_in) else {
            return Ok(());
        };
        let Some(greedy) = out.checked_add(&Amount::new(1)) else {
            return Ok(());
        };
        if greedy.get() >= r1 {
            return Ok(());
        }

        prop_assert_eq!(
            pay_and_swap(&pair, &mut ledger, 0, amount_in, greedy),
            Err(AmmError::InvariantViolation)
        );
        prop_assert_eq!(pair.reserves(), (Amount::new(r0), Amount::new(r1)));
        if !out.is_zero() {
            prop_assert_eq!(pay_and_swap(&pair, &mut ledger, 0, amount_in, out), Ok(()));
        }
    }

    #[test]
    fn prop_mint_burn_round_trip_loses_nothing_to_lp(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        permille in 1u128..=1_000u128,
    ) {
        let (pair, mut ledger) = seeded(0, r0, r1);
        let deposit0 = (r0 / 1_000 * permille).max(1);
        let deposit1 = (r1 / 1_000 * permille).max(1);
        let depositor = trader();

        let minted = atomically([&pair], &mut ledger, |l| {
            l.issue(token0(), pair.address(), Amount::new(deposit0))?;
            l.issue(token1(), pair.address(), Amount::new(deposit1))?;
            pair.mint(l, depositor, depositor)
        });
        let Ok(minted) = minted else {
            return Ok(());
        };
        prop_assert_eq!(pair.transfer_liquidity(depositor, pair.address(), minted), Ok(()));
        let Ok((paid0, paid1)) = pair.burn(&mut ledger, depositor, depositor) else {
            return Ok(());
        };
        prop_assert!(paid0.get() <= deposit0);
        prop_assert!(paid1.get() <= deposit1);
        prop_assert_eq!(ledger.balance_of(token0(), depositor), Ok(paid0));
    }

    #[test]
    fn prop_first_mint_burn_leaves_locked_share(
        x in deposit_strategy(),
        y in deposit_strategy(),
    ) {
        let pair = empty_pair(0);
        let mut ledger = MemoryLedger::new();
        let Ok(()) = ledger.issue(token0(), pair.address(), Amount::new(x)) else {
            panic!("issue");
        };
        let Ok(()) = ledger.issue(token1(), pair.address(), Amount::new(y)) else {
            panic!("issue");
        };
        let Ok(minted) = pair.mint(&mut ledger, lp(), lp()) else {
            panic!("first mint");
        };
        let supply = pair.total_supply().get();
        prop_assert_eq!(supply - minted.get(), MINIMUM_LIQUIDITY.get());

        prop_assert_eq!(pair.transfer_liquidity(lp(), pair.address(), minted), Ok(()));
        let Ok((paid0, paid1)) = pair.burn(&mut ledger, lp(), lp()) else {
            panic!("full burn");
        };
        prop_assert!(paid0.get() < x);
        prop_assert!(paid1.get() < y);

        // what stays behind is ceil(MINIMUM_LIQUIDITY × deposit / supply)
        let locked_share = |deposit: u128| (MINIMUM_LIQUIDITY.get() * deposit).div_ceil(supply);
        prop_assert_eq!(x - paid0.get(), locked_share(x));
        prop_assert_eq!(y - paid1.get(), locked_share(y));
        prop_assert_eq!(
            pair.reserves(),
            (Amount::new(locked_share(x)), Amount::new(locked_share(y)))
        );
        prop_assert_eq!(pair.total_supply(), MINIMUM_LIQUIDITY);
    }

    #[test]
    fn prop_unbalanced_mint_credits_scarcer_side(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        permille0 in 1u128..=1_000u128,
        permille1 in 1u128..=1_000u128,
    ) {
        let (pair, mut ledger) = seeded(0, r0, r1);
        let supply = pair.total_supply().get();
        let deposit0 = r0 / 1_000 * permille0;
        let deposit1 = r1 / 1_000 * permille1;
        let share0 = U256::from(deposit0) * U256::from(supply) / U256::from(r0);
        let share1 = U256::from(deposit1) * U256::from(supply) / U256::from(r1);
        let expected = share0.min(share1);

        let minted = atomically([&pair], &mut ledger, |l| {
            l.issue(token0(), pair.address(), Amount::new(deposit0))?;
            l.issue(token1(), pair.address(), Amount::new(deposit1))?;
            pair.mint(l, trader(), trader())
        });
        if expected.is_zero() {
            prop_assert_eq!(minted, Err(AmmError::InsufficientLiquidityMinted));
        } else {
            let Ok(expected) = u128::try_from(expected) else {
                return Ok(());
            };
            prop_assert_eq!(minted, Ok(Liquidity::new(expected)));
        }
    }

    #[test]
    fn prop_guard_threshold(
        min_trade_size in 1u128..=100_000u128,
        amount_in in 1u128..=200_000u128,
    ) {
        let reserve = 1_000_000_000_000u128;
        let (pair, mut ledger) = seeded(min_trade_size, reserve, reserve);
        let Some(out) = quote_for(&pair, 0, amount_in) else {
            return Ok(());
        };
        if out.is_zero() {
            return Ok(());
        }
        let result = pay_and_swap(&pair, &mut ledger, 0, amount_in, out);
        // token0 is the pivot and only flows in
        let pivot_amount = amount_in;
        if pivot_amount < min_trade_size {
            prop_assert_eq!(
                result,
                Err(AmmError::UnderMinimumTradeSize { pivot_amount, min_trade_size })
            );
        } else {
            prop_assert_eq!(result, Ok(()));
        }
    }
}
