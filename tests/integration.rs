//! Integration tests exercising the full system from registry to settlement.
//!
//! The fixture mirrors a USD-anchored deployment: USD/WISE, USD/DAI and
//! USD/ELON pairs, each created with USD as the pivot and a minimum trade
//! size of 1000 base units.

#![allow(clippy::panic)]

use alloy_primitives::Address;
use pivot_amm::config::RegistryConfig;
use pivot_amm::domain::{Amount, Liquidity, PairEvent, PivotSelector};
use pivot_amm::error::AmmError;
use pivot_amm::factory::PairRegistry;
use pivot_amm::ledger::{MemoryLedger, TransferRecord};
use pivot_amm::math::{get_amount_in, get_amount_out};
use pivot_amm::pair::{Pair, SwapFlows, SwapRequest, MINIMUM_LIQUIDITY};
use pivot_amm::traits::{AssetLedger, FromConfig, SwapCallee};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const E18: u128 = 1_000_000_000_000_000_000;

fn usd() -> Address {
    Address::repeat_byte(0xee)
}

fn wise() -> Address {
    Address::repeat_byte(0x11)
}

fn dai() -> Address {
    Address::repeat_byte(0x22)
}

fn elon() -> Address {
    Address::repeat_byte(0x33)
}

fn wallet() -> Address {
    Address::repeat_byte(0x01)
}

fn other() -> Address {
    Address::repeat_byte(0x02)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Fixture {
    registry: PairRegistry,
    ledger: MemoryLedger,
}

fn fixture() -> Fixture {
    init_tracing();
    let mut registry = PairRegistry::new(Address::repeat_byte(0xfa));
    for ancillary in [wise(), dai(), elon()] {
        let Ok(_) =
            registry.create_pair(usd(), ancillary, Amount::new(1_000), PivotSelector::AssetA)
        else {
            panic!("pair created");
        };
    }
    let mut ledger = MemoryLedger::new();
    for asset in [usd(), wise(), dai(), elon()] {
        let Ok(()) = ledger.issue(asset, wallet(), Amount::new(1_000 * E18)) else {
            panic!("wallet funded");
        };
    }
    Fixture { registry, ledger }
}

fn pair_of<'r>(registry: &'r PairRegistry, a: Address, b: Address) -> &'r Pair {
    let Some(address) = registry.get_pair(a, b) else {
        panic!("pair exists");
    };
    let Ok(pair) = registry.pair(address) else {
        panic!("pair registered");
    };
    pair
}

/// Deposits both assets from `provider` and mints to `provider`.
fn add_liquidity(
    registry: &PairRegistry,
    pair: &Pair,
    ledger: &mut MemoryLedger,
    provider: Address,
    amount0: u128,
    amount1: u128,
) -> Result<Liquidity, AmmError> {
    registry.atomically(ledger, |l| {
        l.transfer(pair.token0(), provider, pair.address(), Amount::new(amount0))?;
        l.transfer(pair.token1(), provider, pair.address(), Amount::new(amount1))?;
        pair.mint(l, provider, provider)
    })
}

/// Pays `amount_in` of `asset_in` from the wallet, then swaps to the wallet.
fn pay_and_swap(
    registry: &PairRegistry,
    pair: &Pair,
    ledger: &mut MemoryLedger,
    asset_in: Address,
    amount_in: u128,
    amount0_out: Amount,
    amount1_out: Amount,
) -> Result<SwapFlows, AmmError> {
    registry.atomically(ledger, |l| {
        l.transfer(asset_in, wallet(), pair.address(), Amount::new(amount_in))?;
        let request = SwapRequest::new(amount0_out, amount1_out, wallet());
        pair.swap(l, wallet(), request, None)
    })
}

/// USD/WISE seeded 1 USD : 7 WISE.
fn seeded_usd_wise() -> Fixture {
    let mut fx = fixture();
    let pair = pair_of(&fx.registry, usd(), wise());
    assert_eq!(pair.token1(), usd());
    let Ok(_) = add_liquidity(&fx.registry, pair, &mut fx.ledger, wallet(), 7 * E18, E18) else {
        panic!("seeded");
    };
    let _ = pair.take_events();
    let _ = fx.ledger.take_transfers();
    fx
}

fn quote(amount_in: u128, reserve_in: u128, reserve_out: u128) -> Amount {
    let Ok(out) = get_amount_out(
        Amount::new(amount_in),
        Amount::new(reserve_in),
        Amount::new(reserve_out),
    ) else {
        panic!("quotable");
    };
    out
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn fixture_creates_usd_pivoted_pairs() {
    let fx = fixture();
    assert_eq!(fx.registry.all_pairs_len(), 3);
    for pair in fx.registry.all_pairs() {
        assert_eq!(pair.pivot_asset(), usd());
        assert_eq!(pair.min_trade_size(), Amount::new(1_000));
        assert!(pair.token0() < pair.token1());
        assert_eq!(pair.reserves(), (Amount::ZERO, Amount::ZERO));
    }
    let mut registry = fx.registry;
    assert_eq!(
        registry.create_pair(dai(), usd(), Amount::ZERO, PivotSelector::AssetB),
        Err(AmmError::PairExists)
    );
}

#[test]
fn registry_loads_from_json() {
    let json = r#"{
        "address": "0xfafafafafafafafafafafafafafafafafafafafa",
        "pairs": [
            { "asset_a": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
              "asset_b": "0x1111111111111111111111111111111111111111" },
            { "asset_a": "0x2222222222222222222222222222222222222222",
              "asset_b": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
              "min_trade_size": 0,
              "pivot": "asset_b" }
        ]
    }"#;
    let Ok(cfg) = serde_json::from_str::<RegistryConfig>(json) else {
        panic!("parsed");
    };
    let Ok(registry) = PairRegistry::from_config(&cfg) else {
        panic!("built");
    };
    let usd_wise = pair_of(&registry, wise(), usd());
    assert_eq!(usd_wise.pivot_asset(), usd());
    assert_eq!(usd_wise.min_trade_size(), Amount::new(1_000));
    let usd_dai = pair_of(&registry, usd(), dai());
    assert_eq!(usd_dai.pivot_asset(), usd());
    assert_eq!(usd_dai.min_trade_size(), Amount::ZERO);
}

// ---------------------------------------------------------------------------
// Guard: pivot on the input side
// ---------------------------------------------------------------------------

#[test]
fn swap_1000_usd_in_wise_out_passes() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let expected_wise = quote(1_000, E18, 7 * E18);
    assert_eq!(expected_wise, Amount::new(6_978));

    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        usd(),
        1_000,
        expected_wise,
        Amount::ZERO,
    );
    let Ok(flows) = result else {
        panic!("swap should pass");
    };
    assert_eq!(flows.amount1_in, Amount::new(1_000));

    assert!(fx.ledger.transfers().contains(&TransferRecord {
        asset: wise(),
        from: pair.address(),
        to: wallet(),
        amount: expected_wise,
    }));
    assert_eq!(
        pair.events(),
        vec![
            PairEvent::Sync {
                reserve0: Amount::new(7 * E18 - 6_978),
                reserve1: Amount::new(E18 + 1_000),
            },
            PairEvent::Swap {
                sender: wallet(),
                amount0_in: Amount::ZERO,
                amount1_in: Amount::new(1_000),
                amount0_out: expected_wise,
                amount1_out: Amount::ZERO,
                to: wallet(),
            },
        ]
    );
}

#[test]
fn swap_999_usd_in_is_under_minimum_size() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let expected_wise = quote(999, E18, 7 * E18);
    let wise_before = fx.ledger.balance_of(wise(), wallet());

    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        usd(),
        999,
        expected_wise,
        Amount::ZERO,
    );
    assert_eq!(result.map_err(|e| e.code()), Err("UNDER_MINIMUM_SIZE"));
    assert_eq!(fx.ledger.balance_of(wise(), wallet()), wise_before);
    assert_eq!(pair.reserves(), (Amount::new(7 * E18), Amount::new(E18)));
    assert!(pair.events().is_empty());
}

#[test]
fn swap_one_full_usd_in_passes() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let expected_wise = quote(E18, E18, 7 * E18);
    assert_eq!(expected_wise, Amount::new(3_494_742_113_169_754_631));

    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        usd(),
        E18,
        expected_wise,
        Amount::ZERO,
    );
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(pair.reserves().1, Amount::new(2 * E18));
}

// ---------------------------------------------------------------------------
// Guard: pivot on the output side
// ---------------------------------------------------------------------------

#[test]
fn swap_7500_wise_in_usd_out_passes() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let expected_usd = quote(7_500, 7 * E18, E18);
    assert_eq!(expected_usd, Amount::new(1_068));

    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        wise(),
        7_500,
        Amount::ZERO,
        expected_usd,
    );
    let Ok(flows) = result else {
        panic!("swap should pass");
    };
    assert_eq!(flows.amount0_in, Amount::new(7_500));
    assert_eq!(flows.amount1_out, expected_usd);
}

#[test]
fn swap_6500_wise_in_is_under_minimum_size() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let expected_usd = quote(6_500, 7 * E18, E18);
    assert_eq!(expected_usd, Amount::new(925));

    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        wise(),
        6_500,
        Amount::ZERO,
        expected_usd,
    );
    assert_eq!(
        result,
        Err(AmmError::UnderMinimumTradeSize {
            pivot_amount: 925,
            min_trade_size: 1_000,
        })
    );
}

// ---------------------------------------------------------------------------
// Swap mechanics
// ---------------------------------------------------------------------------

#[test]
fn one_unit_over_quote_violates_invariant() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let Some(greedy) = quote(10_000, E18, 7 * E18).checked_add(&Amount::new(1)) else {
        panic!("no overflow");
    };
    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        usd(),
        10_000,
        greedy,
        Amount::ZERO,
    );
    assert_eq!(result, Err(AmmError::InvariantViolation));
}

#[test]
fn exact_output_via_amount_in() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let want = Amount::new(70_000);
    let Ok(needed) = get_amount_in(want, Amount::new(E18), Amount::new(7 * E18)) else {
        panic!("quotable");
    };
    let result = pay_and_swap(
        &fx.registry,
        pair,
        &mut fx.ledger,
        usd(),
        needed.get(),
        want,
        Amount::ZERO,
    );
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn unguarded_pair_accepts_dust() {
    let mut fx = fixture();
    let meme = Address::repeat_byte(0x44);
    let Ok(address) = fx
        .registry
        .create_pair(usd(), meme, Amount::ZERO, PivotSelector::AssetA)
    else {
        panic!("created");
    };
    let Ok(()) = fx.ledger.issue(meme, wallet(), Amount::new(10 * E18)) else {
        panic!("funded");
    };
    let Ok(pair) = fx.registry.pair(address) else {
        panic!("registered");
    };
    assert_eq!(pair.token0(), meme);
    let Ok(_) = add_liquidity(&fx.registry, pair, &mut fx.ledger, wallet(), 2 * E18, E18) else {
        panic!("seeded");
    };
    let out = quote(10, 2 * E18, E18);
    assert!(!out.is_zero());
    let result = pay_and_swap(&fx.registry, pair, &mut fx.ledger, meme, 10, Amount::ZERO, out);
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn recipient_cannot_be_pair_asset() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let request = SwapRequest::new(Amount::new(10_000), Amount::ZERO, usd());
    assert_eq!(
        pair.swap(&mut fx.ledger, wallet(), request, None),
        Err(AmmError::InvalidRecipient)
    );
}

// ---------------------------------------------------------------------------
// Flash swaps and reentrancy
// ---------------------------------------------------------------------------

struct Repay {
    payer: Address,
    pair: Address,
    asset: Address,
    amount: Amount,
    seen: Vec<u8>,
}

impl SwapCallee<MemoryLedger> for Repay {
    fn on_swap(
        &mut self,
        ledger: &mut MemoryLedger,
        _sender: Address,
        _amount0_out: Amount,
        _amount1_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError> {
        self.seen = data.to_vec();
        ledger.transfer(self.asset, self.payer, self.pair, self.amount)
    }
}

#[test]
fn flash_swap_repays_inside_callback() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let wise_out = quote(5_000, E18, 7 * E18);
    let mut callee = Repay {
        payer: wallet(),
        pair: pair.address(),
        asset: usd(),
        amount: Amount::new(5_000),
        seen: Vec::new(),
    };
    let request = SwapRequest::new(wise_out, Amount::ZERO, wallet()).with_data(b"flash");
    let result = pair.swap(&mut fx.ledger, wallet(), request, Some(&mut callee));
    let Ok(flows) = result else {
        panic!("flash swap should settle");
    };
    assert_eq!(flows.amount1_in, Amount::new(5_000));
    assert_eq!(callee.seen, b"flash".to_vec());
}

#[test]
fn flash_swap_without_repayment_fails() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let wise_out = quote(5_000, E18, 7 * E18);
    let mut callee = Repay {
        payer: wallet(),
        pair: pair.address(),
        asset: usd(),
        amount: Amount::new(1),
        seen: Vec::new(),
    };
    let request = SwapRequest::new(wise_out, Amount::ZERO, wallet());
    let wise_before = fx.ledger.balance_of(wise(), wallet());
    let result = fx
        .registry
        .atomically(&mut fx.ledger, |l| pair.swap(l, wallet(), request, Some(&mut callee)));
    // one unit in trips the size guard before the invariant
    assert!(matches!(result, Err(AmmError::UnderMinimumTradeSize { .. })));
    assert_eq!(fx.ledger.balance_of(wise(), wallet()), wise_before);
}

struct Reenter<'p> {
    pair: &'p Pair,
}

impl SwapCallee<MemoryLedger> for Reenter<'_> {
    fn on_swap(
        &mut self,
        ledger: &mut MemoryLedger,
        sender: Address,
        _amount0_out: Amount,
        _amount1_out: Amount,
        _data: &[u8],
    ) -> Result<(), AmmError> {
        self.pair.mint(ledger, sender, sender).map(|_| ())
    }
}

#[test]
fn callee_reentering_pair_is_locked() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let mut callee = Reenter { pair };
    let request = SwapRequest::new(Amount::new(10_000), Amount::ZERO, wallet());
    let result = fx
        .registry
        .atomically(&mut fx.ledger, |l| pair.swap(l, wallet(), request, Some(&mut callee)));
    assert_eq!(result, Err(AmmError::Locked));
    assert!(!pair.is_locked());
    assert_eq!(pair.reserves(), (Amount::new(7 * E18), Amount::new(E18)));
}

#[test]
fn callee_may_use_another_pair() {
    let mut fx = seeded_usd_wise();
    let usd_dai = pair_of(&fx.registry, usd(), dai());
    let Ok(_) = add_liquidity(&fx.registry, usd_dai, &mut fx.ledger, wallet(), E18, E18) else {
        panic!("seeded");
    };
    let usd_wise = pair_of(&fx.registry, usd(), wise());
    let mut callee = Reenter { pair: usd_dai };
    // minting on the other pair with nothing deposited fails, but not with Locked
    let request = SwapRequest::new(Amount::new(10_000), Amount::ZERO, wallet());
    let result = fx
        .registry
        .atomically(&mut fx.ledger, |l| usd_wise.swap(l, wallet(), request, Some(&mut callee)));
    assert_eq!(result, Err(AmmError::InsufficientLiquidityMinted));
}

/// Deposits `amount` of both assets into `pair` and mints to the sender.
struct MintElsewhere<'p> {
    pair: &'p Pair,
    amount: Amount,
}

impl SwapCallee<MemoryLedger> for MintElsewhere<'_> {
    fn on_swap(
        &mut self,
        ledger: &mut MemoryLedger,
        sender: Address,
        _amount0_out: Amount,
        _amount1_out: Amount,
        _data: &[u8],
    ) -> Result<(), AmmError> {
        ledger.transfer(self.pair.token0(), sender, self.pair.address(), self.amount)?;
        ledger.transfer(self.pair.token1(), sender, self.pair.address(), self.amount)?;
        self.pair.mint(ledger, sender, sender).map(|_| ())
    }
}

#[test]
fn failed_swap_reverts_callee_mint_on_another_pair() {
    let mut fx = seeded_usd_wise();
    let usd_dai = pair_of(&fx.registry, usd(), dai());
    let Ok(_) = add_liquidity(&fx.registry, usd_dai, &mut fx.ledger, wallet(), E18, E18) else {
        panic!("seeded");
    };
    let _ = usd_dai.take_events();
    let supply_before = usd_dai.total_supply();
    let held_before = usd_dai.liquidity_of(wallet());
    let k_before = usd_dai.k_last();

    let usd_wise = pair_of(&fx.registry, usd(), wise());
    let mut callee = MintElsewhere {
        pair: usd_dai,
        amount: Amount::new(E18),
    };
    // the callee's mint settles, then the outer swap finds no input
    let request = SwapRequest::new(Amount::new(10_000), Amount::ZERO, wallet());
    let result = fx
        .registry
        .atomically(&mut fx.ledger, |l| usd_wise.swap(l, wallet(), request, Some(&mut callee)));
    assert_eq!(result, Err(AmmError::InsufficientInputAmount));

    assert_eq!(usd_dai.reserves(), (Amount::new(E18), Amount::new(E18)));
    assert_eq!(fx.ledger.balance_of(dai(), usd_dai.address()), Ok(Amount::new(E18)));
    assert_eq!(fx.ledger.balance_of(usd(), usd_dai.address()), Ok(Amount::new(E18)));
    assert_eq!(usd_dai.total_supply(), supply_before);
    assert_eq!(usd_dai.liquidity_of(wallet()), held_before);
    assert_eq!(usd_dai.k_last(), k_before);
    assert!(usd_dai.events().is_empty());
    assert_eq!(
        usd_dai.skim(&mut fx.ledger, other()),
        Ok((Amount::ZERO, Amount::ZERO))
    );
}

#[test]
fn nested_transaction_failure_keeps_outer_changes() {
    let mut fx = seeded_usd_wise();
    let usd_dai = pair_of(&fx.registry, usd(), dai());
    let registry = &fx.registry;
    let result = registry.atomically(&mut fx.ledger, |l| {
        let minted = add_liquidity(registry, usd_dai, l, wallet(), E18, E18)?;
        // a second deposit that fails on its own is unwound alone
        let nested = add_liquidity(registry, usd_dai, l, other(), 1, 1);
        assert_eq!(nested, Err(AmmError::InsufficientBalance));
        Ok(minted)
    });
    let Ok(minted) = result else {
        panic!("outer transaction settles");
    };
    assert_eq!(usd_dai.liquidity_of(wallet()), minted);
    assert_eq!(usd_dai.reserves(), (Amount::new(E18), Amount::new(E18)));
}

// ---------------------------------------------------------------------------
// Liquidity lifecycle
// ---------------------------------------------------------------------------

#[test]
fn second_provider_mints_and_burns() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let Ok(()) = fx.ledger.issue(wise(), other(), Amount::new(70 * E18)) else {
        panic!("funded");
    };
    let Ok(()) = fx.ledger.issue(usd(), other(), Amount::new(10 * E18)) else {
        panic!("funded");
    };

    let supply_before = pair.total_supply();
    let Ok(minted) = add_liquidity(&fx.registry, pair, &mut fx.ledger, other(), 7 * E18, E18) else {
        panic!("minted");
    };
    assert_eq!(minted, supply_before);
    assert_eq!(pair.k_last(), Some(pair.reserve_state().product()));

    let Ok(()) = pair.transfer_liquidity(other(), pair.address(), minted) else {
        panic!("sent to pair");
    };
    let Ok((wise_back, usd_back)) = pair.burn(&mut fx.ledger, other(), other()) else {
        panic!("burned");
    };
    assert_eq!(wise_back, Amount::new(7 * E18));
    assert_eq!(usd_back, Amount::new(E18));
    assert_eq!(pair.liquidity_of(other()), Liquidity::ZERO);
    assert_eq!(pair.liquidity_of(Address::ZERO), MINIMUM_LIQUIDITY);
    assert!(matches!(
        pair.events().last(),
        Some(PairEvent::Burn { to, .. }) if *to == other()
    ));
}

#[test]
fn skim_and_sync_settle_donations() {
    let mut fx = seeded_usd_wise();
    let pair = pair_of(&fx.registry, usd(), wise());
    let Ok(()) = fx.ledger.transfer(usd(), wallet(), pair.address(), Amount::new(42)) else {
        panic!("donated");
    };
    assert_eq!(
        pair.skim(&mut fx.ledger, other()),
        Ok((Amount::ZERO, Amount::new(42)))
    );
    assert_eq!(fx.ledger.balance_of(usd(), other()), Ok(Amount::new(42)));

    let Ok(()) = fx.ledger.transfer(wise(), wallet(), pair.address(), Amount::new(7)) else {
        panic!("donated");
    };
    let Ok(()) = pair.sync(&mut fx.ledger) else {
        panic!("synced");
    };
    assert_eq!(pair.reserves(), (Amount::new(7 * E18 + 7), Amount::new(E18)));
}
