//! Pivot-guarded pair lifecycle example.
//!
//! Demonstrates creating a USD/WISE pair guarded on USD, seeding liquidity,
//! swapping on both sides of the minimum trade size, and withdrawing.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=pivot_amm=debug cargo run --example pair_lifecycle
//! ```

use alloy_primitives::Address;
use pivot_amm::domain::{Amount, PivotSelector};
use pivot_amm::factory::PairRegistry;
use pivot_amm::ledger::MemoryLedger;
use pivot_amm::math::get_amount_out;
use pivot_amm::pair::SwapRequest;
use pivot_amm::traits::AssetLedger;

const E18: u128 = 1_000_000_000_000_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Pivot-guarded constant product pair ===\n");

    // ── 1. Assets and accounts ──────────────────────────────────────────
    let usd = Address::repeat_byte(0xee);
    let wise = Address::repeat_byte(0x11);
    let wallet = Address::repeat_byte(0x01);

    let mut ledger = MemoryLedger::new();
    ledger.issue(usd, wallet, Amount::new(1_000 * E18))?;
    ledger.issue(wise, wallet, Amount::new(1_000 * E18))?;

    // ── 2. Create the pair with USD as pivot, threshold 1000 ────────────
    let mut registry = PairRegistry::new(Address::repeat_byte(0xfa));
    let address = registry.create_pair(usd, wise, Amount::new(1_000), PivotSelector::AssetA)?;
    let pair = registry.pair(address)?;
    println!("Pair:        {address}");
    println!("  token0:    {}", pair.token0());
    println!("  token1:    {}", pair.token1());
    println!("  pivot:     {}", pair.pivot_asset());
    println!("  min size:  {}", pair.min_trade_size());

    // ── 3. Seed 1 USD : 7 WISE ──────────────────────────────────────────
    ledger.transfer(wise, wallet, address, Amount::new(7 * E18))?;
    ledger.transfer(usd, wallet, address, Amount::new(E18))?;
    let minted = pair.mint(&mut ledger, wallet, wallet)?;
    let (r0, r1) = pair.reserves();
    println!("\nMinted {minted} claims; reserves = ({r0}, {r1})");

    // ── 4. Swap 1000 USD in: exactly at the threshold ───────────────────
    let out = get_amount_out(Amount::new(1_000), r1, r0)?;
    let flows = registry.atomically(&mut ledger, |l| {
        l.transfer(usd, wallet, address, Amount::new(1_000))?;
        pair.swap(l, wallet, SwapRequest::new(out, Amount::ZERO, wallet), None)
    })?;
    println!("\n--- Swap: 1000 USD in ---");
    println!("  WISE out:  {}", flows.amount0_out);

    // ── 5. Swap 999 USD in: rejected, nothing moves ─────────────────────
    let (r0, r1) = pair.reserves();
    let out = get_amount_out(Amount::new(999), r1, r0)?;
    let rejected = registry.atomically(&mut ledger, |l| {
        l.transfer(usd, wallet, address, Amount::new(999))?;
        pair.swap(l, wallet, SwapRequest::new(out, Amount::ZERO, wallet), None)
    });
    match rejected {
        Ok(_) => println!("\n--- Swap: 999 USD in --- unexpectedly settled"),
        Err(err) => println!("\n--- Swap: 999 USD in --- rejected [{}]: {err}", err.code()),
    }

    // ── 6. Swap WISE in for USD out: guarded on the output side ─────────
    let (r0, r1) = pair.reserves();
    let usd_out = get_amount_out(Amount::new(7_500), r0, r1)?;
    let flows = registry.atomically(&mut ledger, |l| {
        l.transfer(wise, wallet, address, Amount::new(7_500))?;
        pair.swap(l, wallet, SwapRequest::new(Amount::ZERO, usd_out, wallet), None)
    })?;
    println!("\n--- Swap: 7500 WISE in ---");
    println!("  USD out:   {}", flows.amount1_out);

    // ── 7. Withdraw everything ──────────────────────────────────────────
    pair.transfer_liquidity(wallet, address, minted)?;
    let (wise_back, usd_back) = pair.burn(&mut ledger, wallet, wallet)?;
    println!("\nBurned {minted} claims for {wise_back} WISE + {usd_back} USD");
    println!("Locked forever: {}", pair.liquidity_of(Address::ZERO));
    println!("USD balance:    {}", ledger.balance_of(usd, wallet)?);

    println!("\nEvents emitted: {}", pair.events().len());
    Ok(())
}
