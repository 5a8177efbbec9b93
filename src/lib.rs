//! # Pivot AMM
//!
//! Constant-product pair engine (Uniswap V2 semantics) with a per-pair
//! minimum trade size enforced on a designated *pivot* asset.
//!
//! Each pair holds reserves of two assets, issues fungible liquidity claims,
//! charges a 0.3% fee on swap inputs and verifies the fee-adjusted constant
//! product after every trade.  On top of that, a swap must move at least
//! `min_trade_size` of the pivot asset, measured as the larger of what the
//! pivot side received and what it paid out, so dust trades are rejected.
//!
//! # Quick Start
//!
//! ```rust
//! use alloy_primitives::Address;
//! use pivot_amm::prelude::*;
//!
//! let usd = Address::repeat_byte(0xee);
//! let wise = Address::repeat_byte(0x11);
//! let lp = Address::repeat_byte(0x01);
//! let trader = Address::repeat_byte(0x02);
//!
//! // 1. Create a USD/WISE pair guarded on USD
//! let mut registry = PairRegistry::new(Address::repeat_byte(0xfa));
//! let address = registry
//!     .create_pair(usd, wise, Amount::new(1_000), PivotSelector::AssetA)
//!     .expect("pair created");
//! let pair = registry.pair(address).expect("registered");
//!
//! // 2. Seed liquidity: deposit into the pair, then mint
//! let mut ledger = MemoryLedger::new();
//! ledger.issue(usd, address, Amount::new(1_000_000)).expect("deposit");
//! ledger.issue(wise, address, Amount::new(7_000_000)).expect("deposit");
//! pair.mint(&mut ledger, lp, lp).expect("minted");
//!
//! // 3. A dust trade is rejected on the pivot side
//! let result = registry.atomically(&mut ledger, |l| {
//!     l.issue(usd, address, Amount::new(999))?;
//!     pair.swap(l, trader, SwapRequest::new(Amount::new(1), Amount::ZERO, trader), None)
//! });
//! assert_eq!(result.map_err(|e| e.code()), Err("UNDER_MINIMUM_SIZE"));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  RegistryConfig / create_pair
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │ PairRegistry  │  sorting, CREATE2 addresses, pivot resolution
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐      ┌──────────────┐
//! │     Pair      │ ───▶ │ AssetLedger   │  balances + transfers
//! └──────┬───────┘      └──────────────┘
//!        │ optional
//!        ▼
//! ┌──────────────┐
//! │  SwapCallee   │  flash-swap callback
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Liquidity`](domain::Liquidity), [`AssetPair`](domain::AssetPair), pivot designation, events |
//! | [`pair`] | [`Pair`](pair::Pair) and its reserve, liquidity, guard and swap components |
//! | [`factory`] | [`PairRegistry`](factory::PairRegistry) |
//! | [`config`] | Serde-loadable [`PairConfig`](config::PairConfig) and [`RegistryConfig`](config::RegistryConfig) |
//! | [`ledger`] | [`MemoryLedger`](ledger::MemoryLedger) |
//! | [`traits`] | [`AssetLedger`](traits::AssetLedger), [`SwapCallee`](traits::SwapCallee), [`FromConfig`](traits::FromConfig) |
//! | [`math`] | Checked arithmetic, integer square root, quote helpers |
//! | [`error`] | [`AmmError`](error::AmmError) with stable reason codes |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pair;
pub mod prelude;
pub mod traits;
