//! Fundamental domain value types used throughout the engine.
//!
//! This module contains the value types that model the exchange domain:
//! amounts, liquidity claims, canonically ordered asset pairs, the pivot
//! designation and the events a pair emits.

mod amount;
mod asset_pair;
mod events;
mod liquidity;
mod pivot;

pub use alloy_primitives::Address;
pub use amount::Amount;
pub use asset_pair::{sort_assets, AssetPair};
pub use events::PairEvent;
pub use liquidity::Liquidity;
pub use pivot::{PivotAsset, PivotSelector};
