//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use pivot_amm::prelude::*;
//! ```

pub use crate::config::{PairConfig, RegistryConfig};
pub use crate::domain::{Amount, AssetPair, Liquidity, PairEvent, PivotAsset, PivotSelector};
pub use crate::error::AmmError;
pub use crate::factory::PairRegistry;
pub use crate::ledger::MemoryLedger;
pub use crate::math::{get_amount_in, get_amount_out, quote, CheckedArithmetic};
pub use crate::pair::{Pair, SwapFlows, SwapRequest};
pub use crate::traits::{AssetLedger, FromConfig, SwapCallee};
