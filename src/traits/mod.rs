//! Core trait abstractions at the engine's seams.
//!
//! - [`AssetLedger`]: the balance/transfer capability a pair consumes.
//! - [`SwapCallee`]: optional callback a swap recipient may implement.
//! - [`FromConfig`]: configuration-driven construction.

mod asset_ledger;
mod from_config;
mod swap_callee;

pub use asset_ledger::AssetLedger;
pub use from_config::FromConfig;
pub use swap_callee::SwapCallee;
