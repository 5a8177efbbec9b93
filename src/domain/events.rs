//! Records emitted by a pair for observers.
//!
//! The pair never reads these back; they exist so callers and tests can
//! observe what a call did without diffing state.

use alloy_primitives::Address;

use super::{Amount, Liquidity};

/// A record appended to a pair's event log by a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEvent {
    /// Reserves were overwritten with the pair's ledger balances.
    Sync {
        /// New `reserve0`.
        reserve0: Amount,
        /// New `reserve1`.
        reserve1: Amount,
    },
    /// Liquidity was minted against deposited assets.
    Mint {
        /// Caller of `mint`.
        sender: Address,
        /// `token0` deposited.
        amount0: Amount,
        /// `token1` deposited.
        amount1: Amount,
    },
    /// Liquidity held by the pair was burned and assets paid out.
    Burn {
        /// Caller of `burn`.
        sender: Address,
        /// `token0` paid out.
        amount0: Amount,
        /// `token1` paid out.
        amount1: Amount,
        /// Recipient of both assets.
        to: Address,
    },
    /// A swap settled.
    Swap {
        /// Caller of `swap`.
        sender: Address,
        /// `token0` observed coming in.
        amount0_in: Amount,
        /// `token1` observed coming in.
        amount1_in: Amount,
        /// `token0` paid out.
        amount0_out: Amount,
        /// `token1` paid out.
        amount1_out: Amount,
        /// Recipient of the outputs.
        to: Address,
    },
    /// Liquidity claims moved between holders; `Address::ZERO` marks mint
    /// (as `from`) or burn (as `to`).
    Transfer {
        /// Previous holder.
        from: Address,
        /// New holder.
        to: Address,
        /// Claims moved.
        value: Liquidity,
    },
}
