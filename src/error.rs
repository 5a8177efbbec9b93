//! Unified error types for the pair engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every variant maps to a stable, machine-readable code via
//! [`AmmError::code`] so callers can match on reasons without parsing the
//! human-readable message.

/// Errors produced by pairs, the registry, the quote helpers and ledgers.
///
/// Validation failures are never transient: the caller must resubmit with
/// corrected parameters.  Arithmetic variants carry a short static context
/// string naming the computation that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    /// The liquidity computed for a deposit is zero.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// Burning the held liquidity would return zero of at least one asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// A swap requested no output at all.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// No input was observed on either side of a swap.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Requested output is not strictly below the available reserve, or a
    /// quote was asked against an empty reserve.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A proportional quote was requested for a zero amount.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// The swap recipient is one of the pair's own assets.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// The fee-adjusted constant product would decrease.
    #[error("constant product invariant violated")]
    InvariantViolation,

    /// The pivot-side amount of a swap is below the pair's threshold.
    #[error("pivot amount {pivot_amount} is under the minimum trade size {min_trade_size}")]
    UnderMinimumTradeSize {
        /// The larger of the pivot-side input and output.
        pivot_amount: u128,
        /// The pair's configured threshold.
        min_trade_size: u128,
    },

    /// A reserve-mutating entry point was re-entered during another call.
    #[error("pair is locked")]
    Locked,

    /// Both assets of a pair are the same.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// An asset address is the zero address.
    #[error("zero address")]
    ZeroAddress,

    /// A pair already exists for the two assets.
    #[error("pair already exists")]
    PairExists,

    /// No pair is registered at the given address.
    #[error("unknown pair")]
    UnknownPair,

    /// A holder tried to move more than it owns.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// An arithmetic operation overflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// An arithmetic operation underflowed.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero was attempted.
    #[error("division by zero")]
    DivisionByZero,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

impl AmmError {
    /// Returns the stable reason code for this error.
    ///
    /// Codes never change between releases and are safe to persist or
    /// compare against.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientLiquidityMinted => "INSUFFICIENT_LIQUIDITY_MINTED",
            Self::InsufficientLiquidityBurned => "INSUFFICIENT_LIQUIDITY_BURNED",
            Self::InsufficientOutputAmount => "INSUFFICIENT_OUTPUT_AMOUNT",
            Self::InsufficientInputAmount => "INSUFFICIENT_INPUT_AMOUNT",
            Self::InsufficientLiquidity => "INSUFFICIENT_LIQUIDITY",
            Self::InsufficientAmount => "INSUFFICIENT_AMOUNT",
            Self::InvalidRecipient => "INVALID_TO",
            Self::InvariantViolation => "K",
            Self::UnderMinimumTradeSize { .. } => "UNDER_MINIMUM_SIZE",
            Self::Locked => "LOCKED",
            Self::IdenticalAddresses => "IDENTICAL_ADDRESSES",
            Self::ZeroAddress => "ZERO_ADDRESS",
            Self::PairExists => "PAIR_EXISTS",
            Self::UnknownPair => "UNKNOWN_PAIR",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::Overflow(_) => "OVERFLOW",
            Self::Underflow(_) => "UNDERFLOW",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
        }
    }
}
