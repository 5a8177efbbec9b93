//! Configuration for a single pivot-guarded pair.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, AssetPair, PivotAsset, PivotSelector};
use crate::error::AmmError;

/// Threshold applied when a configuration omits `min_trade_size`.
pub const DEFAULT_MIN_TRADE_SIZE: Amount = Amount::new(1_000);

const fn default_min_trade_size() -> Amount {
    DEFAULT_MIN_TRADE_SIZE
}

/// Declarative description of one pair to create.
///
/// Assets are given in caller order; [`PivotSelector`] picks the pivot by
/// that order, and sorting happens on creation.
///
/// # Validation
///
/// - The two assets must be distinct and non-zero.
///
/// # Serialized Form
///
/// ```json
/// {
///   "asset_a": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
///   "asset_b": "0x1111111111111111111111111111111111111111",
///   "min_trade_size": 1000,
///   "pivot": "asset_a"
/// }
/// ```
///
/// `min_trade_size` defaults to [`DEFAULT_MIN_TRADE_SIZE`] and `pivot` to
/// [`PivotSelector::AssetA`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    asset_a: Address,
    asset_b: Address,
    #[serde(default = "default_min_trade_size")]
    min_trade_size: Amount,
    #[serde(default)]
    pivot: PivotSelector,
}

impl PairConfig {
    /// Creates a new `PairConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalAddresses`] or [`AmmError::ZeroAddress`]
    /// if the assets cannot form a pair.
    pub fn new(
        asset_a: Address,
        asset_b: Address,
        min_trade_size: Amount,
        pivot: PivotSelector,
    ) -> Result<Self, AmmError> {
        let config = Self {
            asset_a,
            asset_b,
            min_trade_size,
            pivot,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// Deserialized configs bypass [`PairConfig::new`], so consumers call
    /// this before use.
    ///
    /// # Errors
    ///
    /// Same as [`PairConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        self.resolve().map(|_| ())
    }

    /// Sorts the assets and resolves the pivot against the sorted pair.
    ///
    /// # Errors
    ///
    /// Same as [`PairConfig::new`].
    pub fn resolve(&self) -> Result<(AssetPair, PivotAsset), AmmError> {
        let assets = AssetPair::new(self.asset_a, self.asset_b)?;
        let pivot = self.pivot.resolve(self.asset_a, self.asset_b, &assets)?;
        Ok((assets, pivot))
    }

    /// Returns the first asset as given.
    #[must_use]
    pub const fn asset_a(&self) -> Address {
        self.asset_a
    }

    /// Returns the second asset as given.
    #[must_use]
    pub const fn asset_b(&self) -> Address {
        self.asset_b
    }

    /// Returns the minimum pivot-side amount per swap.
    #[must_use]
    pub const fn min_trade_size(&self) -> Amount {
        self.min_trade_size
    }

    /// Returns the pivot selector.
    #[must_use]
    pub const fn pivot(&self) -> PivotSelector {
        self.pivot
    }
}
