//! Pivot-asset designation for the minimum trade size guard.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::AssetPair;
use crate::error::AmmError;

/// Which of a pair's sorted assets is subject to the minimum trade size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotAsset {
    /// `token0` is the pivot.
    Token0,
    /// `token1` is the pivot.
    Token1,
}

impl PivotAsset {
    /// Returns the pivot's index within the sorted pair (`0` or `1`).
    #[must_use]
    pub const fn index(&self) -> u8 {
        match self {
            Self::Token0 => 0,
            Self::Token1 => 1,
        }
    }

    /// Returns the pivot asset's address within `pair`.
    #[must_use]
    pub const fn asset(&self, pair: &AssetPair) -> Address {
        match self {
            Self::Token0 => pair.token0(),
            Self::Token1 => pair.token1(),
        }
    }
}

/// Names the pivot by its position in a `create_pair` call.
///
/// Registries accept assets in caller order, so the pivot is chosen the same
/// way and resolved to a [`PivotAsset`] once the pair is sorted.  A caller
/// creating `(USD, WISE)` with [`PivotSelector::AssetA`] guards USD no matter
/// which address sorts lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotSelector {
    /// The first asset argument is the pivot.
    #[default]
    AssetA,
    /// The second asset argument is the pivot.
    AssetB,
}

impl PivotSelector {
    /// Resolves the selector against the unsorted creation arguments.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the selected asset is
    /// not part of `pair`.
    pub fn resolve(
        &self,
        asset_a: Address,
        asset_b: Address,
        pair: &AssetPair,
    ) -> Result<PivotAsset, AmmError> {
        let pivot = match self {
            Self::AssetA => asset_a,
            Self::AssetB => asset_b,
        };
        if pivot == pair.token0() {
            Ok(PivotAsset::Token0)
        } else if pivot == pair.token1() {
            Ok(PivotAsset::Token1)
        } else {
            Err(AmmError::InvalidConfiguration("pivot asset is not part of the pair"))
        }
    }
}

impl From<u8> for PivotSelector {
    /// `0` selects the first argument; any other value selects the second.
    fn from(flag: u8) -> Self {
        if flag == 0 {
            Self::AssetA
        } else {
            Self::AssetB
        }
    }
}
