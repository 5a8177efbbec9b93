//! Configuration for a registry and the pairs it starts with.

use std::collections::HashSet;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::PairConfig;
use crate::error::AmmError;

/// Declarative blueprint for a [`PairRegistry`](crate::factory::PairRegistry).
///
/// # Validation
///
/// - The registry address must be non-zero.
/// - Every [`PairConfig`] must be valid.
/// - No two entries may describe the same unordered pair.
///
/// # Serialized Form
///
/// ```json
/// {
///   "address": "0xfafafafafafafafafafafafafafafafafafafafa",
///   "pairs": [
///     { "asset_a": "0xeeee…", "asset_b": "0x1111…", "min_trade_size": 1000 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    address: Address,
    #[serde(default)]
    pairs: Vec<PairConfig>,
}

impl RegistryConfig {
    /// Creates a new `RegistryConfig`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAddress`] if `address` is zero.
    /// - [`AmmError::PairExists`] if two entries name the same pair.
    /// - Any error from [`PairConfig::validate`].
    pub fn new(address: Address, pairs: Vec<PairConfig>) -> Result<Self, AmmError> {
        let config = Self { address, pairs };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Same as [`RegistryConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.address == Address::ZERO {
            return Err(AmmError::ZeroAddress);
        }
        let mut seen = HashSet::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            let (assets, _) = pair.resolve()?;
            if !seen.insert(assets) {
                return Err(AmmError::PairExists);
            }
        }
        Ok(())
    }

    /// Returns the registry's own address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the pairs to create, in order.
    #[must_use]
    pub fn pairs(&self) -> &[PairConfig] {
        &self.pairs
    }
}
