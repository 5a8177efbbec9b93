//! Canonically ordered pair of distinct assets.

use alloy_primitives::Address;

use crate::error::AmmError;

/// Sorts two asset addresses into `(token0, token1)` order.
///
/// The order is byte-lexicographic over the 20-byte addresses, so the
/// result is independent of argument order.  This is the single source of
/// truth for which asset a pair calls `token0`.
///
/// # Errors
///
/// - [`AmmError::IdenticalAddresses`] if `a == b`.
/// - [`AmmError::ZeroAddress`] if either address is zero.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use pivot_amm::domain::sort_assets;
///
/// let lo = Address::repeat_byte(0x01);
/// let hi = Address::repeat_byte(0x02);
/// assert_eq!(sort_assets(hi, lo), Ok((lo, hi)));
/// ```
pub fn sort_assets(a: Address, b: Address) -> Result<(Address, Address), AmmError> {
    if a == b {
        return Err(AmmError::IdenticalAddresses);
    }
    let (token0, token1) = if a < b { (a, b) } else { (b, a) };
    // only the lower address can be zero
    if token0 == Address::ZERO {
        return Err(AmmError::ZeroAddress);
    }
    Ok((token0, token1))
}

/// An ordered pair of distinct assets, canonically sorted by address.
///
/// The canonical ordering guarantees `token0 < token1`, so `(A, B)` and
/// `(B, A)` describe the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPair {
    token0: Address,
    token1: Address,
}

impl AssetPair {
    /// Creates a canonically ordered pair from two assets in any order.
    ///
    /// # Errors
    ///
    /// Same as [`sort_assets`].
    pub fn new(a: Address, b: Address) -> Result<Self, AmmError> {
        let (token0, token1) = sort_assets(a, b)?;
        Ok(Self { token0, token1 })
    }

    /// Returns the lower-addressed asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Returns the higher-addressed asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `asset` is one of the two assets.
    #[must_use]
    pub fn contains(&self, asset: &Address) -> bool {
        self.token0 == *asset || self.token1 == *asset
    }
}
