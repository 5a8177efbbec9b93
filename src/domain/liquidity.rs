//! Liquidity claim units.

use core::fmt;

use alloy_primitives::U256;

use crate::error::AmmError;

/// Units of a fungible claim on a pair's pooled reserves.
///
/// Distinct from [`Amount`](super::Amount) because it measures proportional ownership of
/// both reserves rather than a quantity of one asset.
///
/// # Examples
///
/// ```
/// use pivot_amm::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// let b = Liquidity::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Liquidity::new(3_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No liquidity.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Liquidity` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the liquidity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Widens to 256 bits.
    #[must_use]
    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }

    /// Narrows a 256-bit intermediate back to `Liquidity`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if `value` does not fit in 128 bits.
    pub fn try_from_u256(value: U256, context: &'static str) -> Result<Self, AmmError> {
        u128::try_from(value)
            .map(Self)
            .map_err(|_| AmmError::Overflow(context))
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
