//! Generic construction trait for configuration-driven instantiation.
//!
//! [`FromConfig`] provides a uniform interface for building a value from a
//! declarative configuration struct.  The registry implements it for
//! [`RegistryConfig`](crate::config::RegistryConfig) so a whole set of
//! pairs can be stood up from a parsed file.
//!
//! # Validation Contract
//!
//! Implementations **must** validate all configuration invariants during
//! construction.  A successfully constructed value is guaranteed to be in
//! a valid initial state:
//!
//! - Every pair has two distinct, non-zero asset addresses
//! - No two entries describe the same unordered pair
//! - Each pivot selector resolves to one of the pair's assets

use crate::error::AmmError;

/// Builds `Self` from a configuration, validating it first.
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] (or a more specific
/// variant such as [`AmmError::PairExists`]) if the configuration is
/// invalid.
pub trait FromConfig<C> {
    /// Creates a new instance from the given configuration.
    ///
    /// The configuration is taken by reference because it may be reused
    /// (e.g., for logging or for standing up a second instance).
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
