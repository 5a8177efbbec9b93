//! Pair creation and lookup.
//!
//! The [`PairRegistry`] creates one [`Pair`](crate::pair::Pair) per
//! unordered asset pair, derives its address with the CREATE2 rule (see
//! [`pair_address`]) and resolves the pivot selector given at creation.
//!
//! # Usage
//!
//! ```rust
//! use alloy_primitives::Address;
//! use pivot_amm::config::{PairConfig, RegistryConfig};
//! use pivot_amm::domain::{Amount, PivotSelector};
//! use pivot_amm::factory::PairRegistry;
//! use pivot_amm::traits::FromConfig;
//!
//! let usd = Address::repeat_byte(0xee);
//! let wise = Address::repeat_byte(0x11);
//! let pair = PairConfig::new(usd, wise, Amount::new(1_000), PivotSelector::AssetA)
//!     .expect("valid pair");
//! let cfg = RegistryConfig::new(Address::repeat_byte(0xfa), vec![pair]).expect("valid");
//!
//! let registry = PairRegistry::from_config(&cfg).expect("registry built");
//! assert!(registry.get_pair(usd, wise).is_some());
//! ```

mod registry;

pub use registry::{pair_address, PairRegistry, PAIR_INIT_CODE_DIGEST};
