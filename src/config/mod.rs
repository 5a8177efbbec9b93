//! Declarative, serde-loadable configuration.
//!
//! [`PairConfig`] describes one pair to create; [`RegistryConfig`] is the
//! top-level blueprint a [`PairRegistry`](crate::factory::PairRegistry) is
//! built from via [`FromConfig`](crate::traits::FromConfig).

mod pair;
mod registry;

pub use pair::{PairConfig, DEFAULT_MIN_TRADE_SIZE};
pub use registry::RegistryConfig;
