//! Ledger implementations of [`AssetLedger`](crate::traits::AssetLedger).

mod memory;

pub use memory::{MemoryLedger, TransferRecord};
