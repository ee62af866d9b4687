//! Asset Ledger Adapters

mod in_memory;

pub use in_memory::InMemoryAssetLedger;
