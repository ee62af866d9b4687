//! Price Oracle Adapters

mod mock;

pub use mock::MockPriceOracle;
