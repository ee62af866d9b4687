//! Position Value Objects

mod settlement;
mod strike_range;

pub use settlement::{SettlementOutcome, SettlementTerms};
pub use strike_range::StrikeRange;
