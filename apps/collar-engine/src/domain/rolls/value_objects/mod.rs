//! Roll Value Objects

mod fee;
mod preview;

pub use fee::{FeeTerms, MAX_FEE_DELTA_FACTOR_BIPS};
pub use preview::RollPreview;
