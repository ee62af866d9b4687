//! Rolls Bounded Context
//!
//! Replacement of a live position with a new one at updated terms: the roll
//! offer lifecycle, the price-sensitive fee, and the fund-conservation
//! identity.
//!
//! # Key Concepts
//!
//! - **RollOffer Aggregate**: Active -> (Cancelled | Executed), terminal
//!   either way; no amendment path
//! - **Fee formula**: a linear price adjustment on a signed base fee
//! - **Roll calculator**: reuses the position settlement math as a
//!   subroutine and proves conservation on every computation

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{CreateRollOfferCommand, RollOffer, RollOfferStatus};
pub use errors::RollError;
pub use repository::RollOfferRepository;
pub use services::RollCalculator;
pub use value_objects::{FeeTerms, MAX_FEE_DELTA_FACTOR_BIPS, RollPreview};
