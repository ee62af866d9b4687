//! Positions Bounded Context
//!
//! The paired-position lifecycle: opening, expiry settlement, early
//! cancellation, withdrawal, and the piecewise-linear payout split.
//!
//! # Key Concepts
//!
//! - **Position Aggregate**: the taker side of a pair, with the lifecycle
//!   Open -> (Settled | Cancelled) -> Withdrawn
//! - **Settlement math**: a pure, zero-sum split of the two locked amounts
//!   clamped to the strike band
//! - **Strike range**: the shared basis-point formula both sides derive
//!   locked amounts from

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod value_objects;

pub use aggregate::{OpenPositionCommand, Position, PositionStatus, ProviderRef};
pub use errors::PositionError;
pub use repository::PositionRepository;
pub use value_objects::{SettlementOutcome, SettlementTerms, StrikeRange};
