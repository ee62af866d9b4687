//! Shared Domain Types
//!
//! Value objects and errors shared across bounded contexts.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{
    AccountId, Amount, AssetId, BIPS_BASE, BasisPoints, DurationSecs, OfferId, PositionId, Price,
    ProviderPositionId, RollOfferId, SignedAmount, UnixTime,
};
