//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod amounts;
mod basis_points;
mod identifiers;
mod timestamp;

pub use amounts::{Amount, Price, SignedAmount};
pub use basis_points::{BIPS_BASE, BasisPoints};
pub use identifiers::{AccountId, AssetId, OfferId, PositionId, ProviderPositionId, RollOfferId};
pub use timestamp::{DurationSecs, UnixTime};
