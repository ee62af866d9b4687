//! Position Aggregate

mod position;

pub use position::{OpenPositionCommand, Position, PositionStatus, ProviderRef};
