//! Roll Domain Services

mod roll_calculator;

pub use roll_calculator::RollCalculator;
