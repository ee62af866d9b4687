//! Basis-point value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One hundred percent in basis points.
pub const BIPS_BASE: u32 = 10_000;

/// A basis-point multiplier (10000 = 100%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 100% (the base).
    pub const BASE: Self = Self(BIPS_BASE);

    /// Create a new basis-point value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw basis-point value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns true when strictly below 100%.
    #[must_use]
    pub const fn is_below_base(self) -> bool {
        self.0 < BIPS_BASE
    }

    /// Returns true when strictly above 100%.
    #[must_use]
    pub const fn is_above_base(self) -> bool {
        self.0 > BIPS_BASE
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bips", self.0)
    }
}

impl From<u32> for BasisPoints {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
