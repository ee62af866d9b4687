//! Strike-range value object.
//!
//! The put/call strike percentages define the payout band of a paired
//! position. Both the taker engine and the provider store derive the
//! provider-side locked amount from the same formula, so it lives here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Amount, BIPS_BASE, BasisPoints, DomainError, Price};

/// Basis-point strike bounds of a paired position.
///
/// Invariant: `put_percent < 10000 < call_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrikeRange {
    put_percent: BasisPoints,
    call_percent: BasisPoints,
}

impl StrikeRange {
    /// Create a strike range.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] unless
    /// `put_percent < 10000 < call_percent`.
    pub fn new(put_percent: BasisPoints, call_percent: BasisPoints) -> Result<Self, DomainError> {
        if !put_percent.is_below_base() {
            return Err(DomainError::InvalidValue {
                field: "put_percent".to_string(),
                message: format!("{put_percent} must be below {BIPS_BASE}"),
            });
        }
        if !call_percent.is_above_base() {
            return Err(DomainError::InvalidValue {
                field: "call_percent".to_string(),
                message: format!("{call_percent} must be above {BIPS_BASE}"),
            });
        }
        Ok(Self {
            put_percent,
            call_percent,
        })
    }

    /// Put strike percentage.
    #[must_use]
    pub const fn put_percent(self) -> BasisPoints {
        self.put_percent
    }

    /// Call strike percentage.
    #[must_use]
    pub const fn call_percent(self) -> BasisPoints {
        self.call_percent
    }

    /// Put strike price: `start_price * put_percent / 10000`, floored.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn put_strike_price(self, start_price: Price) -> Result<Price, DomainError> {
        Amount::new(start_price.value())
            .mul_div(u128::from(self.put_percent.value()), u128::from(BIPS_BASE))
            .map(|a| Price::new(a.value()))
    }

    /// Call strike price: `start_price * call_percent / 10000`, floored.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn call_strike_price(self, start_price: Price) -> Result<Price, DomainError> {
        Amount::new(start_price.value())
            .mul_div(u128::from(self.call_percent.value()), u128::from(BIPS_BASE))
            .map(|a| Price::new(a.value()))
    }

    /// Provider-side locked amount for a given taker-side amount:
    /// `taker_locked * (call_percent - 10000) / (10000 - put_percent)`,
    /// floored.
    ///
    /// The denominator is non-zero by the constructor invariant.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn provider_locked_for(self, taker_locked: Amount) -> Result<Amount, DomainError> {
        let numerator = u128::from(self.call_percent.value() - BIPS_BASE);
        let denominator = u128::from(BIPS_BASE - self.put_percent.value());
        taker_locked.mul_div(numerator, denominator)
    }
}

impl fmt::Display for StrikeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.put_percent, self.call_percent)
    }
}
