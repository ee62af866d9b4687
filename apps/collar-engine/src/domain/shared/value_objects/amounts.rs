//! Amount and price value objects.
//!
//! All quote-asset quantities are integer base units. Arithmetic in the
//! settlement and roll math is checked: an overflow surfaces as a
//! [`DomainError`] instead of wrapping, and every division floors.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::shared::DomainError;

/// An unsigned quote-asset amount in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a new amount.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw base-unit value.
    #[must_use]
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(DomainError::ArithmeticOverflow { op: "Amount::add" })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] when `rhs > self`.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(DomainError::ArithmeticOverflow { op: "Amount::sub" })
    }

    /// Floor of `self * numerator / denominator`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] if the product overflows
    /// and [`DomainError::DivisionByZero`] if `denominator` is zero.
    pub fn mul_div(self, numerator: u128, denominator: u128) -> Result<Self, DomainError> {
        if denominator == 0 {
            return Err(DomainError::DivisionByZero {
                op: "Amount::mul_div",
            });
        }
        self.0
            .checked_mul(numerator)
            .map(|product| Self(product / denominator))
            .ok_or(DomainError::ArithmeticOverflow {
                op: "Amount::mul_div",
            })
    }

    /// Convert to a signed amount.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] if the value does not fit
    /// in `i128`.
    pub fn to_signed(self) -> Result<SignedAmount, DomainError> {
        i128::try_from(self.0)
            .map(SignedAmount)
            .map_err(|_| DomainError::ArithmeticOverflow {
                op: "Amount::to_signed",
            })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

/// A signed quote-asset flow in base units.
///
/// Used wherever value can move in either direction: settlement deltas,
/// roll fees, and roll transfer amounts. Positive flows toward the named
/// recipient of the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedAmount(i128);

impl SignedAmount {
    /// Zero flow.
    pub const ZERO: Self = Self(0);

    /// Create a new signed amount.
    #[must_use]
    pub const fn new(value: i128) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> i128 {
        self.0
    }

    /// Returns true if this flow is strictly negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if this flow is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if this flow is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Absolute value as an unsigned amount.
    #[must_use]
    pub const fn unsigned_abs(self) -> Amount {
        Amount(self.0.unsigned_abs())
    }

    /// Negation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] for `i128::MIN`.
    pub fn checked_neg(self) -> Result<Self, DomainError> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or(DomainError::ArithmeticOverflow {
                op: "SignedAmount::neg",
            })
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(DomainError::ArithmeticOverflow {
                op: "SignedAmount::add",
            })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(DomainError::ArithmeticOverflow {
                op: "SignedAmount::sub",
            })
    }

    /// Convert to an unsigned amount.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] when negative.
    pub fn to_unsigned(self) -> Result<Amount, DomainError> {
        u128::try_from(self.0)
            .map(Amount)
            .map_err(|_| DomainError::InvalidValue {
                field: "amount".to_string(),
                message: format!("flow {} is negative", self.0),
            })
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for SignedAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SignedAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<i128> for SignedAmount {
    fn from(value: i128) -> Self {
        Self(value)
    }
}

/// An oracle price for the underlying, in quote-asset base units.
///
/// The oracle contract guarantees a non-zero current price; historical
/// prices flow through the same type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u128);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Returns true if this price is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Clamp this price into `[lo, hi]`.
    #[must_use]
    pub fn clamp_to(self, lo: Self, hi: Self) -> Self {
        Self(self.0.clamp(lo.0, hi.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<u128> for Price {
    fn from(value: u128) -> Self {
        Self(value)
    }
}
