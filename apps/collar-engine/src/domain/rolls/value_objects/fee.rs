//! Roll fee formula.
//!
//! The fee a taker pays (or receives) to roll adjusts linearly with the
//! price move since the offer was created:
//!
//! ```text
//! change   = |fee_amount| * delta_factor_bips * (price - reference) / reference / 10000
//! roll_fee = fee_amount + change
//! ```
//!
//! evaluated left-to-right in i128 with truncating division. A positive
//! factor moves the fee in the provider's favor as the price rises; the
//! adjustment scales with the magnitude of the base fee, not its sign, so a
//! negative base fee grows more negative when the price moves against the
//! factor.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{BIPS_BASE, DomainError, Price, SignedAmount};

/// Largest permitted `|delta_factor_bips|`.
pub const MAX_FEE_DELTA_FACTOR_BIPS: i64 = BIPS_BASE as i64;

/// The price-sensitivity terms of a roll offer's fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTerms {
    amount: SignedAmount,
    delta_factor_bips: i64,
    reference_price: Price,
}

impl FeeTerms {
    /// Create fee terms.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] when `|delta_factor_bips|`
    /// exceeds 10000 or the reference price is zero.
    pub fn new(
        amount: SignedAmount,
        delta_factor_bips: i64,
        reference_price: Price,
    ) -> Result<Self, DomainError> {
        if delta_factor_bips.abs() > MAX_FEE_DELTA_FACTOR_BIPS {
            return Err(DomainError::InvalidValue {
                field: "delta_factor_bips".to_string(),
                message: format!("|{delta_factor_bips}| exceeds {MAX_FEE_DELTA_FACTOR_BIPS}"),
            });
        }
        if reference_price.is_zero() {
            return Err(DomainError::InvalidValue {
                field: "reference_price".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        Ok(Self {
            amount,
            delta_factor_bips,
            reference_price,
        })
    }

    /// Base fee amount (positive = taker pays provider).
    #[must_use]
    pub const fn amount(self) -> SignedAmount {
        self.amount
    }

    /// Price-sensitivity factor in signed basis points.
    #[must_use]
    pub const fn delta_factor_bips(self) -> i64 {
        self.delta_factor_bips
    }

    /// Oracle price at offer creation.
    #[must_use]
    pub const fn reference_price(self) -> Price {
        self.reference_price
    }

    /// The fee at a given execution price.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] if an intermediate
    /// product overflows i128.
    pub fn roll_fee(self, price: Price) -> Result<SignedAmount, DomainError> {
        let overflow = DomainError::ArithmeticOverflow { op: "roll_fee" };
        let reference = i128::try_from(self.reference_price.value()).map_err(|_| overflow.clone())?;
        let price = i128::try_from(price.value()).map_err(|_| overflow.clone())?;
        let price_change = price.checked_sub(reference).ok_or_else(|| overflow.clone())?;

        let magnitude = i128::try_from(self.amount.value().unsigned_abs())
            .map_err(|_| overflow.clone())?;
        let change = magnitude
            .checked_mul(i128::from(self.delta_factor_bips))
            .and_then(|x| x.checked_mul(price_change))
            .ok_or(overflow)?
            / reference
            / i128::from(BIPS_BASE);

        self.amount.checked_add(SignedAmount::new(change))
    }
}
