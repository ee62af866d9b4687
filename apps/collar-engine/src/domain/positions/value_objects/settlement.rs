//! Settlement math.
//!
//! The payout split of a paired position is a pure, piecewise-linear
//! function of the price movement between open and settlement, clamped to
//! the strike band. Both expiry settlement and roll previews evaluate the
//! same function.

use serde::{Deserialize, Serialize};

use crate::domain::positions::value_objects::StrikeRange;
use crate::domain::shared::{Amount, DomainError, Price, SignedAmount};

/// The immutable inputs of the settlement function.
///
/// Invariant: `put_strike_price < start_price < call_strike_price`, enforced
/// by the constructor so neither branch of [`SettlementTerms::settle`] can
/// divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTerms {
    start_price: Price,
    put_strike_price: Price,
    call_strike_price: Price,
    taker_locked: Amount,
    provider_locked: Amount,
}

/// Result of settling a paired position at a given price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// The taker side's balance after the split.
    pub taker_balance: Amount,
    /// Change to the provider side: positive means the provider gains from
    /// the taker's locked amount, negative means the taker gains from the
    /// provider's.
    pub provider_delta: SignedAmount,
}

impl SettlementTerms {
    /// Derive settlement terms from position fields.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if the derived strike prices do not straddle
    /// `start_price` strictly, or on arithmetic overflow.
    pub fn derive(
        start_price: Price,
        strikes: StrikeRange,
        taker_locked: Amount,
        provider_locked: Amount,
    ) -> Result<Self, DomainError> {
        let put_strike_price = strikes.put_strike_price(start_price)?;
        let call_strike_price = strikes.call_strike_price(start_price)?;
        if put_strike_price >= start_price || call_strike_price <= start_price {
            return Err(DomainError::InvalidValue {
                field: "strikes".to_string(),
                message: format!(
                    "strike prices {put_strike_price}/{call_strike_price} do not straddle start price {start_price}"
                ),
            });
        }
        Ok(Self {
            start_price,
            put_strike_price,
            call_strike_price,
            taker_locked,
            provider_locked,
        })
    }

    /// Put strike price.
    #[must_use]
    pub const fn put_strike_price(&self) -> Price {
        self.put_strike_price
    }

    /// Taker-side locked amount.
    #[must_use]
    pub const fn taker_locked(&self) -> Amount {
        self.taker_locked
    }

    /// Provider-side locked amount.
    #[must_use]
    pub const fn provider_locked(&self) -> Amount {
        self.provider_locked
    }

    /// Call strike price.
    #[must_use]
    pub const fn call_strike_price(&self) -> Price {
        self.call_strike_price
    }

    /// Settle at `end_price`.
    ///
    /// `end_price` is clamped to `[put_strike_price, call_strike_price]`.
    /// Below the start price the provider gains
    /// `taker_locked * (start - end) / (start - put_strike)`; at or above it
    /// the taker gains
    /// `provider_locked * (end - start) / (call_strike - start)`. The split
    /// is zero-sum: `taker_balance - taker_locked == -provider_delta`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow; the
    /// divisions cannot be by zero given the constructor invariant.
    pub fn settle(&self, end_price: Price) -> Result<SettlementOutcome, DomainError> {
        let end = end_price.clamp_to(self.put_strike_price, self.call_strike_price);
        let start = self.start_price.value();

        if end < self.start_price {
            let gain = self.taker_locked.mul_div(
                start - end.value(),
                start - self.put_strike_price.value(),
            )?;
            Ok(SettlementOutcome {
                taker_balance: self.taker_locked.checked_sub(gain)?,
                provider_delta: gain.to_signed()?,
            })
        } else {
            let gain = self.provider_locked.mul_div(
                end.value() - start,
                self.call_strike_price.value() - start,
            )?;
            Ok(SettlementOutcome {
                taker_balance: self.taker_locked.checked_add(gain)?,
                provider_delta: gain.to_signed()?.checked_neg()?,
            })
        }
    }
}
