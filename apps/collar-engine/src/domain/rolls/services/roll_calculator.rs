//! Roll Calculator Service
//!
//! Computes the terms of a roll: a simulated settlement of the existing
//! position at the execution price, replacement locked amounts scaled so
//! the new position preserves the same quantity of underlying exposure, the
//! price-adjusted fee, and the two net transfers. The conservation identity
//!
//! ```text
//! to_taker + to_provider + new_taker_locked + new_provider_locked + protocol_fee
//!     == taker_settled + provider_settled
//! ```
//!
//! is re-verified on every computation; a mismatch aborts the roll.

use crate::domain::positions::Position;
use crate::domain::rolls::aggregate::RollOffer;
use crate::domain::rolls::errors::RollError;
use crate::domain::rolls::value_objects::RollPreview;
use crate::domain::shared::{BIPS_BASE, BasisPoints, Price, SignedAmount};

/// Stateless roll-term computation.
pub struct RollCalculator;

impl RollCalculator {
    /// Compute the roll terms for `position` under `offer` at `price`.
    ///
    /// Pure: no validity checks beyond arithmetic (the execute path layers
    /// deadline/bounds/ownership checks on top), no state change.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::ConservationViolation`] if the computed terms do
    /// not conserve funds, or a [`RollError::Domain`] arithmetic error.
    pub fn preview(
        position: &Position,
        offer: &RollOffer,
        price: Price,
        protocol_fee_bips: BasisPoints,
    ) -> Result<RollPreview, RollError> {
        // 1. Simulated settlement of the existing position.
        let outcome = position.preview_settlement(price)?;
        let taker_settled = outcome.taker_balance;
        let provider_settled = position
            .provider_locked()
            .to_signed()?
            .checked_add(outcome.provider_delta)?
            .to_unsigned()?;

        // 2. Replacement locked amounts at the same strikes.
        let new_taker_locked = position
            .taker_locked()
            .mul_div(price.value(), position.start_price().value())?;
        let new_provider_locked = position.strikes().provider_locked_for(new_taker_locked)?;

        // 3. Protocol fee on the new provider side; no refund of prior fees.
        let protocol_fee = new_provider_locked.mul_div(
            u128::from(protocol_fee_bips.value()),
            u128::from(BIPS_BASE),
        )?;

        // 4. Price-adjusted roll fee.
        let roll_fee = offer.fee().roll_fee(price)?;

        // 5. Net transfers.
        let to_taker = taker_settled
            .to_signed()?
            .checked_sub(new_taker_locked.to_signed()?)?
            .checked_sub(roll_fee)?;
        let to_provider = provider_settled
            .to_signed()?
            .checked_sub(new_provider_locked.to_signed()?)?
            .checked_add(roll_fee)?
            .checked_sub(protocol_fee.to_signed()?)?;

        let preview = RollPreview {
            to_taker,
            to_provider,
            roll_fee,
            new_taker_locked,
            new_provider_locked,
            protocol_fee,
            taker_settled,
            provider_settled,
        };
        Self::verify_conservation(&preview)?;
        Ok(preview)
    }

    /// Re-verify the conservation identity on computed terms.
    fn verify_conservation(preview: &RollPreview) -> Result<(), RollError> {
        let outflows = preview
            .to_taker
            .checked_add(preview.to_provider)?
            .checked_add(preview.new_taker_locked.to_signed()?)?
            .checked_add(preview.new_provider_locked.to_signed()?)?
            .checked_add(preview.protocol_fee.to_signed()?)?;
        let inflows = preview
            .taker_settled
            .to_signed()?
            .checked_add(preview.provider_settled.to_signed()?)?;
        if outflows != inflows {
            return Err(RollError::ConservationViolation { outflows, inflows });
        }
        Ok(())
    }
}
