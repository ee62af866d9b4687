//! Roll errors.

use thiserror::Error;

use crate::domain::positions::PositionError;
use crate::domain::rolls::aggregate::RollOfferStatus;
use crate::domain::shared::{
    DomainError, PositionId, Price, RollOfferId, SignedAmount, UnixTime,
};

/// Errors that can occur when creating, cancelling, or executing rolls.
///
/// `ConservationViolation` is fatal: the transfer amounts stopped summing to
/// the settled amounts, which means the math or a collaborator is broken.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RollError {
    /// Roll offer not found.
    #[error("Roll offer not found: {roll_id}")]
    NotFound {
        /// The missing roll offer id.
        roll_id: RollOfferId,
    },

    /// Invalid offer parameters.
    #[error("Invalid roll offer parameters for '{field}': {message}")]
    InvalidParameters {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Invalid lifecycle transition (cancel or execute a non-active offer).
    #[error("Roll offer {roll_id}: cannot {action} while {status}")]
    InvalidStateTransition {
        /// The roll offer.
        roll_id: RollOfferId,
        /// Current status.
        status: RollOfferStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// Execution price outside the offer's bounds.
    #[error("Execution price {price} outside offer bounds [{min_price}, {max_price}]")]
    PriceOutOfBounds {
        /// Execution price.
        price: Price,
        /// Offer minimum.
        min_price: Price,
        /// Offer maximum.
        max_price: Price,
    },

    /// The offer deadline has passed.
    #[error("Roll offer {roll_id} deadline {deadline} passed (now {now})")]
    DeadlinePassed {
        /// The roll offer.
        roll_id: RollOfferId,
        /// Offer deadline.
        deadline: UnixTime,
        /// Caller-supplied current time.
        now: UnixTime,
    },

    /// The target position has expired; expired positions settle instead of
    /// rolling.
    #[error("Position {position_id} expired at {expiration} (now {now}), cannot roll")]
    PositionExpired {
        /// The target position.
        position_id: PositionId,
        /// Position expiration.
        expiration: UnixTime,
        /// Caller-supplied current time.
        now: UnixTime,
    },

    /// The taker transfer fell below the caller-supplied floor.
    #[error("Roll pays taker {to_taker}, below the requested minimum {min_to_taker}")]
    TakerBelowMinimum {
        /// Computed taker transfer.
        to_taker: SignedAmount,
        /// Caller-supplied floor.
        min_to_taker: SignedAmount,
    },

    /// The provider transfer fell below the offer's floor.
    #[error("Roll pays provider {to_provider}, below the offer minimum {min_to_provider}")]
    ProviderBelowMinimum {
        /// Computed provider transfer.
        to_provider: SignedAmount,
        /// Offer floor.
        min_to_provider: SignedAmount,
    },

    /// The transfer amounts do not sum to the settled amounts. Fatal.
    #[error("Roll conservation violated: outflows {outflows} != settled {inflows}")]
    ConservationViolation {
        /// Sum of transfers, new locked amounts, and the protocol fee.
        outflows: SignedAmount,
        /// Sum of the simulated settled amounts.
        inflows: SignedAmount,
    },

    /// Error from the underlying position math or lifecycle.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// Arithmetic or value-object error.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RollError::NotFound {
            roll_id: RollOfferId::new(5),
        };
        assert_eq!(err.to_string(), "Roll offer not found: 5");

        let err = RollError::PriceOutOfBounds {
            price: Price::new(120),
            min_price: Price::new(90),
            max_price: Price::new(110),
        };
        assert_eq!(
            err.to_string(),
            "Execution price 120 outside offer bounds [90, 110]"
        );

        let err = RollError::TakerBelowMinimum {
            to_taker: SignedAmount::new(-5),
            min_to_taker: SignedAmount::new(0),
        };
        assert!(err.to_string().contains("below the requested minimum"));
    }
}
