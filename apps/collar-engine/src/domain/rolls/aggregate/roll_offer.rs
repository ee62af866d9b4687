//! Roll Offer Aggregate Root
//!
//! A provider's standing offer to replace a live position with a new one at
//! updated terms. Active -> (Cancelled | Executed), terminal either way; an
//! id is never reused. The status field is the arbitration point when a
//! cancellation races an execution: whichever transition is applied first
//! wins and the other fails cleanly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::positions::ProviderRef;
use crate::domain::rolls::errors::RollError;
use crate::domain::rolls::value_objects::FeeTerms;
use crate::domain::shared::{AccountId, PositionId, Price, RollOfferId, SignedAmount, UnixTime};

/// Lifecycle status of a roll offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOfferStatus {
    /// Open for execution.
    Active,
    /// Withdrawn by the provider. Terminal.
    Cancelled,
    /// Consumed by a roll execution. Terminal.
    Executed,
}

impl fmt::Display for RollOfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
            Self::Executed => "Executed",
        };
        write!(f, "{s}")
    }
}

/// Command to create a roll offer.
#[derive(Debug, Clone)]
pub struct CreateRollOfferCommand {
    /// The live position to roll.
    pub taker_id: PositionId,
    /// The provider side of that position (deposited into engine custody).
    pub provider_ref: ProviderRef,
    /// The offering provider.
    pub provider: AccountId,
    /// Fee terms; the reference price is sampled at creation.
    pub fee: FeeTerms,
    /// Lowest execution price the provider accepts.
    pub min_price: Price,
    /// Highest execution price the provider accepts.
    pub max_price: Price,
    /// Floor on the provider transfer at execution.
    pub min_to_provider: SignedAmount,
    /// Latest execution time.
    pub deadline: UnixTime,
    /// Creation time (caller-supplied).
    pub created_at: UnixTime,
}

/// A provider's offer to roll a live position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOffer {
    id: RollOfferId,
    taker_id: PositionId,
    provider_ref: ProviderRef,
    provider: AccountId,
    fee: FeeTerms,
    min_price: Price,
    max_price: Price,
    min_to_provider: SignedAmount,
    deadline: UnixTime,
    status: RollOfferStatus,
}

impl RollOffer {
    /// Create an active roll offer.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::InvalidParameters`] for an inverted price range
    /// or a deadline not in the future. The fee terms were validated at
    /// construction.
    pub fn create(id: RollOfferId, cmd: CreateRollOfferCommand) -> Result<Self, RollError> {
        if id.is_none() {
            return Err(RollError::InvalidParameters {
                field: "id".to_string(),
                message: "roll offer id 0 is reserved".to_string(),
            });
        }
        if cmd.min_price > cmd.max_price {
            return Err(RollError::InvalidParameters {
                field: "min_price".to_string(),
                message: format!("{} exceeds max_price {}", cmd.min_price, cmd.max_price),
            });
        }
        if cmd.deadline <= cmd.created_at {
            return Err(RollError::InvalidParameters {
                field: "deadline".to_string(),
                message: format!("{} is not in the future (now {})", cmd.deadline, cmd.created_at),
            });
        }
        Ok(Self {
            id,
            taker_id: cmd.taker_id,
            provider_ref: cmd.provider_ref,
            provider: cmd.provider,
            fee: cmd.fee,
            min_price: cmd.min_price,
            max_price: cmd.max_price,
            min_to_provider: cmd.min_to_provider,
            deadline: cmd.deadline,
            status: RollOfferStatus::Active,
        })
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Offer id.
    #[must_use]
    pub const fn id(&self) -> RollOfferId {
        self.id
    }

    /// The position this offer targets.
    #[must_use]
    pub const fn taker_id(&self) -> PositionId {
        self.taker_id
    }

    /// The deposited provider side of the pair.
    #[must_use]
    pub const fn provider_ref(&self) -> &ProviderRef {
        &self.provider_ref
    }

    /// The offering provider.
    #[must_use]
    pub const fn provider(&self) -> &AccountId {
        &self.provider
    }

    /// Fee terms.
    #[must_use]
    pub const fn fee(&self) -> FeeTerms {
        self.fee
    }

    /// Lowest acceptable execution price.
    #[must_use]
    pub const fn min_price(&self) -> Price {
        self.min_price
    }

    /// Highest acceptable execution price.
    #[must_use]
    pub const fn max_price(&self) -> Price {
        self.max_price
    }

    /// Floor on the provider transfer.
    #[must_use]
    pub const fn min_to_provider(&self) -> SignedAmount {
        self.min_to_provider
    }

    /// Latest execution time.
    #[must_use]
    pub const fn deadline(&self) -> UnixTime {
        self.deadline
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RollOfferStatus {
        self.status
    }

    /// Returns true while the offer can still be executed or cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RollOfferStatus::Active
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    /// Withdraw the offer.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::InvalidStateTransition`] unless active.
    pub fn mark_cancelled(&mut self) -> Result<(), RollError> {
        if !self.is_active() {
            return Err(RollError::InvalidStateTransition {
                roll_id: self.id,
                status: self.status,
                action: "cancel",
            });
        }
        self.status = RollOfferStatus::Cancelled;
        Ok(())
    }

    /// Consume the offer.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::InvalidStateTransition`] unless active.
    pub fn mark_executed(&mut self) -> Result<(), RollError> {
        if !self.is_active() {
            return Err(RollError::InvalidStateTransition {
                roll_id: self.id,
                status: self.status,
                action: "execute",
            });
        }
        self.status = RollOfferStatus::Executed;
        Ok(())
    }
}
