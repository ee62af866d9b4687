//! Position Aggregate Root
//!
//! The taker side of a paired position. The provider side lives in the
//! provider store and is referenced by [`ProviderRef`]; this aggregate owns
//! the lifecycle Open -> (Settled | Cancelled) -> Withdrawn and the payout
//! state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::positions::errors::PositionError;
use crate::domain::positions::value_objects::{
    SettlementOutcome, SettlementTerms, StrikeRange,
};
use crate::domain::shared::{
    AccountId, Amount, DomainError, DurationSecs, OfferId, PositionId, Price, ProviderPositionId,
    UnixTime,
};

/// Reference to the provider side of a pair.
///
/// The offer id the provider position was minted from is retained so a roll
/// can mint a replacement position at the same terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    /// Provider position id at the provider store.
    pub provider_position_id: ProviderPositionId,
    /// The liquidity offer the provider position was minted from.
    pub offer_id: OfferId,
}

/// Lifecycle status of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    /// Live; locked amounts are committed on both sides.
    Open,
    /// Settled at expiry; `withdrawable` is claimable by the certificate
    /// holder.
    Settled,
    /// Cancelled by mutual agreement; both locked amounts were paid out
    /// directly. Terminal.
    Cancelled,
    /// `withdrawable` has been claimed. Terminal.
    Withdrawn,
}

impl PositionStatus {
    /// Returns true for terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Withdrawn)
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "Open",
            Self::Settled => "Settled",
            Self::Cancelled => "Cancelled",
            Self::Withdrawn => "Withdrawn",
        };
        write!(f, "{s}")
    }
}

/// Command to open a position.
///
/// All fields are sampled/derived by the open use case; the aggregate
/// validates them as a unit.
#[derive(Debug, Clone)]
pub struct OpenPositionCommand {
    /// Provider-side counterparty account.
    pub provider: AccountId,
    /// Reference to the freshly minted provider position.
    pub provider_ref: ProviderRef,
    /// Term length from the provider offer.
    pub duration: DurationSecs,
    /// Oracle price sampled at open.
    pub start_price: Price,
    /// Strike bounds from the provider offer.
    pub strikes: StrikeRange,
    /// Taker-side locked amount.
    pub taker_locked: Amount,
    /// Provider-side locked amount, derived by the strike formula.
    pub provider_locked: Amount,
    /// Open time (caller-supplied).
    pub opened_at: UnixTime,
}

/// The taker side of a paired collar position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    id: PositionId,
    provider: AccountId,
    provider_ref: ProviderRef,
    duration: DurationSecs,
    expiration: UnixTime,
    start_price: Price,
    strikes: StrikeRange,
    taker_locked: Amount,
    provider_locked: Amount,
    status: PositionStatus,
    withdrawable: Amount,
}

impl Position {
    /// Open a position.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if `taker_locked` is zero, the duration is
    /// zero, the id is the reserved "none" id, or the derived strike prices
    /// do not straddle `start_price` strictly.
    pub fn open(id: PositionId, cmd: OpenPositionCommand) -> Result<Self, PositionError> {
        if id.is_none() {
            return Err(PositionError::InvalidParameters {
                field: "id".to_string(),
                message: "position id 0 is reserved".to_string(),
            });
        }
        if cmd.taker_locked.is_zero() {
            return Err(PositionError::InvalidParameters {
                field: "taker_locked".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if cmd.duration.is_zero() {
            return Err(PositionError::InvalidParameters {
                field: "duration".to_string(),
                message: "must be non-zero".to_string(),
            });
        }

        // Rejects degenerate 0-range offers up front so settlement can never
        // divide by zero.
        let put_strike_price = cmd.strikes.put_strike_price(cmd.start_price)?;
        let call_strike_price = cmd.strikes.call_strike_price(cmd.start_price)?;
        if put_strike_price >= cmd.start_price || call_strike_price <= cmd.start_price {
            return Err(PositionError::StrikesNotStraddling {
                put_strike_price,
                call_strike_price,
                start_price: cmd.start_price,
            });
        }

        let expiration = cmd.opened_at.checked_add(cmd.duration)?;

        Ok(Self {
            id,
            provider: cmd.provider,
            provider_ref: cmd.provider_ref,
            duration: cmd.duration,
            expiration,
            start_price: cmd.start_price,
            strikes: cmd.strikes,
            taker_locked: cmd.taker_locked,
            provider_locked: cmd.provider_locked,
            status: PositionStatus::Open,
            withdrawable: Amount::ZERO,
        })
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Position id.
    #[must_use]
    pub const fn id(&self) -> PositionId {
        self.id
    }

    /// Provider-side counterparty account.
    #[must_use]
    pub const fn provider(&self) -> &AccountId {
        &self.provider
    }

    /// Reference to the provider side of the pair.
    #[must_use]
    pub const fn provider_ref(&self) -> &ProviderRef {
        &self.provider_ref
    }

    /// Term length.
    #[must_use]
    pub const fn duration(&self) -> DurationSecs {
        self.duration
    }

    /// Expiration time.
    #[must_use]
    pub const fn expiration(&self) -> UnixTime {
        self.expiration
    }

    /// Oracle price sampled at open.
    #[must_use]
    pub const fn start_price(&self) -> Price {
        self.start_price
    }

    /// Strike bounds.
    #[must_use]
    pub const fn strikes(&self) -> StrikeRange {
        self.strikes
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

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PositionStatus {
        self.status
    }

    /// Amount claimable by the certificate holder after settlement.
    #[must_use]
    pub const fn withdrawable(&self) -> Amount {
        self.withdrawable
    }

    /// Returns true once the caller-supplied time has reached expiration.
    #[must_use]
    pub fn is_expired(&self, now: UnixTime) -> bool {
        now >= self.expiration
    }

    // ========================================================================
    // Settlement math
    // ========================================================================

    /// The pure settlement inputs of this position.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] on arithmetic overflow; the straddle
    /// invariant was established at open.
    pub fn settlement_terms(&self) -> Result<SettlementTerms, DomainError> {
        SettlementTerms::derive(
            self.start_price,
            self.strikes,
            self.taker_locked,
            self.provider_locked,
        )
    }

    /// Preview the payout split at `end_price` without changing state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] on arithmetic overflow.
    pub fn preview_settlement(&self, end_price: Price) -> Result<SettlementOutcome, DomainError> {
        self.settlement_terms()?.settle(end_price)
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    /// Mark the position settled and record the taker-side balance.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::InvalidStateTransition`] unless the position
    /// is `Open`.
    pub fn mark_settled(&mut self, withdrawable: Amount) -> Result<(), PositionError> {
        if self.status != PositionStatus::Open {
            return Err(PositionError::InvalidStateTransition {
                position_id: self.id,
                status: self.status,
                action: "settle",
            });
        }
        self.status = PositionStatus::Settled;
        self.withdrawable = withdrawable;
        Ok(())
    }

    /// Mark the position cancelled.
    ///
    /// Cancellation pays both locked amounts out directly, so no
    /// `withdrawable` is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::InvalidStateTransition`] unless the position
    /// is `Open`.
    pub fn mark_cancelled(&mut self) -> Result<(), PositionError> {
        if self.status != PositionStatus::Open {
            return Err(PositionError::InvalidStateTransition {
                position_id: self.id,
                status: self.status,
                action: "cancel",
            });
        }
        self.status = PositionStatus::Cancelled;
        Ok(())
    }

    /// Claim the settled balance, zeroing it.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::InvalidStateTransition`] unless the position
    /// is `Settled`.
    pub fn mark_withdrawn(&mut self) -> Result<Amount, PositionError> {
        if self.status != PositionStatus::Settled {
            return Err(PositionError::InvalidStateTransition {
                position_id: self.id,
                status: self.status,
                action: "withdraw",
            });
        }
        let amount = self.withdrawable;
        self.status = PositionStatus::Withdrawn;
        self.withdrawable = Amount::ZERO;
        Ok(amount)
    }
}
