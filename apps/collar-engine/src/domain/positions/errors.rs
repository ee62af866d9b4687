//! Position errors.

use thiserror::Error;

use crate::domain::positions::aggregate::PositionStatus;
use crate::domain::shared::{Amount, DomainError, PositionId, Price, UnixTime};

/// Errors that can occur in the position lifecycle.
///
/// The `ProviderLockedMismatch` and `WithdrawalMismatch` variants are fatal:
/// they indicate the provider store returned something other than what this
/// engine recorded, not a recoverable input problem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// Position not found.
    #[error("Position not found: {position_id}")]
    NotFound {
        /// The missing position id.
        position_id: PositionId,
    },

    /// Invalid open/operation parameters.
    #[error("Invalid position parameters for '{field}': {message}")]
    InvalidParameters {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Derived strike prices do not straddle the start price strictly.
    #[error(
        "Strike prices must straddle the start price: put {put_strike_price} < start {start_price} < call {call_strike_price} required"
    )]
    StrikesNotStraddling {
        /// Derived put strike price.
        put_strike_price: Price,
        /// Derived call strike price.
        call_strike_price: Price,
        /// Start price sampled at open.
        start_price: Price,
    },

    /// Invalid lifecycle transition (settle twice, withdraw before settle, ...).
    #[error("Position {position_id}: cannot {action} while {status}")]
    InvalidStateTransition {
        /// The position.
        position_id: PositionId,
        /// Current status.
        status: PositionStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// Settlement attempted before expiry.
    #[error("Position {position_id} not expired: expiration {expiration}, now {now}")]
    NotExpired {
        /// The position.
        position_id: PositionId,
        /// Expiration time.
        expiration: UnixTime,
        /// Caller-supplied current time.
        now: UnixTime,
    },

    /// The provider store reported a locked amount different from the one
    /// derived at open. Fatal.
    #[error(
        "Provider locked mismatch for position {position_id}: derived {expected}, store reported {actual}"
    )]
    ProviderLockedMismatch {
        /// The position.
        position_id: PositionId,
        /// Amount derived by the strike formula.
        expected: Amount,
        /// Amount reported by the provider store.
        actual: Amount,
    },

    /// Provider-side cancellation returned a different amount than was
    /// locked. Fatal.
    #[error(
        "Withdrawal mismatch for position {position_id}: expected {expected}, provider store returned {actual}"
    )]
    WithdrawalMismatch {
        /// The position.
        position_id: PositionId,
        /// Recorded provider locked amount.
        expected: Amount,
        /// Amount actually returned.
        actual: Amount,
    },

    /// Arithmetic or value-object error in the settlement math.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
