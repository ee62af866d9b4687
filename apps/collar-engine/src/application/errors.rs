//! Application-level errors.
//!
//! One enum composing the domain and port error types, so every use case
//! returns `Result<_, EngineError>` and precondition failures stay labeled.

use thiserror::Error;

use crate::application::ports::{
    AuthorizationError, CertificateError, LedgerError, OracleError, ProviderStoreError,
};
use crate::domain::positions::PositionError;
use crate::domain::rolls::RollError;
use crate::domain::shared::{AccountId, AssetId, PositionId, ProviderPositionId, RollOfferId};

/// Error returned by engine use cases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The asset pair is not authorized for one of the participants.
    #[error("Pair {underlying}/{cash} not authorized for {account}")]
    PairNotAuthorized {
        /// Underlying asset.
        underlying: AssetId,
        /// Quote asset.
        cash: AssetId,
        /// The unauthorized account.
        account: AccountId,
    },

    /// The caller does not hold the taker-side certificate.
    #[error("Account {caller} does not hold the certificate for position {position_id}")]
    NotCertificateHolder {
        /// The position.
        position_id: PositionId,
        /// The caller.
        caller: AccountId,
    },

    /// The caller does not hold the provider-side certificate.
    #[error("Account {caller} does not hold provider position {provider_position_id}")]
    NotProviderHolder {
        /// The provider position.
        provider_position_id: ProviderPositionId,
        /// The caller.
        caller: AccountId,
    },

    /// The caller did not create the roll offer.
    #[error("Account {caller} is not the provider of roll offer {roll_id}")]
    NotOfferProvider {
        /// The roll offer.
        roll_id: RollOfferId,
        /// The caller.
        caller: AccountId,
    },

    /// Position lifecycle or math error.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// Roll lifecycle or math error.
    #[error(transparent)]
    Roll(#[from] RollError),

    /// Oracle failure.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Provider store failure.
    #[error(transparent)]
    ProviderStore(#[from] ProviderStoreError),

    /// Asset ledger failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Certificate registry failure.
    #[error(transparent)]
    Certificates(#[from] CertificateError),

    /// Authorization registry failure.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
}
