//! Provider Position Store Port (Driven Port)
//!
//! Interface to the contract that owns the provider side of every pair:
//! liquidity offers, provider positions, and their ownership certificates.
//! The engine consumes it by its documented contract only and never assumes
//! a concrete representation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{
    AccountId, Amount, BasisPoints, DurationSecs, OfferId, PositionId, ProviderPositionId,
    SignedAmount, UnixTime,
};

/// A provider liquidity offer, as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOffer {
    /// The offer id.
    pub offer_id: OfferId,
    /// The account that created (and funds) the offer.
    pub provider: AccountId,
    /// Put strike bound in basis points.
    pub put_strike_percent: BasisPoints,
    /// Call strike bound in basis points.
    pub call_strike_percent: BasisPoints,
    /// Term length of positions minted from this offer.
    pub duration: DurationSecs,
}

/// A provider-side position, as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPosition {
    /// Put strike bound in basis points.
    pub put_strike_percent: BasisPoints,
    /// Call strike bound in basis points.
    pub call_strike_percent: BasisPoints,
    /// Term length.
    pub duration: DurationSecs,
    /// Expiration time.
    pub expiration: UnixTime,
    /// Provider-side locked amount.
    pub provider_locked: Amount,
}

/// Provider store port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderStoreError {
    /// Offer not found.
    #[error("Provider offer not found: {offer_id}")]
    OfferNotFound {
        /// The missing offer id.
        offer_id: OfferId,
    },

    /// Provider position not found.
    #[error("Provider position not found: {provider_position_id}")]
    PositionNotFound {
        /// The missing provider position id.
        provider_position_id: ProviderPositionId,
    },

    /// The offer cannot cover the requested locked amount.
    #[error("Offer {offer_id} cannot lock {needed}: {available} available")]
    InsufficientOfferLiquidity {
        /// The offer.
        offer_id: OfferId,
        /// Requested locked amount.
        needed: Amount,
        /// Liquidity the offer can draw.
        available: Amount,
    },

    /// Certificate operation attempted by a non-owner.
    #[error("Account {account} does not own provider position {provider_position_id}")]
    NotOwner {
        /// The provider position.
        provider_position_id: ProviderPositionId,
        /// The offending account.
        account: AccountId,
    },

    /// The store rejected the operation.
    #[error("Provider store rejected the operation: {message}")]
    Rejected {
        /// Error details.
        message: String,
    },
}

/// Port for provider-side position CRUD and certificate transfer.
#[async_trait]
pub trait ProviderPositionStorePort: Send + Sync {
    /// Look up a liquidity offer.
    async fn get_offer(&self, offer_id: OfferId) -> Result<ProviderOffer, ProviderStoreError>;

    /// Mint a provider position from an offer, locking `provider_locked` on
    /// the provider's behalf and pairing it with taker position
    /// `paired_id`. `opened_at` is the caller-supplied open time the
    /// expiration is derived from.
    async fn mint_from_offer(
        &self,
        offer_id: OfferId,
        provider_locked: Amount,
        paired_id: PositionId,
        opened_at: UnixTime,
    ) -> Result<ProviderPositionId, ProviderStoreError>;

    /// Look up a provider position.
    async fn get_position(
        &self,
        provider_position_id: ProviderPositionId,
    ) -> Result<ProviderPosition, ProviderStoreError>;

    /// Settle a provider position with the given delta (positive = the
    /// provider gains). The store performs the corresponding exact-amount
    /// ledger movement against the engine's custody account.
    async fn settle_position(
        &self,
        provider_position_id: ProviderPositionId,
        delta: SignedAmount,
    ) -> Result<(), ProviderStoreError>;

    /// Cancel an unsettled provider position, crediting its locked amount
    /// back to the engine's custody account. Returns the amount withdrawn.
    async fn cancel_and_withdraw(
        &self,
        provider_position_id: ProviderPositionId,
    ) -> Result<Amount, ProviderStoreError>;

    /// Current holder of a provider position's certificate.
    async fn owner_of(
        &self,
        provider_position_id: ProviderPositionId,
    ) -> Result<AccountId, ProviderStoreError>;

    /// Transfer a provider position's certificate.
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        provider_position_id: ProviderPositionId,
    ) -> Result<(), ProviderStoreError>;
}
