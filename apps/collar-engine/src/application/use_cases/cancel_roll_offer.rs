//! Cancel Roll Offer Use Case
//!
//! Withdraws an active roll offer and returns the deposited provider
//! certificate. Cancellation and execution race on the offer status;
//! whichever transition lands first wins and the other fails cleanly.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::application::ports::ProviderPositionStorePort;
use crate::config::EngineConfig;
use crate::domain::rolls::RollOfferRepository;
use crate::domain::shared::{AccountId, RollOfferId};

/// Request to cancel a roll offer.
#[derive(Debug, Clone)]
pub struct CancelRollOfferRequest {
    /// The caller; must be the offer's provider.
    pub caller: AccountId,
    /// The offer to withdraw.
    pub roll_id: RollOfferId,
}

/// Use case for cancelling a roll offer.
pub struct CancelRollOfferUseCase<S, F>
where
    S: ProviderPositionStorePort,
    F: RollOfferRepository,
{
    store: Arc<S>,
    roll_offers: Arc<F>,
    config: EngineConfig,
}

impl<S, F> CancelRollOfferUseCase<S, F>
where
    S: ProviderPositionStorePort,
    F: RollOfferRepository,
{
    /// Create a new `CancelRollOfferUseCase`.
    pub const fn new(store: Arc<S>, roll_offers: Arc<F>, config: EngineConfig) -> Self {
        Self {
            store,
            roll_offers,
            config,
        }
    }

    /// Execute the cancellation.
    ///
    /// # Errors
    ///
    /// Rejects callers other than the original provider and offers that are
    /// no longer active.
    pub async fn execute(&self, request: CancelRollOfferRequest) -> Result<(), EngineError> {
        let mut offer = self.roll_offers.get(request.roll_id).await?;

        if offer.provider() != &request.caller {
            return Err(EngineError::NotOfferProvider {
                roll_id: request.roll_id,
                caller: request.caller,
            });
        }

        offer.mark_cancelled()?;
        self.roll_offers.save(&offer).await?;

        // Return the deposited provider certificate.
        self.store
            .transfer(
                &self.config.engine_account,
                &request.caller,
                offer.provider_ref().provider_position_id,
            )
            .await?;

        info!(
            roll_id = %request.roll_id,
            provider = %request.caller,
            "Cancelled roll offer"
        );

        Ok(())
    }
}
