//! Settle Position Use Case
//!
//! Settles an expired position from the oracle price at expiry (falling
//! back to the current price when no historical observation exists),
//! records the taker-side balance, and forwards the provider delta to the
//! provider store.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::application::ports::{PriceOraclePort, ProviderPositionStorePort};
use crate::domain::positions::{PositionError, PositionRepository};
use crate::domain::shared::{Amount, PositionId, Price, UnixTime};

/// Request to settle a position.
#[derive(Debug, Clone)]
pub struct SettlePositionRequest {
    /// The position to settle.
    pub position_id: PositionId,
    /// Caller-supplied current time.
    pub now: UnixTime,
}

/// Result of settling a position.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Amount now claimable by the certificate holder.
    pub withdrawable: Amount,
    /// The price the position settled at.
    pub settlement_price: Price,
    /// True when the oracle served the price at expiry; false when it fell
    /// back to the current price.
    pub used_historical_price: bool,
}

/// Use case for settling an expired position.
pub struct SettlePositionUseCase<O, S, R>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    R: PositionRepository,
{
    oracle: Arc<O>,
    store: Arc<S>,
    positions: Arc<R>,
}

impl<O, S, R> SettlePositionUseCase<O, S, R>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    R: PositionRepository,
{
    /// Create a new `SettlePositionUseCase`.
    pub const fn new(oracle: Arc<O>, store: Arc<S>, positions: Arc<R>) -> Self {
        Self {
            oracle,
            store,
            positions,
        }
    }

    /// Execute the settlement.
    ///
    /// Anyone may settle; the payout goes to whoever holds the certificate
    /// at withdrawal time.
    ///
    /// # Errors
    ///
    /// Rejects before expiry and on a second settlement attempt; all state
    /// is written before the provider delta is forwarded.
    pub async fn execute(&self, request: SettlePositionRequest) -> Result<Settlement, EngineError> {
        let mut position = self.positions.get(request.position_id).await?;

        if !position.is_expired(request.now) {
            return Err(PositionError::NotExpired {
                position_id: position.id(),
                expiration: position.expiration(),
                now: request.now,
            }
            .into());
        }

        let past = self
            .oracle
            .past_price_with_fallback(position.expiration())
            .await?;
        let outcome = position
            .preview_settlement(past.price)
            .map_err(PositionError::from)?;

        // A second settle attempt fails here deterministically.
        position.mark_settled(outcome.taker_balance)?;
        self.positions.save(&position).await?;

        self.store
            .settle_position(
                position.provider_ref().provider_position_id,
                outcome.provider_delta,
            )
            .await?;

        info!(
            position_id = %position.id(),
            settlement_price = %past.price,
            used_historical_price = past.is_historical,
            withdrawable = %outcome.taker_balance,
            provider_delta = %outcome.provider_delta,
            "Settled position"
        );

        Ok(Settlement {
            withdrawable: outcome.taker_balance,
            settlement_price: past.price,
            used_historical_price: past.is_historical,
        })
    }
}
