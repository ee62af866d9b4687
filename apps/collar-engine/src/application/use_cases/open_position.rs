//! Open Position Use Case
//!
//! Opens a paired position: authorizes the pair, reads the provider offer,
//! derives the provider-side locked amount, samples the start price, mints
//! the provider side, persists the taker side, issues the taker
//! certificate, and pulls the taker's locked amount into custody.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::application::ports::{
    AssetLedgerPort, AuthorizationRegistryPort, CertificateRegistryPort, PriceOraclePort,
    ProviderPositionStorePort,
};
use crate::config::EngineConfig;
use crate::domain::positions::{
    OpenPositionCommand, Position, PositionError, PositionRepository, ProviderRef, StrikeRange,
};
use crate::domain::shared::{
    AccountId, Amount, OfferId, PositionId, Price, ProviderPositionId, UnixTime,
};

/// Request to open a position.
#[derive(Debug, Clone)]
pub struct OpenPositionRequest {
    /// The taker opening the position.
    pub caller: AccountId,
    /// Quote-asset amount the taker locks.
    pub taker_locked: Amount,
    /// The provider liquidity offer to pair with.
    pub offer_id: OfferId,
    /// Caller-supplied current time.
    pub now: UnixTime,
}

/// Result of opening a position.
#[derive(Debug, Clone)]
pub struct OpenedPosition {
    /// The new taker-side position id.
    pub position_id: PositionId,
    /// The paired provider-side position id.
    pub provider_position_id: ProviderPositionId,
    /// Oracle price sampled at open.
    pub start_price: Price,
    /// Expiration time.
    pub expiration: UnixTime,
    /// Provider-side locked amount derived by the strike formula.
    pub provider_locked: Amount,
}

/// Use case for opening a paired position.
pub struct OpenPositionUseCase<O, S, A, L, C, R>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    A: AuthorizationRegistryPort,
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
{
    oracle: Arc<O>,
    store: Arc<S>,
    authorization: Arc<A>,
    ledger: Arc<L>,
    certificates: Arc<C>,
    positions: Arc<R>,
    config: EngineConfig,
}

impl<O, S, A, L, C, R> OpenPositionUseCase<O, S, A, L, C, R>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    A: AuthorizationRegistryPort,
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
{
    /// Create a new `OpenPositionUseCase`.
    pub const fn new(
        oracle: Arc<O>,
        store: Arc<S>,
        authorization: Arc<A>,
        ledger: Arc<L>,
        certificates: Arc<C>,
        positions: Arc<R>,
        config: EngineConfig,
    ) -> Self {
        Self {
            oracle,
            store,
            authorization,
            ledger,
            certificates,
            positions,
            config,
        }
    }

    /// Execute the open.
    ///
    /// # Errors
    ///
    /// Rejects synchronously, before any state mutation, on an unauthorized
    /// pair, an invalid offer, a zero locked amount, or strikes that do not
    /// straddle the sampled start price. A locked-amount mismatch between
    /// this engine and the provider store is fatal.
    pub async fn execute(&self, request: OpenPositionRequest) -> Result<OpenedPosition, EngineError> {
        if request.taker_locked.is_zero() {
            return Err(PositionError::InvalidParameters {
                field: "taker_locked".to_string(),
                message: "must be positive".to_string(),
            }
            .into());
        }

        let offer = self.store.get_offer(request.offer_id).await?;

        // Both this engine and the chosen provider must be authorized for
        // the pair.
        self.require_authorized(&self.config.engine_account).await?;
        self.require_authorized(&offer.provider).await?;

        if !self.config.duration_in_bounds(offer.duration) {
            return Err(PositionError::InvalidParameters {
                field: "duration".to_string(),
                message: format!("{} outside configured bounds", offer.duration),
            }
            .into());
        }

        let strikes = StrikeRange::new(offer.put_strike_percent, offer.call_strike_percent)
            .map_err(PositionError::from)?;
        let provider_locked = strikes
            .provider_locked_for(request.taker_locked)
            .map_err(PositionError::from)?;
        let start_price = self.oracle.current_price().await?;

        // Reject degenerate bands before any side effect; the aggregate
        // re-verifies this at construction.
        let put_strike_price = strikes.put_strike_price(start_price).map_err(PositionError::from)?;
        let call_strike_price = strikes
            .call_strike_price(start_price)
            .map_err(PositionError::from)?;
        if put_strike_price >= start_price || call_strike_price <= start_price {
            return Err(PositionError::StrikesNotStraddling {
                put_strike_price,
                call_strike_price,
                start_price,
            }
            .into());
        }

        let position_id = self.positions.next_id().await?;
        let provider_position_id = self
            .store
            .mint_from_offer(request.offer_id, provider_locked, position_id, request.now)
            .await?;

        // The store must have locked exactly what the strike formula
        // derived; anything else is a protocol error, not bad input.
        let minted = self.store.get_position(provider_position_id).await?;
        if minted.provider_locked != provider_locked {
            return Err(PositionError::ProviderLockedMismatch {
                position_id,
                expected: provider_locked,
                actual: minted.provider_locked,
            }
            .into());
        }

        let position = Position::open(
            position_id,
            OpenPositionCommand {
                provider: offer.provider.clone(),
                provider_ref: ProviderRef {
                    provider_position_id,
                    offer_id: request.offer_id,
                },
                duration: offer.duration,
                start_price,
                strikes,
                taker_locked: request.taker_locked,
                provider_locked,
                opened_at: request.now,
            },
        )?;
        self.positions.save(&position).await?;
        self.certificates.issue(position_id, &request.caller).await?;

        // Pull the taker's locked amount last, after all state is written.
        self.ledger
            .transfer(&request.caller, &self.config.engine_account, request.taker_locked)
            .await?;

        info!(
            position_id = %position_id,
            provider_position_id = %provider_position_id,
            taker = %request.caller,
            provider = %offer.provider,
            taker_locked = %request.taker_locked,
            provider_locked = %provider_locked,
            start_price = %start_price,
            expiration = %position.expiration(),
            "Opened paired position"
        );

        Ok(OpenedPosition {
            position_id,
            provider_position_id,
            start_price,
            expiration: position.expiration(),
            provider_locked,
        })
    }

    async fn require_authorized(&self, account: &AccountId) -> Result<(), EngineError> {
        let allowed = self
            .authorization
            .can_open_pair(&self.config.pair.underlying, &self.config.pair.cash, account)
            .await?;
        if allowed {
            Ok(())
        } else {
            Err(EngineError::PairNotAuthorized {
                underlying: self.config.pair.underlying.clone(),
                cash: self.config.pair.cash.clone(),
                account: account.clone(),
            })
        }
    }
}
