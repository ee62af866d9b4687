//! Execute Roll Use Case
//!
//! Consumes an active roll offer: simulates settlement of the existing
//! position at the current oracle price, cancels the pair (pulling both
//! locked amounts into custody), and opens a replacement position at the
//! same strikes and duration, sized so the new position preserves the same
//! quantity of underlying exposure. All transfer amounts satisfy the
//! conservation identity exactly; the offer is marked inactive before any
//! transfer is issued.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::errors::EngineError;
use crate::application::ports::{
    AssetLedgerPort, CertificateRegistryPort, PriceOraclePort, ProviderPositionStorePort,
};
use crate::config::EngineConfig;
use crate::domain::positions::{
    OpenPositionCommand, Position, PositionError, PositionRepository, PositionStatus, ProviderRef,
};
use crate::domain::rolls::{RollCalculator, RollError, RollOfferRepository, RollPreview};
use crate::domain::shared::{
    AccountId, PositionId, Price, ProviderPositionId, RollOfferId, SignedAmount, UnixTime,
};

/// Request to execute a roll.
#[derive(Debug, Clone)]
pub struct ExecuteRollRequest {
    /// The caller; must hold the taker-side certificate.
    pub caller: AccountId,
    /// The offer to execute.
    pub roll_id: RollOfferId,
    /// Caller-supplied floor on the taker transfer.
    pub min_to_taker: SignedAmount,
    /// Caller-supplied current time.
    pub now: UnixTime,
}

/// Result of a roll execution.
#[derive(Debug, Clone)]
pub struct RollExecution {
    /// The replacement taker-side position.
    pub new_position_id: PositionId,
    /// The replacement provider-side position.
    pub new_provider_position_id: ProviderPositionId,
    /// Net transfer to the taker (negative = taker paid in).
    pub to_taker: SignedAmount,
    /// Net transfer to the provider (negative = provider paid in).
    pub to_provider: SignedAmount,
    /// The price-adjusted roll fee applied.
    pub roll_fee: SignedAmount,
    /// The execution price.
    pub price: Price,
}

/// Use case for previewing and executing rolls.
pub struct ExecuteRollUseCase<O, S, L, C, R, F>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
    F: RollOfferRepository,
{
    oracle: Arc<O>,
    store: Arc<S>,
    ledger: Arc<L>,
    certificates: Arc<C>,
    positions: Arc<R>,
    roll_offers: Arc<F>,
    config: EngineConfig,
}

impl<O, S, L, C, R, F> ExecuteRollUseCase<O, S, L, C, R, F>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
    F: RollOfferRepository,
{
    /// Create a new `ExecuteRollUseCase`.
    pub const fn new(
        oracle: Arc<O>,
        store: Arc<S>,
        ledger: Arc<L>,
        certificates: Arc<C>,
        positions: Arc<R>,
        roll_offers: Arc<F>,
        config: EngineConfig,
    ) -> Self {
        Self {
            oracle,
            store,
            ledger,
            certificates,
            positions,
            roll_offers,
            config,
        }
    }

    /// Compute the roll terms at a hypothetical price, with no validity
    /// checks and no state change.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown offer or position, or on an
    /// arithmetic/conservation failure.
    pub async fn preview(
        &self,
        roll_id: RollOfferId,
        price: Price,
    ) -> Result<RollPreview, EngineError> {
        let offer = self.roll_offers.get(roll_id).await?;
        let position = self.positions.get(offer.taker_id()).await?;
        let preview =
            RollCalculator::preview(&position, &offer, price, self.config.protocol_fee_bips())?;
        debug!(
            roll_id = %roll_id,
            price = %price,
            to_taker = %preview.to_taker,
            to_provider = %preview.to_provider,
            roll_fee = %preview.roll_fee,
            "Previewed roll"
        );
        Ok(preview)
    }

    /// Execute the roll at the current oracle price.
    ///
    /// # Errors
    ///
    /// All preconditions are checked before any state change: offer
    /// active and within its deadline, caller holds the taker certificate,
    /// price within bounds, both transfer floors satisfied. Reconciliation
    /// mismatches with the provider store and conservation failures are
    /// fatal.
    pub async fn execute(&self, request: ExecuteRollRequest) -> Result<RollExecution, EngineError> {
        // ====================================================================
        // Checks
        // ====================================================================
        let mut offer = self.roll_offers.get(request.roll_id).await?;
        if !offer.is_active() {
            return Err(RollError::InvalidStateTransition {
                roll_id: offer.id(),
                status: offer.status(),
                action: "execute",
            }
            .into());
        }
        if request.now > offer.deadline() {
            return Err(RollError::DeadlinePassed {
                roll_id: offer.id(),
                deadline: offer.deadline(),
                now: request.now,
            }
            .into());
        }

        let mut position = self.positions.get(offer.taker_id()).await?;
        if position.status() != PositionStatus::Open {
            return Err(RollError::InvalidParameters {
                field: "taker_id".to_string(),
                message: format!("position {} is {}", position.id(), position.status()),
            }
            .into());
        }
        if position.is_expired(request.now) {
            return Err(RollError::PositionExpired {
                position_id: position.id(),
                expiration: position.expiration(),
                now: request.now,
            }
            .into());
        }

        let taker_owner = self.certificates.owner_of(position.id()).await?;
        if taker_owner != request.caller {
            return Err(EngineError::NotCertificateHolder {
                position_id: position.id(),
                caller: request.caller,
            });
        }

        let price = self.oracle.current_price().await?;
        if price < offer.min_price() || price > offer.max_price() {
            return Err(RollError::PriceOutOfBounds {
                price,
                min_price: offer.min_price(),
                max_price: offer.max_price(),
            }
            .into());
        }

        let preview =
            RollCalculator::preview(&position, &offer, price, self.config.protocol_fee_bips())?;
        if preview.to_taker < request.min_to_taker {
            return Err(RollError::TakerBelowMinimum {
                to_taker: preview.to_taker,
                min_to_taker: request.min_to_taker,
            }
            .into());
        }
        if preview.to_provider < offer.min_to_provider() {
            return Err(RollError::ProviderBelowMinimum {
                to_provider: preview.to_provider,
                min_to_provider: offer.min_to_provider(),
            }
            .into());
        }
        // The replacement must itself be a valid position at the execution
        // price; reject before any effect rather than fail mid-flight.
        if preview.new_taker_locked.is_zero() {
            return Err(RollError::InvalidParameters {
                field: "price".to_string(),
                message: "scaled taker locked amount is zero".to_string(),
            }
            .into());
        }
        let strikes = position.strikes();
        let put_strike = strikes.put_strike_price(price).map_err(RollError::from)?;
        let call_strike = strikes.call_strike_price(price).map_err(RollError::from)?;
        if put_strike >= price || call_strike <= price {
            return Err(PositionError::StrikesNotStraddling {
                put_strike_price: put_strike,
                call_strike_price: call_strike,
                start_price: price,
            }
            .into());
        }

        // ====================================================================
        // Effects: state first, transfers after
        // ====================================================================
        offer.mark_executed()?;
        self.roll_offers.save(&offer).await?;

        // Take the taker certificate into custody for the cancellation leg;
        // the engine already holds the provider certificate.
        self.certificates
            .transfer(&request.caller, &self.config.engine_account, position.id())
            .await?;

        position.mark_cancelled()?;
        self.positions.save(&position).await?;
        self.certificates.burn(position.id()).await?;

        let old_provider_position = position.provider_ref().provider_position_id;
        let withdrawal = self.store.cancel_and_withdraw(old_provider_position).await?;
        if withdrawal != position.provider_locked() {
            return Err(PositionError::WithdrawalMismatch {
                position_id: position.id(),
                expected: position.provider_locked(),
                actual: withdrawal,
            }
            .into());
        }

        // Pull any debits before paying anything out.
        let provider = offer.provider().clone();
        if preview.to_taker.is_negative() {
            self.ledger
                .transfer(
                    &request.caller,
                    &self.config.engine_account,
                    preview.to_taker.unsigned_abs(),
                )
                .await?;
        }
        if preview.to_provider.is_negative() {
            self.ledger
                .transfer(
                    &provider,
                    &self.config.engine_account,
                    preview.to_provider.unsigned_abs(),
                )
                .await?;
        }

        // Open the replacement pair at the same strikes and duration. The
        // engine funds the new provider lock out of the cancelled pot; the
        // mint draws it straight back from the provider.
        let new_position_id = self.positions.next_id().await?;
        let offer_id = position.provider_ref().offer_id;
        self.ledger
            .transfer(&self.config.engine_account, &provider, preview.new_provider_locked)
            .await?;
        let new_provider_position_id = self
            .store
            .mint_from_offer(offer_id, preview.new_provider_locked, new_position_id, request.now)
            .await?;
        let minted = self.store.get_position(new_provider_position_id).await?;
        if minted.provider_locked != preview.new_provider_locked {
            return Err(PositionError::ProviderLockedMismatch {
                position_id: new_position_id,
                expected: preview.new_provider_locked,
                actual: minted.provider_locked,
            }
            .into());
        }

        let new_position = Position::open(
            new_position_id,
            OpenPositionCommand {
                provider: provider.clone(),
                provider_ref: ProviderRef {
                    provider_position_id: new_provider_position_id,
                    offer_id,
                },
                duration: position.duration(),
                start_price: price,
                strikes,
                taker_locked: preview.new_taker_locked,
                provider_locked: preview.new_provider_locked,
                opened_at: request.now,
            },
        )?;
        self.positions.save(&new_position).await?;
        self.certificates.issue(new_position_id, &request.caller).await?;

        // Pay out the credits and the protocol fee last.
        if preview.to_taker.is_positive() {
            self.ledger
                .transfer(
                    &self.config.engine_account,
                    &request.caller,
                    preview.to_taker.unsigned_abs(),
                )
                .await?;
        }
        if preview.to_provider.is_positive() {
            self.ledger
                .transfer(
                    &self.config.engine_account,
                    &provider,
                    preview.to_provider.unsigned_abs(),
                )
                .await?;
        }
        if !preview.protocol_fee.is_zero() {
            self.ledger
                .transfer(
                    &self.config.engine_account,
                    &self.config.protocol.recipient,
                    preview.protocol_fee,
                )
                .await?;
        }

        info!(
            roll_id = %request.roll_id,
            old_position_id = %position.id(),
            new_position_id = %new_position_id,
            new_provider_position_id = %new_provider_position_id,
            price = %price,
            to_taker = %preview.to_taker,
            to_provider = %preview.to_provider,
            roll_fee = %preview.roll_fee,
            protocol_fee = %preview.protocol_fee,
            "Executed roll"
        );

        Ok(RollExecution {
            new_position_id,
            new_provider_position_id,
            to_taker: preview.to_taker,
            to_provider: preview.to_provider,
            roll_fee: preview.roll_fee,
            price,
        })
    }
}
