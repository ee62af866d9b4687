//! Create Roll Offer Use Case
//!
//! A provider-side certificate holder proposes replacing a live position at
//! updated terms. The provider certificate is deposited into engine custody
//! (a deposit, not a burn) and the fee reference price is sampled at
//! creation. There is no amendment path: an active offer can only be
//! withdrawn and recreated, so terms cannot shift under a taker mid-
//! evaluation.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::application::ports::{PriceOraclePort, ProviderPositionStorePort};
use crate::config::EngineConfig;
use crate::domain::positions::{PositionRepository, PositionStatus};
use crate::domain::rolls::{
    CreateRollOfferCommand, FeeTerms, RollError, RollOffer, RollOfferRepository,
};
use crate::domain::shared::{
    AccountId, PositionId, Price, RollOfferId, SignedAmount, UnixTime,
};

/// Request to create a roll offer.
#[derive(Debug, Clone)]
pub struct CreateRollOfferRequest {
    /// The caller; must hold the provider-side certificate.
    pub caller: AccountId,
    /// The live position to roll.
    pub position_id: PositionId,
    /// Base fee (positive = taker pays provider).
    pub fee_amount: SignedAmount,
    /// Fee price-sensitivity in signed basis points, `|factor| <= 10000`.
    pub fee_delta_factor_bips: i64,
    /// Lowest acceptable execution price.
    pub min_price: Price,
    /// Highest acceptable execution price.
    pub max_price: Price,
    /// Floor on the provider transfer at execution.
    pub min_to_provider: SignedAmount,
    /// Latest execution time.
    pub deadline: UnixTime,
    /// Caller-supplied current time.
    pub now: UnixTime,
}

/// Use case for creating a roll offer.
pub struct CreateRollOfferUseCase<O, S, R, F>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    R: PositionRepository,
    F: RollOfferRepository,
{
    oracle: Arc<O>,
    store: Arc<S>,
    positions: Arc<R>,
    roll_offers: Arc<F>,
    config: EngineConfig,
}

impl<O, S, R, F> CreateRollOfferUseCase<O, S, R, F>
where
    O: PriceOraclePort,
    S: ProviderPositionStorePort,
    R: PositionRepository,
    F: RollOfferRepository,
{
    /// Create a new `CreateRollOfferUseCase`.
    pub const fn new(
        oracle: Arc<O>,
        store: Arc<S>,
        positions: Arc<R>,
        roll_offers: Arc<F>,
        config: EngineConfig,
    ) -> Self {
        Self {
            oracle,
            store,
            positions,
            roll_offers,
            config,
        }
    }

    /// Execute the offer creation.
    ///
    /// # Errors
    ///
    /// Rejects for a settled or expired target position, a caller that does
    /// not hold the provider certificate, an inverted price range, a factor
    /// above 10000, or a deadline not in the future.
    pub async fn execute(
        &self,
        request: CreateRollOfferRequest,
    ) -> Result<RollOfferId, EngineError> {
        let position = self.positions.get(request.position_id).await?;
        let provider_position_id = position.provider_ref().provider_position_id;

        if position.status() != PositionStatus::Open {
            return Err(RollError::InvalidParameters {
                field: "position_id".to_string(),
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

        let provider_owner = self.store.owner_of(provider_position_id).await?;
        if provider_owner != request.caller {
            return Err(EngineError::NotProviderHolder {
                provider_position_id,
                caller: request.caller,
            });
        }

        let fee_reference_price = self.oracle.current_price().await?;
        let fee = FeeTerms::new(
            request.fee_amount,
            request.fee_delta_factor_bips,
            fee_reference_price,
        )
        .map_err(RollError::from)?;

        let roll_id = self.roll_offers.next_id().await?;
        let offer = RollOffer::create(
            roll_id,
            CreateRollOfferCommand {
                taker_id: request.position_id,
                provider_ref: position.provider_ref().clone(),
                provider: request.caller.clone(),
                fee,
                min_price: request.min_price,
                max_price: request.max_price,
                min_to_provider: request.min_to_provider,
                deadline: request.deadline,
                created_at: request.now,
            },
        )?;
        self.roll_offers.save(&offer).await?;

        // Deposit the provider certificate into engine custody.
        self.store
            .transfer(&request.caller, &self.config.engine_account, provider_position_id)
            .await?;

        info!(
            roll_id = %roll_id,
            position_id = %request.position_id,
            provider = %request.caller,
            fee_amount = %request.fee_amount,
            fee_delta_factor_bips = request.fee_delta_factor_bips,
            fee_reference_price = %fee_reference_price,
            deadline = %request.deadline,
            "Created roll offer"
        );

        Ok(roll_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::open_position::{OpenPositionRequest, OpenPositionUseCase};
    use crate::domain::shared::{Amount, BasisPoints, DurationSecs};
    use crate::infrastructure::authorization::StaticAuthorizationRegistry;
    use crate::infrastructure::certificates::InMemoryCertificateRegistry;
    use crate::infrastructure::ledger::InMemoryAssetLedger;
    use crate::infrastructure::oracle::MockPriceOracle;
    use crate::infrastructure::persistence::{
        InMemoryPositionRepository, InMemoryRollOfferRepository,
    };
    use crate::infrastructure::provider_store::InMemoryProviderStore;
    use crate::domain::rolls::RollOfferStatus;

    struct World {
        store: Arc<InMemoryProviderStore<InMemoryAssetLedger>>,
        roll_offers: Arc<InMemoryRollOfferRepository>,
        create: CreateRollOfferUseCase<
            MockPriceOracle,
            InMemoryProviderStore<InMemoryAssetLedger>,
            InMemoryPositionRepository,
            InMemoryRollOfferRepository,
        >,
        position_id: PositionId,
        provider_position_id: crate::domain::shared::ProviderPositionId,
        expiration: UnixTime,
    }

    fn taker() -> AccountId {
        AccountId::new("taker-1")
    }

    fn provider() -> AccountId {
        AccountId::new("provider-1")
    }

    async fn setup() -> World {
        let config = EngineConfig::default();
        let ledger = Arc::new(InMemoryAssetLedger::new());
        ledger.mint(&taker(), Amount::new(10_000));
        ledger.mint(&provider(), Amount::new(10_000));

        let store = Arc::new(InMemoryProviderStore::new(
            Arc::clone(&ledger),
            AccountId::new("provider-pool"),
            config.engine_account.clone(),
        ));
        let offer_id = store.create_offer(
            &provider(),
            BasisPoints::new(9_000),
            BasisPoints::new(11_000),
            DurationSecs::new(300),
            Amount::new(5_000),
        );
        let oracle = Arc::new(MockPriceOracle::new(Price::new(100)));
        let positions = Arc::new(InMemoryPositionRepository::new());
        let certificates = Arc::new(InMemoryCertificateRegistry::new());
        let roll_offers = Arc::new(InMemoryRollOfferRepository::new());

        let open = OpenPositionUseCase::new(
            Arc::clone(&oracle),
            Arc::clone(&store),
            Arc::new(StaticAuthorizationRegistry::allow_all()),
            Arc::clone(&ledger),
            Arc::clone(&certificates),
            Arc::clone(&positions),
            config.clone(),
        );
        let opened = open
            .execute(OpenPositionRequest {
                caller: taker(),
                taker_locked: Amount::new(1_000),
                offer_id,
                now: UnixTime::new(1_000),
            })
            .await
            .unwrap();

        let create = CreateRollOfferUseCase::new(
            Arc::clone(&oracle),
            Arc::clone(&store),
            Arc::clone(&positions),
            Arc::clone(&roll_offers),
            config,
        );

        World {
            store,
            roll_offers,
            create,
            position_id: opened.position_id,
            provider_position_id: opened.provider_position_id,
            expiration: opened.expiration,
        }
    }

    fn create_request(world: &World) -> CreateRollOfferRequest {
        CreateRollOfferRequest {
            caller: provider(),
            position_id: world.position_id,
            fee_amount: SignedAmount::new(10),
            fee_delta_factor_bips: 5_000,
            min_price: Price::new(90),
            max_price: Price::new(110),
            min_to_provider: SignedAmount::new(-2_000),
            deadline: UnixTime::new(1_200),
            now: UnixTime::new(1_100),
        }
    }

    #[tokio::test]
    async fn create_deposits_provider_certificate() {
        let world = setup().await;
        let roll_id = world.create.execute(create_request(&world)).await.unwrap();

        assert_eq!(roll_id, RollOfferId::new(1));
        let offer = world.roll_offers.get(roll_id).await.unwrap();
        assert_eq!(offer.status(), RollOfferStatus::Active);
        assert_eq!(offer.fee().reference_price(), Price::new(100));

        // Certificate now held by the engine.
        assert_eq!(
            world.store.owner_of(world.provider_position_id).await.unwrap(),
            EngineConfig::default().engine_account
        );
    }

    #[tokio::test]
    async fn create_by_non_provider_fails() {
        let world = setup().await;
        let mut request = create_request(&world);
        request.caller = taker();
        assert!(matches!(
            world.create.execute(request).await,
            Err(EngineError::NotProviderHolder { .. })
        ));
    }

    #[tokio::test]
    async fn create_for_expired_position_fails() {
        let world = setup().await;
        let mut request = create_request(&world);
        request.now = world.expiration;
        request.deadline = world.expiration.checked_add(DurationSecs::new(100)).unwrap();
        assert!(matches!(
            world.create.execute(request).await,
            Err(EngineError::Roll(RollError::PositionExpired { .. }))
        ));
    }

    #[tokio::test]
    async fn create_with_excessive_factor_fails() {
        let world = setup().await;
        let mut request = create_request(&world);
        request.fee_delta_factor_bips = 10_001;
        assert!(matches!(
            world.create.execute(request).await,
            Err(EngineError::Roll(RollError::Domain(_)))
        ));
    }

    #[tokio::test]
    async fn create_with_inverted_bounds_fails() {
        let world = setup().await;
        let mut request = create_request(&world);
        request.min_price = Price::new(120);
        assert!(matches!(
            world.create.execute(request).await,
            Err(EngineError::Roll(RollError::InvalidParameters { .. }))
        ));
    }

    #[tokio::test]
    async fn create_with_past_deadline_fails() {
        let world = setup().await;
        let mut request = create_request(&world);
        request.deadline = request.now;
        assert!(world.create.execute(request).await.is_err());
    }
}
