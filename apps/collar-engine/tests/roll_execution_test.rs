//! Roll Execution Integration Tests
//!
//! Drives the roll engine end to end with in-memory adapters: offer
//! creation and cancellation, preview/execute agreement, the conservation
//! identity observed at the ledger, slippage floors, price bounds, the
//! deadline, and the cancel/execute race.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use collar_engine::application::ports::{
    AssetLedgerPort, CertificateRegistryPort, ProviderPositionStorePort,
};
use collar_engine::application::use_cases::{
    CancelRollOfferRequest, CancelRollOfferUseCase, CreateRollOfferRequest,
    CreateRollOfferUseCase, ExecuteRollRequest, ExecuteRollUseCase, OpenPositionRequest,
    OpenPositionUseCase, SettlePositionRequest, SettlePositionUseCase, WithdrawRequest,
    WithdrawUseCase,
};
use collar_engine::config::EngineConfig;
use collar_engine::domain::positions::PositionRepository;
use collar_engine::domain::rolls::{RollError, RollOfferRepository, RollOfferStatus};
use collar_engine::{
    AccountId, Amount, BasisPoints, DurationSecs, EngineError, InMemoryAssetLedger,
    InMemoryCertificateRegistry, InMemoryPositionRepository, InMemoryProviderStore,
    InMemoryRollOfferRepository, MockPriceOracle, PositionId, PositionStatus, Price, RollOfferId,
    SignedAmount, StaticAuthorizationRegistry, UnixTime,
};

const OPEN_TIME: UnixTime = UnixTime::new(1_000);
const OFFER_TIME: UnixTime = UnixTime::new(1_050);
const EXECUTE_TIME: UnixTime = UnixTime::new(1_100);
const DEADLINE: UnixTime = UnixTime::new(1_200);

struct Harness {
    config: EngineConfig,
    ledger: Arc<InMemoryAssetLedger>,
    store: Arc<InMemoryProviderStore<InMemoryAssetLedger>>,
    oracle: Arc<MockPriceOracle>,
    positions: Arc<InMemoryPositionRepository>,
    certificates: Arc<InMemoryCertificateRegistry>,
    roll_offers: Arc<InMemoryRollOfferRepository>,
    position_id: PositionId,
}

fn taker() -> AccountId {
    AccountId::new("taker-1")
}

fn provider() -> AccountId {
    AccountId::new("provider-1")
}

impl Harness {
    /// Reference world: takerLocked 1000 against the [9000, 11000] band at
    /// start price 100, with a live position already open.
    async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    async fn with_config(config: EngineConfig) -> Self {
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
                now: OPEN_TIME,
            })
            .await
            .unwrap();

        Self {
            config,
            ledger,
            store,
            oracle,
            positions,
            certificates,
            roll_offers,
            position_id: opened.position_id,
        }
    }

    fn create_use_case(
        &self,
    ) -> CreateRollOfferUseCase<
        MockPriceOracle,
        InMemoryProviderStore<InMemoryAssetLedger>,
        InMemoryPositionRepository,
        InMemoryRollOfferRepository,
    > {
        CreateRollOfferUseCase::new(
            Arc::clone(&self.oracle),
            Arc::clone(&self.store),
            Arc::clone(&self.positions),
            Arc::clone(&self.roll_offers),
            self.config.clone(),
        )
    }

    fn cancel_use_case(
        &self,
    ) -> CancelRollOfferUseCase<
        InMemoryProviderStore<InMemoryAssetLedger>,
        InMemoryRollOfferRepository,
    > {
        CancelRollOfferUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.roll_offers),
            self.config.clone(),
        )
    }

    fn execute_use_case(
        &self,
    ) -> ExecuteRollUseCase<
        MockPriceOracle,
        InMemoryProviderStore<InMemoryAssetLedger>,
        InMemoryAssetLedger,
        InMemoryCertificateRegistry,
        InMemoryPositionRepository,
        InMemoryRollOfferRepository,
    > {
        ExecuteRollUseCase::new(
            Arc::clone(&self.oracle),
            Arc::clone(&self.store),
            Arc::clone(&self.ledger),
            Arc::clone(&self.certificates),
            Arc::clone(&self.positions),
            Arc::clone(&self.roll_offers),
            self.config.clone(),
        )
    }

    /// Standard roll offer: fee 10 @ factor 5000, bounds [90, 110],
    /// provider floor -2000.
    async fn create_standard_offer(&self) -> RollOfferId {
        self.create_use_case()
            .execute(CreateRollOfferRequest {
                caller: provider(),
                position_id: self.position_id,
                fee_amount: SignedAmount::new(10),
                fee_delta_factor_bips: 5_000,
                min_price: Price::new(90),
                max_price: Price::new(110),
                min_to_provider: SignedAmount::new(-2_000),
                deadline: DEADLINE,
                now: OFFER_TIME,
            })
            .await
            .unwrap()
    }

    fn execute_request(&self, roll_id: RollOfferId) -> ExecuteRollRequest {
        ExecuteRollRequest {
            caller: taker(),
            roll_id,
            min_to_taker: SignedAmount::new(-100_000),
            now: EXECUTE_TIME,
        }
    }

    async fn balance(&self, account: &AccountId) -> Amount {
        self.ledger.balance_of(account).await.unwrap()
    }
}

#[tokio::test]
async fn preview_agrees_with_execution() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;
    harness.oracle.set_current_price(Price::new(105));

    let preview = harness
        .execute_use_case()
        .preview(roll_id, Price::new(105))
        .await
        .unwrap();
    let execution = harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    assert_eq!(execution.to_taker, preview.to_taker);
    assert_eq!(execution.to_provider, preview.to_provider);
    assert_eq!(execution.roll_fee, preview.roll_fee);
    assert_eq!(execution.price, Price::new(105));

    // The conservation identity holds exactly.
    let outflows = preview.to_taker.value()
        + preview.to_provider.value()
        + preview.new_taker_locked.to_signed().unwrap().value()
        + preview.new_provider_locked.to_signed().unwrap().value()
        + preview.protocol_fee.to_signed().unwrap().value();
    let inflows = preview.taker_settled.to_signed().unwrap().value()
        + preview.provider_settled.to_signed().unwrap().value();
    assert_eq!(outflows, inflows);
}

#[tokio::test]
async fn roll_up_conserves_funds_at_the_ledger() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;
    harness.oracle.set_current_price(Price::new(110));

    let execution = harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    assert_eq!(execution.to_taker, SignedAmount::new(890));
    assert_eq!(execution.to_provider, SignedAmount::new(-1_090));

    assert_eq!(harness.balance(&taker()).await, Amount::new(9_890));
    assert_eq!(harness.balance(&provider()).await, Amount::new(7_910));
    // Custody holds exactly the new taker lock.
    assert_eq!(
        harness.balance(&harness.config.engine_account).await,
        Amount::new(1_100)
    );
    assert_eq!(harness.ledger.total_supply(), Amount::new(20_000));
}

#[tokio::test]
async fn roll_down_pulls_taker_debit() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;
    harness.oracle.set_current_price(Price::new(90));

    let execution = harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    // Settlement at the put strike: takerSettled 0, providerSettled 2000;
    // replacement scaled to 900/900; fee adjustment truncates to zero.
    assert_eq!(execution.roll_fee, SignedAmount::new(10));
    assert_eq!(execution.to_taker, SignedAmount::new(-910));
    assert_eq!(execution.to_provider, SignedAmount::new(1_110));

    assert_eq!(harness.balance(&taker()).await, Amount::new(8_090));
    assert_eq!(harness.balance(&provider()).await, Amount::new(10_110));
    assert_eq!(
        harness.balance(&harness.config.engine_account).await,
        Amount::new(900)
    );
    assert_eq!(harness.ledger.total_supply(), Amount::new(20_000));

    // The replacement position reflects the new start price.
    let new_position = harness.positions.get(execution.new_position_id).await.unwrap();
    assert_eq!(new_position.start_price(), Price::new(90));
    assert_eq!(new_position.taker_locked(), Amount::new(900));
    assert_eq!(new_position.provider_locked(), Amount::new(900));
}

#[tokio::test]
async fn rolled_position_settles_like_any_other() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;
    harness.oracle.set_current_price(Price::new(110));

    let execution = harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    // The replacement runs a fresh term from the roll time.
    let new_position = harness.positions.get(execution.new_position_id).await.unwrap();
    let expiration = new_position.expiration();
    assert_eq!(
        expiration,
        EXECUTE_TIME.checked_add(DurationSecs::new(300)).unwrap()
    );

    harness.oracle.set_past_price(expiration, Price::new(121));
    let settle = SettlePositionUseCase::new(
        Arc::clone(&harness.oracle),
        Arc::clone(&harness.store),
        Arc::clone(&harness.positions),
    );
    let settlement = settle
        .execute(SettlePositionRequest {
            position_id: execution.new_position_id,
            now: expiration,
        })
        .await
        .unwrap();
    // Call strike of the new position: 110 * 11000 / 10000 = 121.
    assert_eq!(settlement.withdrawable, Amount::new(2_200));

    let withdraw = WithdrawUseCase::new(
        Arc::clone(&harness.ledger),
        Arc::clone(&harness.certificates),
        Arc::clone(&harness.positions),
        harness.config.clone(),
    );
    let amount = withdraw
        .execute(WithdrawRequest {
            caller: taker(),
            position_id: execution.new_position_id,
        })
        .await
        .unwrap();
    assert_eq!(amount, Amount::new(2_200));
    assert_eq!(harness.ledger.total_supply(), Amount::new(20_000));
}

#[tokio::test]
async fn cancel_returns_certificate_and_blocks_execution() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;

    let position = harness.positions.get(harness.position_id).await.unwrap();
    let provider_position_id = position.provider_ref().provider_position_id;

    // Deposited with the engine while active.
    assert_eq!(
        harness.store.owner_of(provider_position_id).await.unwrap(),
        harness.config.engine_account
    );

    harness
        .cancel_use_case()
        .execute(CancelRollOfferRequest {
            caller: provider(),
            roll_id,
        })
        .await
        .unwrap();

    assert_eq!(
        harness.store.owner_of(provider_position_id).await.unwrap(),
        provider()
    );
    assert_eq!(
        harness.roll_offers.get(roll_id).await.unwrap().status(),
        RollOfferStatus::Cancelled
    );

    // The race loser fails cleanly.
    assert!(matches!(
        harness
            .execute_use_case()
            .execute(harness.execute_request(roll_id))
            .await,
        Err(EngineError::Roll(RollError::InvalidStateTransition { .. }))
    ));
}

#[tokio::test]
async fn executed_offer_cannot_be_cancelled() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;

    harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    assert!(matches!(
        harness
            .cancel_use_case()
            .execute(CancelRollOfferRequest {
                caller: provider(),
                roll_id,
            })
            .await,
        Err(EngineError::Roll(RollError::InvalidStateTransition { .. }))
    ));
}

#[tokio::test]
async fn execution_rejects_out_of_bounds_price_and_deadline() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;

    harness.oracle.set_current_price(Price::new(89));
    assert!(matches!(
        harness
            .execute_use_case()
            .execute(harness.execute_request(roll_id))
            .await,
        Err(EngineError::Roll(RollError::PriceOutOfBounds { .. }))
    ));

    harness.oracle.set_current_price(Price::new(100));
    let mut request = harness.execute_request(roll_id);
    request.now = UnixTime::new(1_201);
    assert!(matches!(
        harness.execute_use_case().execute(request).await,
        Err(EngineError::Roll(RollError::DeadlinePassed { .. }))
    ));

    // The offer survives both rejections.
    assert_eq!(
        harness.roll_offers.get(roll_id).await.unwrap().status(),
        RollOfferStatus::Active
    );
}

#[tokio::test]
async fn execution_respects_both_slippage_floors() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;
    harness.oracle.set_current_price(Price::new(110));

    let mut request = harness.execute_request(roll_id);
    request.min_to_taker = SignedAmount::new(891);
    assert!(matches!(
        harness.execute_use_case().execute(request).await,
        Err(EngineError::Roll(RollError::TakerBelowMinimum { .. }))
    ));

    // Tighter provider floor on a fresh offer.
    harness
        .cancel_use_case()
        .execute(CancelRollOfferRequest {
            caller: provider(),
            roll_id,
        })
        .await
        .unwrap();
    harness.oracle.set_current_price(Price::new(100));
    let tight_roll_id = harness
        .create_use_case()
        .execute(CreateRollOfferRequest {
            caller: provider(),
            position_id: harness.position_id,
            fee_amount: SignedAmount::new(10),
            fee_delta_factor_bips: 5_000,
            min_price: Price::new(90),
            max_price: Price::new(110),
            min_to_provider: SignedAmount::new(-1_000),
            deadline: DEADLINE,
            now: OFFER_TIME,
        })
        .await
        .unwrap();
    harness.oracle.set_current_price(Price::new(110));
    assert!(matches!(
        harness
            .execute_use_case()
            .execute(harness.execute_request(tight_roll_id))
            .await,
        Err(EngineError::Roll(RollError::ProviderBelowMinimum { .. }))
    ));
}

#[tokio::test]
async fn protocol_fee_flows_to_the_recipient() {
    let mut config = EngineConfig::default();
    config.protocol.fee_bips = 100;
    let harness = Harness::with_config(config.clone()).await;
    let roll_id = harness.create_standard_offer().await;
    harness.oracle.set_current_price(Price::new(110));

    harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    // 100 bips of the 1100 new provider lock.
    assert_eq!(
        harness.balance(&config.protocol.recipient).await,
        Amount::new(11)
    );
    assert_eq!(harness.ledger.total_supply(), Amount::new(20_000));
}

#[tokio::test]
async fn old_position_is_terminal_after_roll() {
    let harness = Harness::new().await;
    let roll_id = harness.create_standard_offer().await;

    let execution = harness
        .execute_use_case()
        .execute(harness.execute_request(roll_id))
        .await
        .unwrap();

    let old = harness.positions.get(harness.position_id).await.unwrap();
    assert_eq!(old.status(), PositionStatus::Cancelled);

    // The old certificate is gone; the new one belongs to the taker.
    assert!(
        harness
            .certificates
            .owner_of(harness.position_id)
            .await
            .is_err()
    );
    assert_eq!(
        harness
            .certificates
            .owner_of(execution.new_position_id)
            .await
            .unwrap(),
        taker()
    );
}

#[tokio::test]
async fn offer_creation_requires_live_position() {
    let harness = Harness::new().await;

    // Settle the position first.
    let position = harness.positions.get(harness.position_id).await.unwrap();
    harness
        .oracle
        .set_past_price(position.expiration(), Price::new(100));
    SettlePositionUseCase::new(
        Arc::clone(&harness.oracle),
        Arc::clone(&harness.store),
        Arc::clone(&harness.positions),
    )
    .execute(SettlePositionRequest {
        position_id: harness.position_id,
        now: position.expiration(),
    })
    .await
    .unwrap();

    let result = harness
        .create_use_case()
        .execute(CreateRollOfferRequest {
            caller: provider(),
            position_id: harness.position_id,
            fee_amount: SignedAmount::new(10),
            fee_delta_factor_bips: 5_000,
            min_price: Price::new(90),
            max_price: Price::new(110),
            min_to_provider: SignedAmount::new(-2_000),
            deadline: UnixTime::new(2_000),
            now: UnixTime::new(1_400),
        })
        .await;
    assert!(matches!(
        result,
        Err(EngineError::Roll(RollError::InvalidParameters { .. }))
    ));
}
