//! Withdraw Use Case
//!
//! Pays a settled position's balance to the current certificate holder,
//! zeroes it, and destroys the certificate.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::application::ports::{AssetLedgerPort, CertificateRegistryPort};
use crate::config::EngineConfig;
use crate::domain::positions::PositionRepository;
use crate::domain::shared::{AccountId, Amount, PositionId};

/// Request to withdraw a settled position's balance.
#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    /// The caller; must hold the certificate.
    pub caller: AccountId,
    /// The settled position.
    pub position_id: PositionId,
}

/// Use case for withdrawing a settled balance.
pub struct WithdrawUseCase<L, C, R>
where
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
{
    ledger: Arc<L>,
    certificates: Arc<C>,
    positions: Arc<R>,
    config: EngineConfig,
}

impl<L, C, R> WithdrawUseCase<L, C, R>
where
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
{
    /// Create a new `WithdrawUseCase`.
    pub const fn new(
        ledger: Arc<L>,
        certificates: Arc<C>,
        positions: Arc<R>,
        config: EngineConfig,
    ) -> Self {
        Self {
            ledger,
            certificates,
            positions,
            config,
        }
    }

    /// Execute the withdrawal. Returns the amount paid.
    ///
    /// # Errors
    ///
    /// Rejects unless the caller holds the certificate and the position is
    /// settled; a second withdrawal fails deterministically.
    pub async fn execute(&self, request: WithdrawRequest) -> Result<Amount, EngineError> {
        let mut position = self.positions.get(request.position_id).await?;

        let owner = self.certificates.owner_of(request.position_id).await?;
        if owner != request.caller {
            return Err(EngineError::NotCertificateHolder {
                position_id: request.position_id,
                caller: request.caller,
            });
        }

        let amount = position.mark_withdrawn()?;
        self.positions.save(&position).await?;
        self.certificates.burn(request.position_id).await?;

        self.ledger
            .transfer(&self.config.engine_account, &request.caller, amount)
            .await?;

        info!(
            position_id = %request.position_id,
            caller = %request.caller,
            amount = %amount,
            "Withdrew settled balance"
        );

        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CertificateRegistryPort;
    use crate::application::use_cases::open_position::{OpenPositionRequest, OpenPositionUseCase};
    use crate::application::use_cases::settle_position::{
        SettlePositionRequest, SettlePositionUseCase,
    };
    use crate::domain::positions::PositionError;
    use crate::domain::shared::{BasisPoints, DurationSecs, Price, UnixTime};
    use crate::infrastructure::authorization::StaticAuthorizationRegistry;
    use crate::infrastructure::certificates::InMemoryCertificateRegistry;
    use crate::infrastructure::ledger::InMemoryAssetLedger;
    use crate::infrastructure::oracle::MockPriceOracle;
    use crate::infrastructure::persistence::InMemoryPositionRepository;
    use crate::infrastructure::provider_store::InMemoryProviderStore;

    struct World {
        ledger: Arc<InMemoryAssetLedger>,
        certificates: Arc<InMemoryCertificateRegistry>,
        withdraw: WithdrawUseCase<
            InMemoryAssetLedger,
            InMemoryCertificateRegistry,
            InMemoryPositionRepository,
        >,
        position_id: PositionId,
    }

    fn taker() -> AccountId {
        AccountId::new("taker-1")
    }

    // Opens and settles the reference position at price 95: withdrawable 500.
    async fn setup() -> World {
        let config = EngineConfig::default();
        let ledger = Arc::new(InMemoryAssetLedger::new());
        let provider = AccountId::new("provider-1");
        ledger.mint(&taker(), Amount::new(10_000));
        ledger.mint(&provider, Amount::new(10_000));

        let store = Arc::new(InMemoryProviderStore::new(
            Arc::clone(&ledger),
            AccountId::new("provider-pool"),
            config.engine_account.clone(),
        ));
        let offer_id = store.create_offer(
            &provider,
            BasisPoints::new(9_000),
            BasisPoints::new(11_000),
            DurationSecs::new(300),
            Amount::new(5_000),
        );
        let oracle = Arc::new(MockPriceOracle::new(Price::new(100)));
        let positions = Arc::new(InMemoryPositionRepository::new());
        let certificates = Arc::new(InMemoryCertificateRegistry::new());

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

        oracle.set_past_price(opened.expiration, Price::new(95));
        let settle = SettlePositionUseCase::new(
            Arc::clone(&oracle),
            Arc::clone(&store),
            Arc::clone(&positions),
        );
        settle
            .execute(SettlePositionRequest {
                position_id: opened.position_id,
                now: opened.expiration,
            })
            .await
            .unwrap();

        let withdraw = WithdrawUseCase::new(
            Arc::clone(&ledger),
            Arc::clone(&certificates),
            Arc::clone(&positions),
            config,
        );

        World {
            ledger,
            certificates,
            withdraw,
            position_id: opened.position_id,
        }
    }

    #[tokio::test]
    async fn withdraw_pays_certificate_holder() {
        let world = setup().await;
        let amount = world
            .withdraw
            .execute(WithdrawRequest {
                caller: taker(),
                position_id: world.position_id,
            })
            .await
            .unwrap();

        assert_eq!(amount, Amount::new(500));
        // 10_000 - 1_000 locked + 500 withdrawn.
        assert_eq!(
            world.ledger.balance_of(&taker()).await.unwrap(),
            Amount::new(9_500)
        );
    }

    #[tokio::test]
    async fn withdraw_follows_certificate_transfer() {
        let world = setup().await;
        let buyer = AccountId::new("buyer-1");
        world
            .certificates
            .transfer(&taker(), &buyer, world.position_id)
            .await
            .unwrap();

        // Original taker can no longer withdraw.
        assert!(matches!(
            world
                .withdraw
                .execute(WithdrawRequest {
                    caller: taker(),
                    position_id: world.position_id,
                })
                .await,
            Err(EngineError::NotCertificateHolder { .. })
        ));

        let amount = world
            .withdraw
            .execute(WithdrawRequest {
                caller: buyer.clone(),
                position_id: world.position_id,
            })
            .await
            .unwrap();
        assert_eq!(amount, Amount::new(500));
        assert_eq!(
            world.ledger.balance_of(&buyer).await.unwrap(),
            Amount::new(500)
        );
    }

    #[tokio::test]
    async fn withdraw_twice_fails() {
        let world = setup().await;
        let request = WithdrawRequest {
            caller: taker(),
            position_id: world.position_id,
        };
        world.withdraw.execute(request.clone()).await.unwrap();
        assert!(world.withdraw.execute(request).await.is_err());
    }

    #[tokio::test]
    async fn withdraw_unsettled_fails() {
        // A fresh, unsettled position: build a world without settling.
        let config = EngineConfig::default();
        let ledger = Arc::new(InMemoryAssetLedger::new());
        let provider = AccountId::new("provider-1");
        ledger.mint(&taker(), Amount::new(10_000));
        ledger.mint(&provider, Amount::new(10_000));
        let store = Arc::new(InMemoryProviderStore::new(
            Arc::clone(&ledger),
            AccountId::new("provider-pool"),
            config.engine_account.clone(),
        ));
        let offer_id = store.create_offer(
            &provider,
            BasisPoints::new(9_000),
            BasisPoints::new(11_000),
            DurationSecs::new(300),
            Amount::new(5_000),
        );
        let oracle = Arc::new(MockPriceOracle::new(Price::new(100)));
        let positions = Arc::new(InMemoryPositionRepository::new());
        let certificates = Arc::new(InMemoryCertificateRegistry::new());
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

        let withdraw = WithdrawUseCase::new(ledger, certificates, positions, config);
        assert!(matches!(
            withdraw
                .execute(WithdrawRequest {
                    caller: taker(),
                    position_id: opened.position_id,
                })
                .await,
            Err(EngineError::Position(PositionError::InvalidStateTransition { .. }))
        ));
    }
}
