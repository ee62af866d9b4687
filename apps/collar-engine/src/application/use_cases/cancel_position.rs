//! Cancel Position Use Case
//!
//! Early cancellation by mutual agreement, expressed as dual ownership: the
//! caller must hold both the taker-side and the provider-side certificates.
//! Both locked amounts are paid out directly in one step, bypassing the
//! two-step settle/withdraw split.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::application::ports::{
    AssetLedgerPort, CertificateRegistryPort, ProviderPositionStorePort,
};
use crate::config::EngineConfig;
use crate::domain::positions::{PositionError, PositionRepository};
use crate::domain::shared::{AccountId, Amount, PositionId};

/// Request to cancel a position.
#[derive(Debug, Clone)]
pub struct CancelPositionRequest {
    /// The caller; must hold both certificates of the pair.
    pub caller: AccountId,
    /// The position to cancel.
    pub position_id: PositionId,
}

/// Use case for cancelling a position under dual ownership.
pub struct CancelPositionUseCase<S, L, C, R>
where
    S: ProviderPositionStorePort,
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
{
    store: Arc<S>,
    ledger: Arc<L>,
    certificates: Arc<C>,
    positions: Arc<R>,
    config: EngineConfig,
}

impl<S, L, C, R> CancelPositionUseCase<S, L, C, R>
where
    S: ProviderPositionStorePort,
    L: AssetLedgerPort,
    C: CertificateRegistryPort,
    R: PositionRepository,
{
    /// Create a new `CancelPositionUseCase`.
    pub const fn new(
        store: Arc<S>,
        ledger: Arc<L>,
        certificates: Arc<C>,
        positions: Arc<R>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            certificates,
            positions,
            config,
        }
    }

    /// Execute the cancellation. Returns the total amount paid to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Rejects unless the caller holds both certificates and the position
    /// is still open. A provider withdrawal different from the recorded
    /// locked amount is fatal.
    pub async fn execute(&self, request: CancelPositionRequest) -> Result<Amount, EngineError> {
        let mut position = self.positions.get(request.position_id).await?;
        let provider_position_id = position.provider_ref().provider_position_id;

        let taker_owner = self.certificates.owner_of(request.position_id).await?;
        if taker_owner != request.caller {
            return Err(EngineError::NotCertificateHolder {
                position_id: request.position_id,
                caller: request.caller,
            });
        }
        let provider_owner = self.store.owner_of(provider_position_id).await?;
        if provider_owner != request.caller {
            return Err(EngineError::NotProviderHolder {
                provider_position_id,
                caller: request.caller,
            });
        }

        position.mark_cancelled()?;
        self.positions.save(&position).await?;
        self.certificates.burn(request.position_id).await?;

        let withdrawal = self.store.cancel_and_withdraw(provider_position_id).await?;
        if withdrawal != position.provider_locked() {
            // The provider store disagrees about what was locked; nothing
            // recoverable from here.
            return Err(PositionError::WithdrawalMismatch {
                position_id: request.position_id,
                expected: position.provider_locked(),
                actual: withdrawal,
            }
            .into());
        }

        let total = position
            .taker_locked()
            .checked_add(withdrawal)
            .map_err(PositionError::from)?;
        self.ledger
            .transfer(&self.config.engine_account, &request.caller, total)
            .await?;

        info!(
            position_id = %request.position_id,
            caller = %request.caller,
            total = %total,
            "Cancelled paired position"
        );

        Ok(total)
    }
}
