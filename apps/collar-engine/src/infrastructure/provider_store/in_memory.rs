//! In-memory provider position store for testing and development.
//!
//! Reference implementation of the provider-side contract: liquidity
//! offers, minted provider positions, and their certificates. All fund
//! movements go through the shared asset ledger so conservation is
//! observable end to end:
//!
//! - minting locks the provider side by moving `provider_locked` from the
//!   offer owner's account into the store's pool account;
//! - settlement moves the delta between the pool and the engine's custody
//!   account and records the provider's withdrawable balance;
//! - cancellation pays the locked amount back to the engine's custody
//!   account, which owes it to the cancelling caller.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{
    AssetLedgerPort, ProviderOffer, ProviderPosition, ProviderPositionStorePort,
    ProviderStoreError,
};
use crate::domain::shared::{
    AccountId, Amount, BasisPoints, DurationSecs, OfferId, PositionId, ProviderPositionId,
    SignedAmount, UnixTime,
};

#[derive(Debug, Clone)]
struct OfferRecord {
    offer: ProviderOffer,
    available: Amount,
}

#[derive(Debug, Clone)]
struct PositionRecord {
    position: ProviderPosition,
    owner: AccountId,
    paired_id: PositionId,
    settled: bool,
    withdrawn: bool,
}

/// In-memory implementation of `ProviderPositionStorePort`.
pub struct InMemoryProviderStore<L: AssetLedgerPort> {
    ledger: Arc<L>,
    pool_account: AccountId,
    engine_account: AccountId,
    offers: RwLock<HashMap<u64, OfferRecord>>,
    positions: RwLock<HashMap<u64, PositionRecord>>,
    next_offer_id: AtomicU64,
    next_position_id: AtomicU64,
}

impl<L: AssetLedgerPort> InMemoryProviderStore<L> {
    /// Create a store settling against `engine_account` and holding locked
    /// funds under `pool_account`.
    pub fn new(ledger: Arc<L>, pool_account: AccountId, engine_account: AccountId) -> Self {
        Self {
            ledger,
            pool_account,
            engine_account,
            offers: RwLock::new(HashMap::new()),
            positions: RwLock::new(HashMap::new()),
            next_offer_id: AtomicU64::new(0),
            next_position_id: AtomicU64::new(0),
        }
    }

    /// Register a liquidity offer (test/dev setup; offer CRUD is not part
    /// of the port surface).
    pub fn create_offer(
        &self,
        provider: &AccountId,
        put_strike_percent: BasisPoints,
        call_strike_percent: BasisPoints,
        duration: DurationSecs,
        available: Amount,
    ) -> OfferId {
        let id = OfferId::new(self.next_offer_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = OfferRecord {
            offer: ProviderOffer {
                offer_id: id,
                provider: provider.clone(),
                put_strike_percent,
                call_strike_percent,
                duration,
            },
            available,
        };
        self.offers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id.value(), record);
        id
    }

    /// Withdrawable balance a provider position has accrued after
    /// settlement (test observability).
    #[must_use]
    pub fn withdrawable_of(&self, id: ProviderPositionId) -> Option<Amount> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        positions.get(&id.value()).map(|record| {
            if record.settled && !record.withdrawn {
                record.position.provider_locked
            } else {
                Amount::ZERO
            }
        })
    }
}

#[async_trait]
impl<L: AssetLedgerPort> ProviderPositionStorePort for InMemoryProviderStore<L> {
    async fn get_offer(&self, offer_id: OfferId) -> Result<ProviderOffer, ProviderStoreError> {
        let offers = self
            .offers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        offers
            .get(&offer_id.value())
            .map(|record| record.offer.clone())
            .ok_or(ProviderStoreError::OfferNotFound { offer_id })
    }

    async fn mint_from_offer(
        &self,
        offer_id: OfferId,
        provider_locked: Amount,
        paired_id: PositionId,
        opened_at: UnixTime,
    ) -> Result<ProviderPositionId, ProviderStoreError> {
        let (offer, expiration) = {
            let mut offers = self
                .offers
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let record = offers
                .get_mut(&offer_id.value())
                .ok_or(ProviderStoreError::OfferNotFound { offer_id })?;
            if record.available < provider_locked {
                return Err(ProviderStoreError::InsufficientOfferLiquidity {
                    offer_id,
                    needed: provider_locked,
                    available: record.available,
                });
            }
            let expiration = opened_at
                .checked_add(record.offer.duration)
                .map_err(|e| ProviderStoreError::Rejected {
                    message: e.to_string(),
                })?;
            record.available = record.available.checked_sub(provider_locked).map_err(|e| {
                ProviderStoreError::Rejected {
                    message: e.to_string(),
                }
            })?;
            (record.offer.clone(), expiration)
        };

        // Lock the provider side: offer owner's funds move into the pool.
        self.ledger
            .transfer(&offer.provider, &self.pool_account, provider_locked)
            .await
            .map_err(|e| ProviderStoreError::Rejected {
                message: e.to_string(),
            })?;

        let id =
            ProviderPositionId::new(self.next_position_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = PositionRecord {
            position: ProviderPosition {
                put_strike_percent: offer.put_strike_percent,
                call_strike_percent: offer.call_strike_percent,
                duration: offer.duration,
                expiration,
                provider_locked,
            },
            owner: offer.provider.clone(),
            paired_id,
            settled: false,
            withdrawn: false,
        };
        self.positions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id.value(), record);

        debug!(
            provider_position_id = %id,
            paired_id = %paired_id,
            provider_locked = %provider_locked,
            "Minted provider position from offer"
        );
        Ok(id)
    }

    async fn get_position(
        &self,
        provider_position_id: ProviderPositionId,
    ) -> Result<ProviderPosition, ProviderStoreError> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        positions
            .get(&provider_position_id.value())
            .map(|record| record.position.clone())
            .ok_or(ProviderStoreError::PositionNotFound {
                provider_position_id,
            })
    }

    async fn settle_position(
        &self,
        provider_position_id: ProviderPositionId,
        delta: SignedAmount,
    ) -> Result<(), ProviderStoreError> {
        let new_locked = {
            let mut positions = self
                .positions
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let record = positions.get_mut(&provider_position_id.value()).ok_or(
                ProviderStoreError::PositionNotFound {
                    provider_position_id,
                },
            )?;
            if record.settled {
                return Err(ProviderStoreError::Rejected {
                    message: format!("provider position {provider_position_id} already settled"),
                });
            }
            let new_locked = record
                .position
                .provider_locked
                .to_signed()
                .and_then(|locked| locked.checked_add(delta))
                .and_then(SignedAmount::to_unsigned)
                .map_err(|e| ProviderStoreError::Rejected {
                    message: e.to_string(),
                })?;
            record.settled = true;
            record.position.provider_locked = new_locked;
            new_locked
        };

        // Move the delta between the engine's custody account and the pool.
        let result = if delta.is_positive() {
            self.ledger
                .transfer(&self.engine_account, &self.pool_account, delta.unsigned_abs())
                .await
        } else {
            self.ledger
                .transfer(&self.pool_account, &self.engine_account, delta.unsigned_abs())
                .await
        };
        result.map_err(|e| ProviderStoreError::Rejected {
            message: e.to_string(),
        })?;

        debug!(
            provider_position_id = %provider_position_id,
            delta = %delta,
            withdrawable = %new_locked,
            "Settled provider position"
        );
        Ok(())
    }

    async fn cancel_and_withdraw(
        &self,
        provider_position_id: ProviderPositionId,
    ) -> Result<Amount, ProviderStoreError> {
        let locked = {
            let mut positions = self
                .positions
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let record = positions.get_mut(&provider_position_id.value()).ok_or(
                ProviderStoreError::PositionNotFound {
                    provider_position_id,
                },
            )?;
            if record.settled || record.withdrawn {
                return Err(ProviderStoreError::Rejected {
                    message: format!(
                        "provider position {provider_position_id} already settled or withdrawn"
                    ),
                });
            }
            record.settled = true;
            record.withdrawn = true;
            record.position.provider_locked
        };

        self.ledger
            .transfer(&self.pool_account, &self.engine_account, locked)
            .await
            .map_err(|e| ProviderStoreError::Rejected {
                message: e.to_string(),
            })?;

        debug!(
            provider_position_id = %provider_position_id,
            amount = %locked,
            "Cancelled provider position and withdrew locked amount"
        );
        Ok(locked)
    }

    async fn owner_of(
        &self,
        provider_position_id: ProviderPositionId,
    ) -> Result<AccountId, ProviderStoreError> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        positions
            .get(&provider_position_id.value())
            .map(|record| record.owner.clone())
            .ok_or(ProviderStoreError::PositionNotFound {
                provider_position_id,
            })
    }

    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        provider_position_id: ProviderPositionId,
    ) -> Result<(), ProviderStoreError> {
        let mut positions = self
            .positions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let record = positions.get_mut(&provider_position_id.value()).ok_or(
            ProviderStoreError::PositionNotFound {
                provider_position_id,
            },
        )?;
        if &record.owner != from {
            return Err(ProviderStoreError::NotOwner {
                provider_position_id,
                account: from.clone(),
            });
        }
        record.owner = to.clone();
        Ok(())
    }
}
