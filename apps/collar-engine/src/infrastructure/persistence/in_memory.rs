//! In-memory repositories for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::positions::{Position, PositionError, PositionRepository};
use crate::domain::rolls::{RollError, RollOffer, RollOfferRepository};
use crate::domain::shared::{PositionId, RollOfferId};

/// In-memory implementation of `PositionRepository`.
///
/// Ids are allocated from 1; id 0 stays reserved. Suitable for testing and
/// development, not for production use.
#[derive(Debug, Default)]
pub struct InMemoryPositionRepository {
    positions: RwLock<HashMap<u64, Position>>,
    next_id: AtomicU64,
}

impl InMemoryPositionRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of stored positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PositionRepository for InMemoryPositionRepository {
    async fn next_id(&self) -> Result<PositionId, PositionError> {
        Ok(PositionId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn save(&self, position: &Position) -> Result<(), PositionError> {
        let mut positions = self
            .positions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        positions.insert(position.id().value(), position.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PositionId) -> Result<Option<Position>, PositionError> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(positions.get(&id.value()).cloned())
    }
}

/// In-memory implementation of `RollOfferRepository`.
#[derive(Debug, Default)]
pub struct InMemoryRollOfferRepository {
    offers: RwLock<HashMap<u64, RollOffer>>,
    next_id: AtomicU64,
}

impl InMemoryRollOfferRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RollOfferRepository for InMemoryRollOfferRepository {
    async fn next_id(&self) -> Result<RollOfferId, RollError> {
        Ok(RollOfferId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn save(&self, offer: &RollOffer) -> Result<(), RollError> {
        let mut offers = self
            .offers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        offers.insert(offer.id().value(), offer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RollOfferId) -> Result<Option<RollOffer>, RollError> {
        let offers = self
            .offers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(offers.get(&id.value()).cloned())
    }
}
