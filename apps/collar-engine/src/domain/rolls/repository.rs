//! Roll Offer Repository Trait
//!
//! Defines the persistence abstraction for roll offers.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::aggregate::RollOffer;
use super::errors::RollError;
use crate::domain::shared::RollOfferId;

/// Repository trait for RollOffer persistence.
///
/// Ids are allocated monotonically starting at 1; id 0 is reserved as
/// "none" and is never issued. An id is never reused.
#[async_trait]
pub trait RollOfferRepository: Send + Sync {
    /// Allocate the next roll offer id.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn next_id(&self) -> Result<RollOfferId, RollError>;

    /// Save a roll offer (insert or update).
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save(&self, offer: &RollOffer) -> Result<(), RollError>;

    /// Find a roll offer by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: RollOfferId) -> Result<Option<RollOffer>, RollError>;

    /// Find a roll offer by id, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns [`RollError::NotFound`] when the id is unknown.
    async fn get(&self, id: RollOfferId) -> Result<RollOffer, RollError> {
        self.find_by_id(id)
            .await?
            .ok_or(RollError::NotFound { roll_id: id })
    }
}
