//! Position Repository Trait
//!
//! Defines the persistence abstraction for positions.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::aggregate::Position;
use super::errors::PositionError;
use crate::domain::shared::PositionId;

/// Repository trait for Position persistence.
///
/// Ids are allocated monotonically starting at 1; id 0 is reserved as
/// "none" and is never issued.
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Allocate the next position id.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn next_id(&self) -> Result<PositionId, PositionError>;

    /// Save a position (insert or update).
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save(&self, position: &Position) -> Result<(), PositionError>;

    /// Find a position by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(&self, id: PositionId) -> Result<Option<Position>, PositionError>;

    /// Find a position by id, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::NotFound`] when the id is unknown.
    async fn get(&self, id: PositionId) -> Result<Position, PositionError> {
        self.find_by_id(id)
            .await?
            .ok_or(PositionError::NotFound { position_id: id })
    }
}
