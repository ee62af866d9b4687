//! Authorization Registry Port (Driven Port)
//!
//! Injected policy object answering "may this account open pairs for this
//! asset pair". Queried at the start of the open operation; the engine
//! never mutates it.

use async_trait::async_trait;

use crate::domain::shared::{AccountId, AssetId};

/// Authorization registry port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    /// The registry could not be reached.
    #[error("Authorization registry unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for pair-authorization checks.
#[async_trait]
pub trait AuthorizationRegistryPort: Send + Sync {
    /// Whether `account` may open positions for the given asset pair.
    async fn can_open_pair(
        &self,
        underlying: &AssetId,
        cash: &AssetId,
        account: &AccountId,
    ) -> Result<bool, AuthorizationError>;
}
