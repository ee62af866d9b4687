//! Static authorization registry for testing and development.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{AuthorizationError, AuthorizationRegistryPort};
use crate::domain::shared::{AccountId, AssetId};

/// Allow-list implementation of `AuthorizationRegistryPort`.
#[derive(Debug, Default)]
pub struct StaticAuthorizationRegistry {
    allow_all: bool,
    allowed: RwLock<HashSet<(String, String, String)>>,
}

impl StaticAuthorizationRegistry {
    /// Create a registry that denies everything until entries are added.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_all: false,
            allowed: RwLock::new(HashSet::new()),
        }
    }

    /// Create a registry that authorizes every pair and account.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            allowed: RwLock::new(HashSet::new()),
        }
    }

    /// Authorize `account` for the asset pair.
    pub fn allow(&self, underlying: &AssetId, cash: &AssetId, account: &AccountId) {
        self.allowed
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert((
                underlying.as_str().to_string(),
                cash.as_str().to_string(),
                account.as_str().to_string(),
            ));
    }
}

#[async_trait]
impl AuthorizationRegistryPort for StaticAuthorizationRegistry {
    async fn can_open_pair(
        &self,
        underlying: &AssetId,
        cash: &AssetId,
        account: &AccountId,
    ) -> Result<bool, AuthorizationError> {
        if self.allow_all {
            return Ok(true);
        }
        let allowed = self
            .allowed
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(allowed.contains(&(
            underlying.as_str().to_string(),
            cash.as_str().to_string(),
            account.as_str().to_string(),
        )))
    }
}
