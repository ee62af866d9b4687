//! In-memory certificate registry for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{CertificateError, CertificateRegistryPort};
use crate::domain::shared::{AccountId, PositionId};

/// In-memory implementation of `CertificateRegistryPort`.
///
/// A plain id -> owner map; transfer is first-class and burn removes the
/// entry permanently.
#[derive(Debug, Default)]
pub struct InMemoryCertificateRegistry {
    owners: RwLock<HashMap<u64, AccountId>>,
}

impl InMemoryCertificateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CertificateRegistryPort for InMemoryCertificateRegistry {
    async fn issue(
        &self,
        position_id: PositionId,
        owner: &AccountId,
    ) -> Result<(), CertificateError> {
        let mut owners = self
            .owners
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if owners.contains_key(&position_id.value()) {
            return Err(CertificateError::AlreadyIssued { position_id });
        }
        owners.insert(position_id.value(), owner.clone());
        Ok(())
    }

    async fn owner_of(&self, position_id: PositionId) -> Result<AccountId, CertificateError> {
        let owners = self
            .owners
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        owners
            .get(&position_id.value())
            .cloned()
            .ok_or(CertificateError::NotFound { position_id })
    }

    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        position_id: PositionId,
    ) -> Result<(), CertificateError> {
        let mut owners = self
            .owners
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let owner = owners
            .get(&position_id.value())
            .ok_or(CertificateError::NotFound { position_id })?;
        if owner != from {
            return Err(CertificateError::NotOwner {
                position_id,
                account: from.clone(),
            });
        }
        owners.insert(position_id.value(), to.clone());
        Ok(())
    }

    async fn burn(&self, position_id: PositionId) -> Result<(), CertificateError> {
        let mut owners = self
            .owners
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        owners
            .remove(&position_id.value())
            .map(|_| ())
            .ok_or(CertificateError::NotFound { position_id })
    }
}
