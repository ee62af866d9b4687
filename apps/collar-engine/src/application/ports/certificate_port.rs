//! Certificate Registry Port (Driven Port)
//!
//! Explicit ownership registry for taker-side position certificates:
//! id -> current owner, with transfer as a first-class operation. Whoever
//! holds a certificate at settlement time is entitled to the position's
//! withdrawable balance.

use async_trait::async_trait;

use crate::domain::shared::{AccountId, PositionId};

/// Certificate registry port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CertificateError {
    /// A certificate already exists for this position.
    #[error("Certificate already issued for position {position_id}")]
    AlreadyIssued {
        /// The position.
        position_id: PositionId,
    },

    /// No live certificate for this position.
    #[error("No certificate for position {position_id}")]
    NotFound {
        /// The position.
        position_id: PositionId,
    },

    /// Transfer attempted by a non-owner.
    #[error("Account {account} does not hold the certificate for position {position_id}")]
    NotOwner {
        /// The position.
        position_id: PositionId,
        /// The offending account.
        account: AccountId,
    },
}

/// Port for taker-side certificate custody.
#[async_trait]
pub trait CertificateRegistryPort: Send + Sync {
    /// Issue a certificate for a freshly opened position.
    async fn issue(&self, position_id: PositionId, owner: &AccountId)
    -> Result<(), CertificateError>;

    /// Current certificate holder.
    async fn owner_of(&self, position_id: PositionId) -> Result<AccountId, CertificateError>;

    /// Transfer a certificate between accounts.
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        position_id: PositionId,
    ) -> Result<(), CertificateError>;

    /// Destroy a certificate after withdrawal or cancellation.
    async fn burn(&self, position_id: PositionId) -> Result<(), CertificateError>;
}
