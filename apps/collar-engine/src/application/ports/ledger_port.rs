//! Asset Ledger Port (Driven Port)
//!
//! Exact-amount debit/credit of the quote asset. The asset is assumed to
//! have no fees, no rebasing, and no reentrancy side effects, so every
//! transfer moves exactly the requested amount or fails.

use async_trait::async_trait;

use crate::domain::shared::{AccountId, Amount};

/// Asset ledger port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The payer cannot cover the transfer.
    #[error("Account {account} cannot pay {needed}: {available} available")]
    InsufficientFunds {
        /// The payer.
        account: AccountId,
        /// Requested amount.
        needed: Amount,
        /// Current balance.
        available: Amount,
    },

    /// The ledger rejected the transfer.
    #[error("Ledger rejected the transfer: {message}")]
    Rejected {
        /// Error details.
        message: String,
    },
}

/// Port for exact-amount asset transfers.
#[async_trait]
pub trait AssetLedgerPort: Send + Sync {
    /// Move exactly `amount` from `from` to `to`. A zero amount is a no-op.
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Current balance of an account.
    async fn balance_of(&self, account: &AccountId) -> Result<Amount, LedgerError>;
}
