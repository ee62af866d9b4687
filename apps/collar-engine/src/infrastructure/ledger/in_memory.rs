//! In-memory asset ledger for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{AssetLedgerPort, LedgerError};
use crate::domain::shared::{AccountId, Amount};

/// In-memory implementation of `AssetLedgerPort`.
///
/// Exact-amount transfers over a balance map: no fees, no rebasing, no side
/// effects. Unknown accounts have a zero balance.
#[derive(Debug, Default)]
pub struct InMemoryAssetLedger {
    balances: RwLock<HashMap<String, u128>>,
}

impl InMemoryAssetLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
        }
    }

    /// Credit an account out of thin air (test seeding).
    pub fn mint(&self, account: &AccountId, amount: Amount) {
        let mut balances = self
            .balances
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = balances.entry(account.as_str().to_string()).or_insert(0);
        *entry = entry.saturating_add(amount.value());
    }

    /// Sum of all balances. Transfers never change this; conservation tests
    /// assert on it.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        let balances = self
            .balances
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Amount::new(balances.values().sum())
    }
}

#[async_trait]
impl AssetLedgerPort for InMemoryAssetLedger {
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }
        let mut balances = self
            .balances
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let available = balances.get(from.as_str()).copied().unwrap_or(0);
        if available < amount.value() {
            return Err(LedgerError::InsufficientFunds {
                account: from.clone(),
                needed: amount,
                available: Amount::new(available),
            });
        }
        balances.insert(from.as_str().to_string(), available - amount.value());
        let to_balance = balances.get(to.as_str()).copied().unwrap_or(0);
        balances.insert(to.as_str().to_string(), to_balance + amount.value());
        Ok(())
    }

    async fn balance_of(&self, account: &AccountId) -> Result<Amount, LedgerError> {
        let balances = self
            .balances
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(Amount::new(
            balances.get(account.as_str()).copied().unwrap_or(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> AccountId {
        AccountId::new(name)
    }

    #[tokio::test]
    async fn transfer_moves_exact_amounts() {
        let ledger = InMemoryAssetLedger::new();
        ledger.mint(&account("alice"), Amount::new(1_000));

        ledger
            .transfer(&account("alice"), &account("bob"), Amount::new(400))
            .await
            .unwrap();

        assert_eq!(
            ledger.balance_of(&account("alice")).await.unwrap(),
            Amount::new(600)
        );
        assert_eq!(
            ledger.balance_of(&account("bob")).await.unwrap(),
            Amount::new(400)
        );
        assert_eq!(ledger.total_supply(), Amount::new(1_000));
    }

    #[tokio::test]
    async fn transfer_rejects_insufficient_funds() {
        let ledger = InMemoryAssetLedger::new();
        ledger.mint(&account("alice"), Amount::new(100));

        let err = ledger
            .transfer(&account("alice"), &account("bob"), Amount::new(101))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        // Nothing moved.
        assert_eq!(
            ledger.balance_of(&account("alice")).await.unwrap(),
            Amount::new(100)
        );
    }

    #[tokio::test]
    async fn zero_transfer_is_a_no_op() {
        let ledger = InMemoryAssetLedger::new();
        ledger
            .transfer(&account("alice"), &account("bob"), Amount::ZERO)
            .await
            .unwrap();
        assert_eq!(ledger.total_supply(), Amount::ZERO);
    }

    #[tokio::test]
    async fn unknown_account_has_zero_balance() {
        let ledger = InMemoryAssetLedger::new();
        assert_eq!(
            ledger.balance_of(&account("nobody")).await.unwrap(),
            Amount::ZERO
        );
    }
}
