//! Mock price oracle for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{OracleError, PastPrice, PriceOraclePort};
use crate::domain::shared::{Price, UnixTime};

/// Scriptable `PriceOraclePort` implementation.
///
/// Serves a settable current price and optional pinned historical
/// observations; lookups without an observation fall back to the current
/// price, flagged as non-historical.
#[derive(Debug)]
pub struct MockPriceOracle {
    current: RwLock<Price>,
    historical: RwLock<HashMap<i64, Price>>,
}

impl MockPriceOracle {
    /// Create an oracle serving `current` as the current price.
    #[must_use]
    pub fn new(current: Price) -> Self {
        Self {
            current: RwLock::new(current),
            historical: RwLock::new(HashMap::new()),
        }
    }

    /// Change the current price.
    pub fn set_current_price(&self, price: Price) {
        *self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = price;
    }

    /// Pin a historical observation at `at`.
    pub fn set_past_price(&self, at: UnixTime, price: Price) {
        self.historical
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(at.secs(), price);
    }
}

#[async_trait]
impl PriceOraclePort for MockPriceOracle {
    async fn current_price(&self) -> Result<Price, OracleError> {
        let price = *self
            .current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if price.is_zero() {
            return Err(OracleError::ZeroPrice);
        }
        Ok(price)
    }

    async fn past_price_with_fallback(&self, at: UnixTime) -> Result<PastPrice, OracleError> {
        let historical = self
            .historical
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&at.secs())
            .copied();
        match historical {
            Some(price) => Ok(PastPrice {
                price,
                is_historical: true,
            }),
            None => Ok(PastPrice {
                price: self.current_price().await?,
                is_historical: false,
            }),
        }
    }
}
