//! Price Oracle Port (Driven Port)
//!
//! Interface for the external price oracle. The oracle never fails to
//! return a non-zero current price; historical prices may be unavailable,
//! in which case the lookup falls back to the current price and says so.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Price, UnixTime};

/// A historical price lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastPrice {
    /// The price to settle at.
    pub price: Price,
    /// True when the oracle served the price at the requested time; false
    /// when it fell back to the current price.
    pub is_historical: bool,
}

/// Oracle port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The oracle could not be reached or returned an unusable answer.
    #[error("Oracle unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The oracle returned a zero price, violating its contract.
    #[error("Oracle returned a zero price")]
    ZeroPrice,
}

/// Port for oracle price queries.
#[async_trait]
pub trait PriceOraclePort: Send + Sync {
    /// Current price of the underlying in quote-asset base units.
    async fn current_price(&self) -> Result<Price, OracleError>;

    /// Price at `at`, falling back to the current price when no historical
    /// observation is available.
    async fn past_price_with_fallback(&self, at: UnixTime) -> Result<PastPrice, OracleError>;
}
