//! Roll preview value object.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Amount, SignedAmount};

/// The computed terms of a roll at a given execution price.
///
/// Transfer amounts are signed: a negative `to_taker`/`to_provider` is a
/// debit the respective party must fund at execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollPreview {
    /// Net transfer to the taker (negative = taker pays).
    pub to_taker: SignedAmount,
    /// Net transfer to the provider (negative = provider pays).
    pub to_provider: SignedAmount,
    /// The price-adjusted roll fee (positive = taker pays provider).
    pub roll_fee: SignedAmount,
    /// Taker-side locked amount of the replacement position.
    pub new_taker_locked: Amount,
    /// Provider-side locked amount of the replacement position.
    pub new_provider_locked: Amount,
    /// Protocol fee charged on the new provider-side locked amount.
    pub protocol_fee: Amount,
    /// Simulated taker balance of the existing position at the execution
    /// price.
    pub taker_settled: Amount,
    /// Simulated provider balance of the existing position at the execution
    /// price.
    pub provider_settled: Amount,
}
