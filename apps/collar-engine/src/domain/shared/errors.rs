//! Shared domain errors.

use thiserror::Error;

/// Errors produced by domain value objects and pure math.
///
/// These are independent of any port or infrastructure concern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Checked arithmetic overflowed (or underflowed).
    #[error("Arithmetic overflow in {op}")]
    ArithmeticOverflow {
        /// The operation that overflowed.
        op: &'static str,
    },

    /// Division by zero.
    #[error("Division by zero in {op}")]
    DivisionByZero {
        /// The operation that divided by zero.
        op: &'static str,
    },
}
