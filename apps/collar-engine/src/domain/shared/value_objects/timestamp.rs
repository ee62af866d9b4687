//! Time value objects.
//!
//! Expiry and deadline checks are evaluated against a caller-supplied
//! current time; nothing in the domain reads a clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A point in time as Unix seconds (UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTime(i64);

impl UnixTime {
    /// Create a timestamp from Unix seconds.
    #[must_use]
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// Current wall-clock time.
    ///
    /// For adapters and callers only; domain operations take `now` as an
    /// argument.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Get the Unix seconds value.
    #[must_use]
    pub const fn secs(self) -> i64 {
        self.0
    }

    /// The timestamp `duration` after this one.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ArithmeticOverflow`] on overflow.
    pub fn checked_add(self, duration: DurationSecs) -> Result<Self, DomainError> {
        i64::try_from(duration.secs())
            .ok()
            .and_then(|d| self.0.checked_add(d))
            .map(Self)
            .ok_or(DomainError::ArithmeticOverflow { op: "UnixTime::add" })
    }

    /// Interop with chrono for callers that track `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}

impl From<DateTime<Utc>> for UnixTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }
}

/// A duration in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationSecs(u64);

impl DurationSecs {
    /// Create a duration from seconds.
    #[must_use]
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the seconds value.
    #[must_use]
    pub const fn secs(self) -> u64 {
        self.0
    }

    /// Returns true for the zero duration.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DurationSecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
