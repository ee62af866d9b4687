//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts. Entity ids are
//! monotonically increasing integers assigned by the repositories, starting
//! at 1; id 0 is reserved as "none".

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_entity_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The reserved "none" id.
            pub const NONE: Self = Self(0);

            /// Create an identifier from a raw value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the raw value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }

            /// Returns true for the reserved "none" id.
            #[must_use]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

macro_rules! define_name_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_entity_id!(PositionId, "Identifier of a taker-side position.");
define_entity_id!(RollOfferId, "Identifier of a roll offer.");
define_entity_id!(
    ProviderPositionId,
    "Identifier of a provider-side position, assigned by the provider store."
);
define_entity_id!(
    OfferId,
    "Identifier of a provider liquidity offer at the provider store."
);

define_name_id!(AccountId, "Identifier of a counterparty or custody account.");
define_name_id!(AssetId, "Identifier of an asset (underlying or quote).");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_none_is_reserved() {
        assert!(PositionId::NONE.is_none());
        assert_eq!(PositionId::NONE.value(), 0);
        assert!(!PositionId::new(1).is_none());
    }

    #[test]
    fn entity_id_display_and_ordering() {
        let a = RollOfferId::new(1);
        let b = RollOfferId::new(2);
        assert!(a < b);
        assert_eq!(format!("{a}"), "1");
    }

    #[test]
    fn name_id_new_and_display() {
        let id = AccountId::new("taker-1");
        assert_eq!(id.as_str(), "taker-1");
        assert_eq!(format!("{id}"), "taker-1");
    }

    #[test]
    fn name_id_equality() {
        assert_eq!(AssetId::new("USDC"), AssetId::from("USDC"));
        assert_ne!(AssetId::new("USDC"), AssetId::new("WETH"));
    }

    #[test]
    fn serde_transparent() {
        let id = PositionId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let id = AccountId::new("provider-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"provider-1\"");
    }
}
