//! Strongly-typed identifiers
//!
//! Accounts, transactions and budgets get random UUIDs wrapped in distinct
//! newtypes. Categories and users are keyed by opaque strings: categories by
//! their catalog slug (`cat-groceries`) and users by whatever id the external
//! identity provider hands out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_uuid_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short form shown to users, e.g. `acc-1a2b3c4d`
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }

            /// Whether a user-typed reference (full UUID, short form, or a
            /// bare UUID prefix) points at this ID
            pub fn matches(&self, reference: &str) -> bool {
                let reference = reference.trim().to_lowercase();
                let bare = reference
                    .strip_prefix($display_prefix)
                    .unwrap_or(&reference)
                    .replace('-', "");
                !bare.is_empty() && self.0.simple().to_string().starts_with(&bare)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_uuid_id!(AccountId, "acc-");
define_uuid_id!(TransactionId, "txn-");
define_uuid_id!(BudgetId, "bud-");

macro_rules! define_key_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_key_id!(CategoryId);
define_key_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_display() {
        let id = AccountId::new();
        let display = id.to_string();
        assert!(display.starts_with("acc-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_short_and_full_forms() {
        let id = TransactionId::new();
        assert!(id.matches(&id.short()));
        assert!(id.matches(&id.as_uuid().to_string()));
        assert!(id.matches(&id.short().to_uppercase()));
        assert!(!id.matches("txn-"));
        assert!(!id.matches(""));
    }

    #[test]
    fn test_parse_full_uuid_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: BudgetId = format!("bud-{}", uuid_str).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_key_ids_serialize_as_plain_strings() {
        let cat = CategoryId::from("cat-groceries");
        assert_eq!(serde_json::to_string(&cat).unwrap(), "\"cat-groceries\"");
        let user: UserId = serde_json::from_str("\"uid-42\"").unwrap();
        assert_eq!(user.as_str(), "uid-42");
    }

    #[test]
    fn test_uuid_id_serialization() {
        let id = AccountId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
