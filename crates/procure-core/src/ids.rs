//! Newtype IDs for type-safe identifiers.
//!
//! Remote services are inconsistent about identifier types (the category list
//! may send `{"id": 3}` or `{"id": "3"}`), so every ID deserializes from either
//! a JSON string or a JSON integer and is stored as a string.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Search result identifier (the marketplace ASIN).
    ProductId
);
define_id!(
    /// Reference-data category identifier.
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("B0C1");
        assert_eq!(id.as_str(), "B0C1");
    }

    #[test]
    fn test_id_from_str() {
        let id: CategoryId = "7".into();
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_id_deserializes_from_number() {
        let id: CategoryId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");

        let negative: CategoryId = serde_json::from_str("-1").unwrap();
        assert_eq!(negative.as_str(), "-1");
    }

    #[test]
    fn test_id_deserializes_from_string() {
        let id: ProductId = serde_json::from_str(r#""A1""#).unwrap();
        assert_eq!(id, ProductId::new("A1"));
    }

    #[test]
    fn test_id_rejects_other_json() {
        assert!(serde_json::from_str::<CategoryId>("[1]").is_err());
        assert!(serde_json::from_str::<CategoryId>("null").is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&CategoryId::new("9")).unwrap();
        assert_eq!(json, r#""9""#);
    }
}
