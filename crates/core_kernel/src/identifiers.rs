//! Strongly-typed identifiers for persisted entities
//!
//! Beneficiaries and document types are keyed by database-assigned integers.
//! Wrapping them in newtypes keeps a document type id from being passed where
//! a beneficiary id is expected, while serializing as the bare integer the
//! wire format uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw database key
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw database key
            pub const fn get(self) -> i32 {
                self.0
            }

            /// Name of the entity this identifier belongs to
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> i32 {
                id.0
            }
        }
    };
}

define_id!(DocumentTypeId, "DocumentType");
define_id!(BeneficiaryId, "Beneficiary");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_id_display_is_bare_integer() {
        assert_eq!(BeneficiaryId::new(42).to_string(), "42");
        assert_eq!(DocumentTypeId::new(7).to_string(), "7");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&BeneficiaryId::new(15)).unwrap();
        assert_eq!(json, "15");

        let parsed: DocumentTypeId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, DocumentTypeId::new(3));
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        assert!("abc".parse::<BeneficiaryId>().is_err());
        assert_eq!(" 9 ".parse::<BeneficiaryId>().unwrap().get(), 9);
    }

    #[test]
    fn test_entity_names() {
        assert_eq!(BeneficiaryId::entity(), "Beneficiary");
        assert_eq!(DocumentTypeId::entity(), "DocumentType");
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(raw in any::<i32>()) {
            let id = BeneficiaryId::new(raw);
            prop_assert_eq!(id.to_string().parse::<BeneficiaryId>().unwrap(), id);
        }
    }
}
