//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout regtrace.
//! Each identifier is a distinct type: you cannot pass a [`TestId`]
//! where a [`ComponentId`] is expected.
//!
//! ## Validation
//!
//! Every identifier is a trimmed, non-empty string. Validation happens at
//! construction time and again on deserialization (`#[serde(try_from)]`),
//! so a record loaded from JSON or YAML cannot smuggle in an empty id.
//!
//! Component, test and document identifiers are symbolic codes such as
//! `LPG_TANK`, `TEST_LEAK` or `DOC_LABELING`. Their vocabulary is open:
//! the advisor may propose codes outside the keyword tables.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyIdentifier`] if the value is
            /// empty after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Access the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_identifier!(
    /// Identifier of a regulation version, e.g. `EU-BATT-2025-V2`.
    RegulationId,
    "regulation id"
);

string_identifier!(
    /// Identifier of an atomic requirement, e.g. `REQ_EU_0001`.
    RequirementId,
    "requirement id"
);

string_identifier!(
    /// Symbolic code of a physical or logical component, e.g. `LPG_TANK`.
    ComponentId,
    "component id"
);

string_identifier!(
    /// Symbolic code of a validation test, e.g. `TEST_LEAK`.
    TestId,
    "test id"
);

string_identifier!(
    /// Symbolic code of a deliverable document, e.g. `DOC_LABELING`.
    DocumentId,
    "document id"
);

string_identifier!(
    /// Identifier of a product, e.g. `VEH-EV-01`.
    ProductId,
    "product id"
);

impl ComponentId {
    /// Code used when a requirement concerns the product as a whole but no
    /// specific component could be identified.
    pub const UNSPECIFIED: &'static str = "UNSPECIFIED_COMPONENT";

    /// The `UNSPECIFIED_COMPONENT` sentinel.
    pub fn unspecified() -> Self {
        Self(Self::UNSPECIFIED.to_string())
    }

    /// Whether this is the `UNSPECIFIED_COMPONENT` sentinel.
    pub fn is_unspecified(&self) -> bool {
        self.0 == Self::UNSPECIFIED
    }
}

impl RequirementId {
    /// Build the conventional requirement id for a market and sequence
    /// number: `REQ_{market}_{counter:04}`.
    pub fn sequential(market: &crate::Market, counter: u32) -> Self {
        Self(format!("REQ_{}_{:04}", market.as_str(), counter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_trims_whitespace() {
        let id = ComponentId::new("  LPG_TANK \n").unwrap();
        assert_eq!(id.as_str(), "LPG_TANK");
    }

    #[test]
    fn empty_identifier_rejected() {
        let err = TestId::new("   ").unwrap_err();
        assert_eq!(err, ValidationError::EmptyIdentifier { kind: "test id" });
    }

    #[test]
    fn identifier_display_is_raw_value() {
        let id = RegulationId::new("EU-BATT-2025-V2").unwrap();
        assert_eq!(format!("{id}"), "EU-BATT-2025-V2");
    }

    #[test]
    fn identifier_serializes_as_plain_string() {
        let id = DocumentId::new("DOC_LABELING").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"DOC_LABELING\"");
    }

    #[test]
    fn identifier_deserialization_validates() {
        let ok: RequirementId = serde_json::from_str("\"REQ_EU_0001\"").unwrap();
        assert_eq!(ok.as_str(), "REQ_EU_0001");
        assert!(serde_json::from_str::<RequirementId>("\"\"").is_err());
        assert!(serde_json::from_str::<RequirementId>("\"  \"").is_err());
    }

    #[test]
    fn unspecified_component_sentinel() {
        let sentinel = ComponentId::unspecified();
        assert!(sentinel.is_unspecified());
        assert_eq!(sentinel.as_str(), "UNSPECIFIED_COMPONENT");
        assert!(!ComponentId::new("LPG_TANK").unwrap().is_unspecified());
    }

    #[test]
    fn sequential_requirement_id_is_zero_padded() {
        let market = crate::Market::new("EU").unwrap();
        assert_eq!(RequirementId::sequential(&market, 1).as_str(), "REQ_EU_0001");
        assert_eq!(RequirementId::sequential(&market, 123).as_str(), "REQ_EU_0123");
    }

    #[test]
    fn identifiers_order_lexicographically() {
        let a = TestId::new("TEST_FIRE").unwrap();
        let b = TestId::new("TEST_LEAK").unwrap();
        assert!(a < b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn non_blank_identifiers_are_trimmed(core in "[A-Z_]{1,24}", pad in "[ \t]{0,3}") {
            let id = TestId::new(format!("{pad}{core}{pad}")).unwrap();
            prop_assert_eq!(id.as_str(), core.as_str());
        }

        #[test]
        fn blank_identifiers_never_construct(blank in "[ \t\n]{0,8}") {
            prop_assert!(ComponentId::new(blank).is_err());
        }
    }
}
