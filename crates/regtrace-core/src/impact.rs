//! # Impacts
//!
//! An [`Impact`] is the structured consequence of one requirement on the
//! vehicle: which components, tests and documents it touches, how critical
//! it is, and what validation work is recommended.
//!
//! There is exactly one current impact per requirement. Recomputing it
//! overwrites the previous value.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{ComponentId, DocumentId, RequirementId, TestId};
use crate::product::Product;

/// Three-tier severity classification driving validation rigor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Criticality {
    /// Safety-relevant: leak, fire, explosion, crash, hazard.
    High,
    /// Performance or robustness: pressure, temperature, durability.
    Medium,
    /// Documentation and marking.
    Low,
}

impl Criticality {
    /// Return all criticality levels, most severe first.
    pub fn all() -> &'static [Criticality] {
        &[Self::High, Self::Medium, Self::Low]
    }

    /// Canonical uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Criticality {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(ValidationError::UnknownCriticality(s.to_string())),
        }
    }
}

/// The resolved impact of a requirement.
///
/// Identifier lists are duplicate-free and in a deterministic order;
/// the resolver guarantees both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    /// The requirement this impact belongs to.
    pub requirement_id: RequirementId,
    /// Affected components.
    pub components: Vec<ComponentId>,
    /// Tests required to demonstrate compliance.
    pub tests: Vec<TestId>,
    /// Deliverable documents.
    pub documents: Vec<DocumentId>,
    /// Severity.
    pub criticality: Criticality,
    /// Recommended validation work, in order.
    pub validation_actions: Vec<String>,
}

impl Impact {
    /// Tests this impact requires that the product does not have.
    pub fn missing_tests<'a>(&'a self, product: &Product) -> Vec<&'a TestId> {
        self.tests.iter().filter(|t| !product.has_test(t)).collect()
    }

    /// Whether every required test is in the product's inventory.
    /// An impact that requires no tests is covered.
    pub fn is_covered_by(&self, product: &Product) -> bool {
        self.tests.iter().all(|t| product.has_test(t))
    }
}
