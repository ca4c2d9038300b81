//! # Products
//!
//! The vehicle configuration compliance is measured against. From the
//! compliance core's point of view a product is read-only: its test
//! inventory decides whether a required test is covered.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::{ComponentId, ProductId, TestId};
use crate::market::Market;

/// A product and its reference inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Markets the product is sold in.
    #[serde(default)]
    pub markets: BTreeSet<Market>,
    /// Components fitted to the product.
    #[serde(default)]
    pub components: BTreeSet<ComponentId>,
    /// Tests the product has passed.
    #[serde(default)]
    pub tests: BTreeSet<TestId>,
}

impl Product {
    /// Create a product with an empty inventory.
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            markets: BTreeSet::new(),
            components: BTreeSet::new(),
            tests: BTreeSet::new(),
        }
    }

    /// Add markets.
    pub fn with_markets(mut self, markets: impl IntoIterator<Item = Market>) -> Self {
        self.markets.extend(markets);
        self
    }

    /// Add components.
    pub fn with_components(mut self, components: impl IntoIterator<Item = ComponentId>) -> Self {
        self.components.extend(components);
        self
    }

    /// Add tests.
    pub fn with_tests(mut self, tests: impl IntoIterator<Item = TestId>) -> Self {
        self.tests.extend(tests);
        self
    }

    /// Whether the test is in the inventory.
    pub fn has_test(&self, test: &TestId) -> bool {
        self.tests.contains(test)
    }

    /// Whether the product is sold in the market.
    pub fn sold_in(&self, market: &Market) -> bool {
        self.markets.contains(market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_deduplicates_inventory() {
        let p = Product::new(ProductId::new("VEH-EV-01").unwrap(), "EV Platform")
            .with_tests(["TEST_LEAK", "TEST_LEAK", "TEST_FIRE"].map(|t| TestId::new(t).unwrap()))
            .with_markets(["EU", "USA"].map(|m| Market::new(m).unwrap()));
        assert_eq!(p.tests.len(), 2);
        assert!(p.has_test(&TestId::new("TEST_FIRE").unwrap()));
        assert!(!p.has_test(&TestId::new("TEST_CRASH").unwrap()));
        assert!(p.sold_in(&Market::new("EU").unwrap()));
        assert!(!p.sold_in(&Market::new("UN").unwrap()));
    }

    #[test]
    fn deserializes_with_missing_inventory() {
        let p: Product = serde_json::from_str(r#"{"id":"P1","name":"Proto"}"#).unwrap();
        assert!(p.tests.is_empty());
        assert!(p.markets.is_empty());
    }

    #[test]
    fn rejects_empty_test_id_in_inventory() {
        let json = r#"{"id":"P1","name":"Proto","tests":["TEST_LEAK",""]}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
