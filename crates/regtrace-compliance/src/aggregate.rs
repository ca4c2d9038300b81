//! # Country Compliance
//!
//! A requirement is non-compliant for the product when it has no resolved
//! impact, or when its impact requires a test the product does not have.
//! An impact that requires no tests is compliant. Missing references are
//! never errors here: they simply count against coverage.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use regtrace_core::{Impact, Market, Product, Requirement, RequirementId, ValidationError};

use crate::risk::RiskTier;

/// Length of the requirement summary in remediation rows.
pub const SUMMARY_MAX_CHARS: usize = 80;

/// Compliance of one market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryCompliance {
    /// The market.
    pub country: Market,
    /// Percentage of applicable requirements that are compliant, rounded
    /// to one decimal. 100.0 when nothing applies.
    pub coverage_percent: f64,
    /// Risk tier for the coverage.
    pub risk_tier: RiskTier,
    /// Non-compliant requirements, in input order.
    pub non_compliant_ids: Vec<RequirementId>,
    /// Number of applicable requirements.
    pub total: usize,
}

/// One recommended remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationAction {
    /// The non-compliant requirement.
    pub requirement_id: RequirementId,
    /// Its market.
    pub country: Market,
    /// Engineering (or raw) text, shortened.
    pub summary: String,
    /// What to do about it.
    pub action: String,
}

/// One row of the country dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    /// The market.
    pub country: Market,
    /// Coverage percentage.
    pub coverage_percent: f64,
    /// Risk tier.
    pub risk_tier: RiskTier,
    /// Number of non-compliant requirements.
    pub non_compliant: usize,
    /// Number of applicable requirements.
    pub total: usize,
    /// Whether the product is sold in the market.
    pub sold: bool,
}

/// Resolve a market code case-insensitively against the markets present
/// in the requirements, then the markets the product is sold in. Unknown
/// codes are kept as given and yield vacuous compliance.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMarket`] if the code is blank.
pub fn resolve_market(
    code: &str,
    requirements: &[Requirement],
    product: &Product,
) -> Result<Market, ValidationError> {
    let known = requirements
        .iter()
        .map(|r| &r.country)
        .chain(product.markets.iter())
        .find(|m| m.matches_ignore_case(code));
    match known {
        Some(market) => Ok(market.clone()),
        None => Market::new(code),
    }
}

/// Whether a requirement is compliant for the product.
pub fn is_compliant(
    requirement: &Requirement,
    impacts: &BTreeMap<RequirementId, Impact>,
    product: &Product,
) -> bool {
    impacts
        .get(&requirement.id)
        .is_some_and(|impact| impact.is_covered_by(product))
}

/// Compute coverage, risk and non-compliant requirements for one market.
pub fn compute_country_compliance(
    country: &Market,
    requirements: &[Requirement],
    impacts: &BTreeMap<RequirementId, Impact>,
    product: &Product,
) -> CountryCompliance {
    let relevant: Vec<&Requirement> = requirements
        .iter()
        .filter(|r| &r.country == country)
        .collect();
    let non_compliant_ids: Vec<RequirementId> = relevant
        .iter()
        .filter(|r| !is_compliant(r, impacts, product))
        .map(|r| r.id.clone())
        .collect();
    let coverage_percent = coverage(relevant.len(), non_compliant_ids.len());
    let risk_tier = RiskTier::from_coverage(coverage_percent);
    tracing::info!(
        country = %country,
        total = relevant.len(),
        non_compliant = non_compliant_ids.len(),
        coverage_percent,
        risk = %risk_tier,
        "compliance computed"
    );
    CountryCompliance {
        country: country.clone(),
        coverage_percent,
        risk_tier,
        non_compliant_ids,
        total: relevant.len(),
    }
}

fn coverage(total: usize, non_compliant: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let compliant = total.saturating_sub(non_compliant) as f64;
    round_one_decimal(100.0 * compliant / total as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Recommended action for a non-compliant requirement.
pub fn remediation_action(requirement: &Requirement, impact: Option<&Impact>) -> String {
    match impact {
        Some(impact) if !impact.tests.is_empty() => {
            let tests = join(&impact.tests);
            let components = if impact.components.is_empty() {
                "N/A".to_string()
            } else {
                join(&impact.components)
            };
            format!(
                "Schedule / rerun tests [{tests}] for components [{components}] to cover requirement {}.",
                requirement.id
            )
        }
        _ => format!(
            "Perform detailed analysis of requirement {} and define associated tests for market {}.",
            requirement.id, requirement.country
        ),
    }
}

fn join<T: AsRef<str>>(items: &[T]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shorten requirement text for display, appending `...` when cut.
pub fn summarize(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }
    let mut short: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    short.push_str("...");
    short
}

/// Remediation rows for every non-compliant requirement of a market.
pub fn actions_for_country(
    country: &Market,
    requirements: &[Requirement],
    impacts: &BTreeMap<RequirementId, Impact>,
    product: &Product,
) -> Vec<RemediationAction> {
    requirements
        .iter()
        .filter(|r| &r.country == country && !is_compliant(r, impacts, product))
        .map(|r| RemediationAction {
            requirement_id: r.id.clone(),
            country: r.country.clone(),
            summary: summarize(r.analysis_text()),
            action: remediation_action(r, impacts.get(&r.id)),
        })
        .collect()
}

/// One row per market present in the requirements, sorted by market.
pub fn country_dashboard(
    requirements: &[Requirement],
    impacts: &BTreeMap<RequirementId, Impact>,
    product: &Product,
) -> Vec<DashboardRow> {
    let countries: BTreeSet<&Market> = requirements.iter().map(|r| &r.country).collect();
    countries
        .into_iter()
        .map(|country| {
            let c = compute_country_compliance(country, requirements, impacts, product);
            DashboardRow {
                country: c.country,
                coverage_percent: c.coverage_percent,
                risk_tier: c.risk_tier,
                non_compliant: c.non_compliant_ids.len(),
                total: c.total,
                sold: product.sold_in(country),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_core::{ComponentId, Criticality, ProductId, RegulationId, TestId, Timestamp};

    fn market(code: &str) -> Market {
        Market::new(code).unwrap()
    }

    fn requirement(n: u32, country: &str, text: &str) -> Requirement {
        Requirement::new(
            RequirementId::sequential(&market(country), n),
            RegulationId::new("REG-1").unwrap(),
            market(country),
            text,
            text,
            Timestamp::from_ymd(2025, 1, 15).unwrap(),
        )
        .unwrap()
    }

    fn impact(req: &Requirement, tests: &[&str], components: &[&str]) -> Impact {
        Impact {
            requirement_id: req.id.clone(),
            components: components
                .iter()
                .map(|c| ComponentId::new(*c).unwrap())
                .collect(),
            tests: tests.iter().map(|t| TestId::new(*t).unwrap()).collect(),
            documents: vec![],
            criticality: Criticality::Medium,
            validation_actions: vec![],
        }
    }

    fn product(tests: &[&str]) -> Product {
        Product::new(ProductId::new("VEH-1").unwrap(), "Vehicle")
            .with_tests(tests.iter().map(|t| TestId::new(*t).unwrap()))
    }

    #[test]
    fn ten_requirements_three_failing_is_seventy_percent() {
        let reqs: Vec<Requirement> = (1..=10)
            .map(|n| requirement(n, "EU", "Tanks shall be tested"))
            .collect();
        let mut impacts = BTreeMap::new();
        for (i, r) in reqs.iter().enumerate() {
            let tests: &[&str] = if i < 3 { &["TEST_FIRE"] } else { &["TEST_LEAK"] };
            impacts.insert(r.id.clone(), impact(r, tests, &["LPG_TANK"]));
        }
        let c = compute_country_compliance(&market("EU"), &reqs, &impacts, &product(&["TEST_LEAK"]));
        assert_eq!(c.coverage_percent, 70.0);
        assert_eq!(c.risk_tier, RiskTier::Medium);
        assert_eq!(c.non_compliant_ids.len(), 3);
        assert_eq!(c.total, 10);
    }

    #[test]
    fn no_requirements_is_vacuously_compliant() {
        let reqs = vec![requirement(1, "USA", "Airbags must deploy")];
        let c = compute_country_compliance(
            &market("EU"),
            &reqs,
            &BTreeMap::new(),
            &product(&[]),
        );
        assert_eq!(c.coverage_percent, 100.0);
        assert_eq!(c.risk_tier, RiskTier::Low);
        assert!(c.non_compliant_ids.is_empty());
        assert_eq!(c.total, 0);
    }

    #[test]
    fn unresolved_requirement_is_non_compliant() {
        let reqs = vec![requirement(1, "EU", "Tanks shall be tested")];
        let c = compute_country_compliance(&market("EU"), &reqs, &BTreeMap::new(), &product(&[]));
        assert_eq!(c.coverage_percent, 0.0);
        assert_eq!(c.risk_tier, RiskTier::High);
    }

    #[test]
    fn impact_without_tests_is_compliant() {
        let reqs = vec![requirement(1, "EU", "Documentation shall be provided")];
        let mut impacts = BTreeMap::new();
        impacts.insert(reqs[0].id.clone(), impact(&reqs[0], &[], &[]));
        let c = compute_country_compliance(&market("EU"), &reqs, &impacts, &product(&[]));
        assert_eq!(c.coverage_percent, 100.0);
    }

    #[test]
    fn coverage_rounds_to_one_decimal() {
        let reqs: Vec<Requirement> = (1..=3).map(|n| requirement(n, "EU", "x shall y")).collect();
        let mut impacts = BTreeMap::new();
        impacts.insert(reqs[0].id.clone(), impact(&reqs[0], &[], &[]));
        let c = compute_country_compliance(&market("EU"), &reqs, &impacts, &product(&[]));
        assert_eq!(c.coverage_percent, 33.3);
    }

    #[test]
    fn remediation_texts() {
        let req = requirement(7, "EU", "Tanks shall be tested");
        let with_tests = impact(&req, &["TEST_LEAK", "TEST_FIRE"], &[]);
        assert_eq!(
            remediation_action(&req, Some(&with_tests)),
            "Schedule / rerun tests [TEST_LEAK, TEST_FIRE] for components [N/A] to cover requirement REQ_EU_0007."
        );
        let with_components = impact(&req, &["TEST_LEAK"], &["LPG_TANK", "MULTIVALVE"]);
        assert!(remediation_action(&req, Some(&with_components))
            .contains("components [LPG_TANK, MULTIVALVE]"));
        assert_eq!(
            remediation_action(&req, None),
            "Perform detailed analysis of requirement REQ_EU_0007 and define associated tests for market EU."
        );
    }

    #[test]
    fn market_codes_resolve_case_insensitively() {
        let reqs = vec![requirement(1, "UNECE", "Tanks shall be tested")];
        let p = product(&[]).with_markets([market("EU")]);
        assert_eq!(resolve_market("unece", &reqs, &p).unwrap(), market("UNECE"));
        assert_eq!(resolve_market(" eu ", &reqs, &p).unwrap(), market("EU"));
        assert_eq!(resolve_market("JP", &reqs, &p).unwrap(), market("JP"));
        assert!(resolve_market("  ", &reqs, &p).is_err());
    }

    #[test]
    fn dashboard_flags_markets_the_product_is_sold_in() {
        let reqs = vec![
            requirement(1, "EU", "Tanks shall be tested"),
            requirement(1, "USA", "Airbags must deploy"),
        ];
        let p = product(&[]).with_markets([market("EU")]);
        let rows = country_dashboard(&reqs, &BTreeMap::new(), &p);
        let sold: Vec<(&str, bool)> = rows.iter().map(|r| (r.country.as_str(), r.sold)).collect();
        assert_eq!(sold, vec![("EU", true), ("USA", false)]);
    }

    #[test]
    fn summary_truncates_long_text() {
        let long = "a".repeat(100);
        let s = summarize(&long);
        assert_eq!(s.len(), SUMMARY_MAX_CHARS + 3);
        assert!(s.ends_with("..."));
        assert_eq!(summarize("short"), "short");
        let accented = "é".repeat(90);
        assert_eq!(summarize(&accented).chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn actions_cover_only_non_compliant() {
        let reqs = vec![
            requirement(1, "EU", "Tanks shall be tested"),
            requirement(2, "EU", "Valves shall close"),
            requirement(1, "USA", "Airbags must deploy"),
        ];
        let mut impacts = BTreeMap::new();
        impacts.insert(reqs[0].id.clone(), impact(&reqs[0], &["TEST_LEAK"], &[]));
        let actions = actions_for_country(&market("EU"), &reqs, &impacts, &product(&["TEST_LEAK"]));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].requirement_id.as_str(), "REQ_EU_0002");
        assert_eq!(actions[0].summary, "Valves shall close");
        assert!(actions[0].action.starts_with("Perform detailed analysis"));
    }

    #[test]
    fn dashboard_has_one_sorted_row_per_country() {
        let reqs = vec![
            requirement(1, "USA", "Airbags must deploy"),
            requirement(1, "EU", "Tanks shall be tested"),
            requirement(2, "EU", "Valves shall close"),
        ];
        let rows = country_dashboard(&reqs, &BTreeMap::new(), &product(&[]));
        let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["EU", "USA"]);
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[0].non_compliant, 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn coverage_is_bounded_and_consistent(total in 0usize..200, failing in 0usize..200) {
            let failing = failing.min(total);
            let c = coverage(total, failing);
            prop_assert!((0.0..=100.0).contains(&c));
            if failing == 0 {
                prop_assert_eq!(c, 100.0);
            }
            if total > 0 && failing == total {
                prop_assert_eq!(c, 0.0);
            }
        }
    }
}
