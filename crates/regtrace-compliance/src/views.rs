//! Read-only summaries for dashboards.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use regtrace_core::{ChangeType, HistoryItem, Impact, Market, MarketStatus, Requirement, RequirementId};

/// Which impact categories were identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactMatrix {
    /// At least one component.
    pub components_identified: bool,
    /// At least one test.
    pub tests_identified: bool,
    /// At least one document.
    pub documents_identified: bool,
}

/// Category flags for an impact.
pub fn impact_matrix(impact: &Impact) -> ImpactMatrix {
    ImpactMatrix {
        components_identified: !impact.components.is_empty(),
        tests_identified: !impact.tests.is_empty(),
        documents_identified: !impact.documents.is_empty(),
    }
}

/// Impact size of one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactSummaryRow {
    /// The requirement.
    pub requirement_id: RequirementId,
    /// Whether an impact has been resolved.
    pub resolved: bool,
    /// Number of impacted components.
    pub components: usize,
    /// Number of required tests.
    pub tests: usize,
}

/// Per-requirement impact counts, zero for unresolved requirements.
pub fn impact_summary(
    requirements: &[Requirement],
    impacts: &BTreeMap<RequirementId, Impact>,
) -> Vec<ImpactSummaryRow> {
    requirements
        .iter()
        .map(|r| {
            let impact = impacts.get(&r.id);
            ImpactSummaryRow {
                requirement_id: r.id.clone(),
                resolved: impact.is_some(),
                components: impact.map_or(0, |i| i.components.len()),
                tests: impact.map_or(0, |i| i.tests.len()),
            }
        })
        .collect()
}

/// Verdict counts for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketStatusSummary {
    /// The market.
    pub market: Market,
    /// Requirements marked OK.
    pub ok: usize,
    /// Requirements marked NOK.
    pub nok: usize,
    /// Requirements marked not applicable.
    pub na: usize,
    /// Requirements without a verdict.
    pub unset: usize,
}

/// Count verdicts for a market across the requirements of that market.
/// Requirements of other markets are ignored.
pub fn market_status_summary(requirements: &[Requirement], market: &Market) -> MarketStatusSummary {
    let mut summary = MarketStatusSummary {
        market: market.clone(),
        ok: 0,
        nok: 0,
        na: 0,
        unset: 0,
    };
    for requirement in requirements.iter().filter(|r| &r.country == market) {
        match requirement.status_for(market) {
            MarketStatus::Ok => summary.ok += 1,
            MarketStatus::Nok => summary.nok += 1,
            MarketStatus::Na => summary.na += 1,
            MarketStatus::Unset => summary.unset += 1,
        }
    }
    summary
}

/// Aggregate counts over the traceability log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStatistics {
    /// Number of entries.
    pub total_changes: usize,
    /// Number of distinct requirements touched.
    pub distinct_requirements: usize,
    /// `created` entries.
    pub created: usize,
    /// `updated` entries.
    pub updated: usize,
}

/// Summarize history entries.
pub fn history_statistics(history: &[HistoryItem]) -> HistoryStatistics {
    let distinct: BTreeSet<&RequirementId> = history.iter().map(|h| &h.requirement_id).collect();
    let count = |kind: ChangeType| history.iter().filter(|h| h.change_type == kind).count();
    HistoryStatistics {
        total_changes: history.len(),
        distinct_requirements: distinct.len(),
        created: count(ChangeType::Created),
        updated: count(ChangeType::Updated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_core::{Criticality, RegulationId, TestId, Timestamp};

    fn requirement(n: u32) -> Requirement {
        let eu = Market::new("EU").unwrap();
        Requirement::new(
            RequirementId::sequential(&eu, n),
            RegulationId::new("REG-1").unwrap(),
            eu,
            "Tanks shall be tested",
            "Tanks shall be tested",
            Timestamp::from_ymd(2025, 1, 15).unwrap(),
        )
        .unwrap()
    }

    fn bare_impact(req: &Requirement) -> Impact {
        Impact {
            requirement_id: req.id.clone(),
            components: vec![],
            tests: vec![TestId::new("TEST_LEAK").unwrap()],
            documents: vec![],
            criticality: Criticality::Low,
            validation_actions: vec![],
        }
    }

    #[test]
    fn matrix_flags_categories() {
        let m = impact_matrix(&bare_impact(&requirement(1)));
        assert!(!m.components_identified);
        assert!(m.tests_identified);
        assert!(!m.documents_identified);
    }

    #[test]
    fn summary_zero_for_unresolved() {
        let reqs = vec![requirement(1), requirement(2)];
        let mut impacts = BTreeMap::new();
        impacts.insert(reqs[0].id.clone(), bare_impact(&reqs[0]));
        let rows = impact_summary(&reqs, &impacts);
        assert_eq!(rows[0].tests, 1);
        assert!(rows[0].resolved);
        assert_eq!(rows[1].tests, 0);
        assert!(!rows[1].resolved);
    }

    #[test]
    fn market_status_counts() {
        let eu = Market::new("EU").unwrap();
        let mut reqs = vec![requirement(1), requirement(2), requirement(3), requirement(4)];
        reqs[0].set_status(eu.clone(), MarketStatus::Ok);
        reqs[1].set_status(eu.clone(), MarketStatus::Nok);
        reqs[2].set_status(eu.clone(), MarketStatus::Na);
        let s = market_status_summary(&reqs, &eu);
        assert_eq!((s.ok, s.nok, s.na, s.unset), (1, 1, 1, 1));
    }

    #[test]
    fn market_status_ignores_other_markets() {
        let eu = Market::new("EU").unwrap();
        let usa = Market::new("USA").unwrap();
        let mut other = Requirement::new(
            RequirementId::sequential(&usa, 1),
            RegulationId::new("NHTSA-208").unwrap(),
            usa.clone(),
            "Airbags must deploy",
            "Airbags must deploy",
            Timestamp::from_ymd(2025, 1, 15).unwrap(),
        )
        .unwrap();
        other.set_status(usa.clone(), MarketStatus::Ok);
        let reqs = vec![requirement(1), requirement(2), other];

        let s = market_status_summary(&reqs, &eu);
        assert_eq!((s.ok, s.nok, s.na, s.unset), (0, 0, 0, 2));
        let s = market_status_summary(&reqs, &usa);
        assert_eq!((s.ok, s.nok, s.na, s.unset), (1, 0, 0, 0));
    }

    #[test]
    fn history_counts() {
        let t = Timestamp::from_ymd(2025, 1, 15).unwrap();
        let item = |n: u32, kind: ChangeType| HistoryItem {
            timestamp: t,
            requirement_id: requirement(n).id,
            version: "1.0".into(),
            change_type: kind,
            diff_summary: String::new(),
        };
        let history = vec![
            item(1, ChangeType::Created),
            item(2, ChangeType::Created),
            item(1, ChangeType::Updated),
        ];
        let stats = history_statistics(&history);
        assert_eq!(stats.total_changes, 3);
        assert_eq!(stats.distinct_requirements, 2);
        assert_eq!((stats.created, stats.updated), (2, 1));
        assert_eq!(history_statistics(&[]), HistoryStatistics::default());
    }
}
