//! # Impact Resolver
//!
//! Merges two heuristic signal sources into one [`Impact`]. The advisor
//! proposes, the keyword tables augment, the classifier and synthesizer
//! fill gaps. Nothing is removed once added.
//!
//! ```text
//!   advisor ──▶ seed lists ──▶ ∪ keyword lookups ──▶ sentinel? ──▶ criticality? ──▶ actions?
//! ```
//!
//! List order is the advisor's order followed by keyword-table
//! declaration order, duplicates dropped at their later position.

use std::sync::Arc;

use regtrace_core::{ComponentId, Impact, Requirement};

use crate::actions::synthesize;
use crate::advisor::{AdvisorImpact, ImpactAdvisor, NoAdvisor};
use crate::criticality::classify;
use crate::rules::RuleTables;

/// Terms implying systemic scope. When no component was identified and the
/// text contains one of these, the impact gets the unspecified-component
/// sentinel.
pub const SYSTEMIC_TERMS: &[&str] = &["system", "vehicle"];

/// Resolves requirements into impacts using an advisor and keyword tables.
#[derive(Clone)]
pub struct ImpactResolver {
    advisor: Arc<dyn ImpactAdvisor>,
    tables: RuleTables,
}

impl std::fmt::Debug for ImpactResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpactResolver")
            .field("advisor", &self.advisor.name())
            .field("component_rules", &self.tables.components.len())
            .field("test_rules", &self.tables.tests.len())
            .field("document_rules", &self.tables.documents.len())
            .finish()
    }
}

impl ImpactResolver {
    /// Resolver with the built-in keyword tables.
    pub fn new(advisor: Arc<dyn ImpactAdvisor>) -> Self {
        Self {
            advisor,
            tables: RuleTables::builtin(),
        }
    }

    /// Resolver that never consults an advisor.
    pub fn keyword_only() -> Self {
        Self::new(Arc::new(NoAdvisor))
    }

    /// Replace the keyword tables.
    pub fn with_tables(mut self, tables: RuleTables) -> Self {
        self.tables = tables;
        self
    }

    /// The keyword tables in use.
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Name of the advisor in use.
    pub fn advisor_name(&self) -> &str {
        self.advisor.name()
    }

    /// Resolve one requirement. Always returns a complete impact; advisor
    /// failures degrade to keyword-only resolution.
    pub async fn resolve(&self, requirement: &Requirement) -> Impact {
        let advice = self.advisor.advise(requirement).await;
        if advice.is_none() {
            tracing::debug!(
                requirement_id = %requirement.id,
                advisor = self.advisor.name(),
                "no advisor signal, resolving from keyword rules"
            );
        }
        let impact = merge(requirement, advice, &self.tables);
        tracing::info!(
            requirement_id = %requirement.id,
            components = impact.components.len(),
            tests = impact.tests.len(),
            documents = impact.documents.len(),
            criticality = %impact.criticality,
            "impact resolved"
        );
        impact
    }
}

/// The pure merge step of resolution.
pub fn merge(requirement: &Requirement, advice: Option<AdvisorImpact>, tables: &RuleTables) -> Impact {
    let AdvisorImpact {
        mut components,
        mut tests,
        mut documents,
        criticality,
        validation_actions,
    } = advice.unwrap_or_default();

    let text = requirement.analysis_text().to_lowercase();

    union_into(&mut components, tables.lookup_components(&text));
    union_into(&mut tests, tables.lookup_tests(&text));
    union_into(&mut documents, tables.lookup_documents(&text));

    if components.is_empty() && SYSTEMIC_TERMS.iter().any(|t| text.contains(t)) {
        components.push(ComponentId::unspecified());
    }

    let criticality = criticality.unwrap_or_else(|| classify(&text));

    let validation_actions = if validation_actions.is_empty() {
        synthesize(&components, &tests, criticality)
    } else {
        validation_actions
    };

    Impact {
        requirement_id: requirement.id.clone(),
        components,
        tests,
        documents,
        criticality,
        validation_actions,
    }
}

fn union_into<T: PartialEq>(target: &mut Vec<T>, additions: Vec<T>) {
    for id in additions {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}
