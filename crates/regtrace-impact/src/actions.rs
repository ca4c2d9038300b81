//! # Validation Action Synthesizer
//!
//! Fallback recommendations for an impact the advisor gave no actions for.
//! Output order is fixed: tests to run, components to review, then exactly
//! one closing recommendation keyed by criticality.

use regtrace_core::{ComponentId, Criticality, TestId};

/// Closing recommendation for HIGH criticality.
pub const HIGH_ACTION: &str = "Perform a formal safety analysis (FTA/FMEA) and have the \
     vehicle safety team review the requirement.";

/// Closing recommendation for MEDIUM criticality.
pub const MEDIUM_ACTION: &str =
    "Record the requirement in the requirements-to-tests traceability matrix and confirm its coverage.";

/// Closing recommendation for LOW criticality.
pub const LOW_ACTION: &str = "Check that the associated documentation is up to date.";

/// Derive recommended validation actions.
pub fn synthesize(
    components: &[ComponentId],
    tests: &[TestId],
    criticality: Criticality,
) -> Vec<String> {
    let mut actions = Vec::with_capacity(3);
    if !tests.is_empty() {
        actions.push(format!(
            "Plan and execute the following tests: {}.",
            join(tests)
        ));
    }
    if !components.is_empty() {
        actions.push(format!(
            "Review the design and compliance of components: {}.",
            join(components)
        ));
    }
    actions.push(
        match criticality {
            Criticality::High => HIGH_ACTION,
            Criticality::Medium => MEDIUM_ACTION,
            Criticality::Low => LOW_ACTION,
        }
        .to_string(),
    );
    actions
}

fn join<T: AsRef<str>>(ids: &[T]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
}
