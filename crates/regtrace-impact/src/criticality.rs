//! # Criticality Classifier
//!
//! Tiers are checked in fixed priority, safety before performance before
//! documentation, regardless of where in the text a term appears. The
//! first tier with any matching term wins; text matching none is MEDIUM.

use regtrace_core::Criticality;

/// Safety terms. Any match classifies as HIGH.
pub const SAFETY_TERMS: &[&str] = &[
    "leak",
    "leakage",
    "fire",
    "explosion",
    "crash",
    "safety",
    "hazard",
];

/// Performance and robustness terms. Any match classifies as MEDIUM.
pub const PERFORMANCE_TERMS: &[&str] = &["pressure", "temperature", "durability", "fatigue"];

/// Documentation terms. Any match classifies as LOW.
pub const DOCUMENTATION_TERMS: &[&str] =
    &["documentation", "manual", "marking", "label", "labeling"];

/// Classify requirement text into a criticality tier.
pub fn classify(text: &str) -> Criticality {
    let lowered = text.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| lowered.contains(t));
    if any(SAFETY_TERMS) {
        Criticality::High
    } else if any(PERFORMANCE_TERMS) {
        Criticality::Medium
    } else if any(DOCUMENTATION_TERMS) {
        Criticality::Low
    } else {
        Criticality::Medium
    }
}
