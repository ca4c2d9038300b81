//! # Error Hierarchy
//!
//! Structured error types for regtrace, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Two classes are distinguished:
//!
//! - [`ValidationError`]: malformed input (empty identifier, empty text,
//!   unknown enum string). Rejected at construction time.
//! - [`InvariantError`]: a store invariant would be broken (duplicate
//!   requirement id, impact without requirement). These are the only
//!   conditions treated as reportable defects.
//!
//! Crates that own a boundary wrap both in their own enum (`StoreError`,
//! `AdvisorError`, the API's `AppError`).

use thiserror::Error;

/// Validation errors for identifiers and record fields.
///
/// Each variant carries the offending input so operators can diagnose
/// malformed source records without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier was empty or whitespace-only.
    #[error("invalid {kind}: must be non-empty")]
    EmptyIdentifier {
        /// The identifier kind (e.g. "requirement id").
        kind: &'static str,
    },

    /// A market / country code was empty or whitespace-only.
    #[error("invalid market code: must be non-empty")]
    InvalidMarket,

    /// A required text field was empty.
    #[error("{field} must be non-empty")]
    EmptyText {
        /// The field name.
        field: &'static str,
    },

    /// Criticality string is not one of HIGH, MEDIUM, LOW.
    #[error("unknown criticality: \"{0}\" (expected HIGH, MEDIUM or LOW)")]
    UnknownCriticality(String),

    /// Market status string is not one of OK, NOK, NA, UNSET.
    #[error("unknown market status: \"{0}\" (expected OK, NOK, NA or UNSET)")]
    UnknownMarketStatus(String),

    /// Timestamp string is not valid ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Violations of the store invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A requirement with this id already exists in the store.
    #[error("duplicate requirement id: {id}")]
    DuplicateRequirement {
        /// The duplicated identifier.
        id: String,
    },

    /// An impact was saved for a requirement the store does not hold.
    #[error("impact references unknown requirement: {requirement_id}")]
    OrphanImpact {
        /// The dangling requirement reference.
        requirement_id: String,
    },

    /// A requirement references a regulation the store does not hold.
    #[error("requirement {requirement_id} references unknown regulation {regulation_id}")]
    DanglingRegulation {
        /// The requirement being added.
        requirement_id: String,
        /// The missing regulation.
        regulation_id: String,
    },

    /// A regulation id was re-registered with different content.
    #[error("regulation {id} is immutable and was re-registered with different content")]
    RegulationMutated {
        /// The regulation identifier.
        id: String,
    },

    /// A requirement lifecycle transition that the state machine forbids.
    #[error("requirement {id}: invalid lifecycle transition {from} -> {to}")]
    InvalidTransition {
        /// The requirement identifier.
        id: String,
        /// Current stage.
        from: String,
        /// Attempted stage.
        to: String,
    },

    /// A history item would be appended with a timestamp not after the
    /// latest recorded one.
    #[error("history timestamp {attempted} does not follow latest entry {latest}")]
    HistoryRegression {
        /// Timestamp of the latest recorded entry.
        latest: String,
        /// Timestamp of the rejected entry.
        attempted: String,
    },
}
