//! Store errors.

use regtrace_core::{InvariantError, ValidationError};
use thiserror::Error;

/// Errors returned by [`ComplianceStore`](crate::ComplianceStore) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (`"regulation"`, `"requirement"`, `"impact"`).
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A store invariant would be violated.
    #[error(transparent)]
    Invariant(#[from] InvariantError),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    pub(crate) fn regulation(id: impl ToString) -> Self {
        Self::NotFound {
            kind: "regulation",
            id: id.to_string(),
        }
    }

    pub(crate) fn requirement(id: impl ToString) -> Self {
        Self::NotFound {
            kind: "requirement",
            id: id.to_string(),
        }
    }
}
