//! # History Items
//!
//! Entries of the append-only traceability log. Items are never mutated or
//! deleted once recorded, and the log orders them strictly by timestamp.

use serde::{Deserialize, Serialize};

use crate::identity::RequirementId;
use crate::temporal::Timestamp;

/// Kind of requirement lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// The requirement was extracted.
    Created,
    /// The requirement was edited in place.
    Updated,
}

impl ChangeType {
    /// Return all change types.
    pub fn all() -> &'static [ChangeType] {
        &[Self::Created, Self::Updated]
    }

    /// Canonical lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded requirement lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// When the event was recorded.
    pub timestamp: Timestamp,
    /// The requirement concerned.
    pub requirement_id: RequirementId,
    /// Requirement version after the event.
    pub version: String,
    /// Event kind.
    pub change_type: ChangeType,
    /// Short human-readable description of the change.
    pub diff_summary: String,
}
