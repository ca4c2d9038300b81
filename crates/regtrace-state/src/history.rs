//! # Traceability Log
//!
//! Append-only history of requirement lifecycle events.
//!
//! ## Invariant
//!
//! Entries are strictly increasing in timestamp and the log never shrinks.
//! [`TraceabilityLog::record`] stamps entries itself and, when the clock has
//! not advanced past the latest entry, uses the instant one microsecond
//! after it. [`TraceabilityLog::append`] accepts pre-stamped entries and
//! rejects any that would break the ordering.

use regtrace_core::{ChangeType, HistoryItem, InvariantError, RequirementId, Timestamp};

/// Append-only requirement history.
#[derive(Debug, Clone, Default)]
pub struct TraceabilityLog {
    entries: Vec<HistoryItem>,
}

impl TraceabilityLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event stamped with the current time.
    pub fn record(
        &mut self,
        requirement_id: RequirementId,
        version: impl Into<String>,
        change_type: ChangeType,
        diff_summary: impl Into<String>,
    ) -> &HistoryItem {
        self.record_at(Timestamp::now(), requirement_id, version, change_type, diff_summary)
    }

    /// Record an event observed at `observed`, moved forward if needed to
    /// keep the log strictly ordered.
    pub fn record_at(
        &mut self,
        observed: Timestamp,
        requirement_id: RequirementId,
        version: impl Into<String>,
        change_type: ChangeType,
        diff_summary: impl Into<String>,
    ) -> &HistoryItem {
        let timestamp = match self.latest() {
            Some(last) if observed <= last.timestamp => last.timestamp.successor(),
            _ => observed,
        };
        let index = self.entries.len();
        self.entries.push(HistoryItem {
            timestamp,
            requirement_id,
            version: version.into(),
            change_type,
            diff_summary: diff_summary.into(),
        });
        &self.entries[index]
    }

    /// Append a pre-stamped entry.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::HistoryRegression`] if the entry is not
    /// strictly later than the latest one.
    pub fn append(&mut self, item: HistoryItem) -> Result<(), InvariantError> {
        if let Some(last) = self.latest() {
            if item.timestamp <= last.timestamp {
                return Err(InvariantError::HistoryRegression {
                    latest: last.timestamp.to_string(),
                    attempted: item.timestamp.to_string(),
                });
            }
        }
        self.entries.push(item);
        Ok(())
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryItem] {
        &self.entries
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for one requirement, oldest first.
    pub fn entries_for_requirement<'a>(
        &'a self,
        requirement_id: &'a RequirementId,
    ) -> impl Iterator<Item = &'a HistoryItem> + 'a {
        self.entries
            .iter()
            .filter(move |e| &e.requirement_id == requirement_id)
    }

    /// Entries of one change type, oldest first.
    pub fn entries_by_type(&self, change_type: ChangeType) -> impl Iterator<Item = &HistoryItem> {
        self.entries
            .iter()
            .filter(move |e| e.change_type == change_type)
    }
}
