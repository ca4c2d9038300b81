//! # Version Comparison
//!
//! Sentence-level diff between two versions of a regulation. Sentences
//! are compared after segmentation and trimming, so whitespace and
//! terminator changes are not reported.

use serde::Serialize;

use regtrace_core::{Regulation, RegulationId};

use crate::extract::split_sentences;

/// Sentences added and removed between two versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDiff {
    /// The newer version.
    pub current_id: RegulationId,
    /// The older version.
    pub previous_id: RegulationId,
    /// Sentences present only in the newer version, in its order.
    pub added: Vec<String>,
    /// Sentences present only in the older version, in its order.
    pub removed: Vec<String>,
    /// Number of sentences present in both.
    pub unchanged: usize,
}

impl VersionDiff {
    /// Whether the two versions have the same sentences.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// One-line summary, e.g. `"2 sentence(s) added, 1 removed"`.
    pub fn summary(&self) -> String {
        format!(
            "{} sentence(s) added, {} removed",
            self.added.len(),
            self.removed.len()
        )
    }
}

/// Compare a regulation version with the one it supersedes.
pub fn compare_versions(current: &Regulation, previous: &Regulation) -> VersionDiff {
    let now = split_sentences(&current.text);
    let before = split_sentences(&previous.text);
    let added: Vec<String> = now.iter().filter(|s| !before.contains(s)).cloned().collect();
    let removed: Vec<String> = before.iter().filter(|s| !now.contains(s)).cloned().collect();
    let unchanged = now.iter().filter(|s| before.contains(s)).count();
    VersionDiff {
        current_id: current.id.clone(),
        previous_id: previous.id.clone(),
        added,
        removed,
        unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_core::{Market, Timestamp};

    fn reg(id: &str, text: &str) -> Regulation {
        Regulation::new(
            RegulationId::new(id).unwrap(),
            Market::new("EU").unwrap(),
            "Battery directive",
            "1.0",
            Timestamp::from_ymd(2025, 1, 15).unwrap(),
            text,
        )
        .unwrap()
    }

    #[test]
    fn reports_changed_sentences() {
        let v1 = reg("V1", "Batteries must resist 60°C. Reports shall be provided.");
        let v2 = reg(
            "V2",
            "Batteries must resist 70°C. Reports shall be provided. Tests must be repeated.",
        );
        let diff = compare_versions(&v2, &v1);
        assert_eq!(
            diff.added,
            vec!["Batteries must resist 70°C", "Tests must be repeated"]
        );
        assert_eq!(diff.removed, vec!["Batteries must resist 60°C"]);
        assert_eq!(diff.unchanged, 1);
        assert_eq!(diff.summary(), "2 sentence(s) added, 1 removed");
    }

    #[test]
    fn identical_text_is_empty_diff() {
        let a = reg("A", "Tanks shall be marked.");
        let b = reg("B", "  Tanks shall be marked  ");
        let diff = compare_versions(&a, &b);
        assert!(diff.is_empty());
        assert_eq!(diff.unchanged, 1);
    }
}
