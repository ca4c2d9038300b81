//! # Requirements
//!
//! A [`Requirement`] is an atomic, testable obligation extracted from one
//! sentence of a [`Regulation`](crate::Regulation). It keeps the literal
//! source sentence (`text_raw`) next to an engineering reformulation
//! (`text_engineering`), and carries the per-market review verdicts.
//!
//! ## Lifecycle
//!
//! ```text
//!   CREATED ──▶ IMPACT_PENDING ──▶ IMPACT_RESOLVED ─┐
//!      │                               ▲   ▲        │ recompute
//!      └───────────────────────────────┘   └────────┘
//! ```
//!
//! Recomputing an impact overwrites the previous one; there is no terminal
//! state short of process end.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{RegulationId, RequirementId};
use crate::market::{Market, MarketStatus};
use crate::temporal::Timestamp;

/// Version label given to newly extracted requirements.
pub const INITIAL_VERSION: &str = "1.0";

/// An atomic engineering requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Store-unique identifier.
    pub id: RequirementId,
    /// The regulation this requirement was extracted from.
    pub regulation_id: RegulationId,
    /// Jurisdiction of the source regulation.
    pub country: Market,
    /// Requirement version, bumped on every in-place edit.
    pub version: String,
    /// The literal source sentence.
    pub text_raw: String,
    /// Reformulated, testable obligation statement.
    pub text_engineering: String,
    /// When the requirement was extracted.
    pub created_at: Timestamp,
    /// When the requirement was last edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Review verdict per market. Markets without a verdict are absent.
    #[serde(default)]
    pub market_status: BTreeMap<Market, MarketStatus>,
}

impl Requirement {
    /// Create a freshly extracted requirement at version `1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] if `text_raw` is blank.
    pub fn new(
        id: RequirementId,
        regulation_id: RegulationId,
        country: Market,
        text_raw: impl Into<String>,
        text_engineering: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let text_raw = text_raw.into();
        if text_raw.trim().is_empty() {
            return Err(ValidationError::EmptyText {
                field: "requirement text",
            });
        }
        Ok(Self {
            id,
            regulation_id,
            country,
            version: INITIAL_VERSION.to_string(),
            text_raw,
            text_engineering: text_engineering.into(),
            created_at,
            updated_at: None,
            market_status: BTreeMap::new(),
        })
    }

    /// The text impact inference runs on: the engineering text, or the raw
    /// text when no engineering reformulation exists.
    pub fn analysis_text(&self) -> &str {
        if self.text_engineering.trim().is_empty() {
            &self.text_raw
        } else {
            &self.text_engineering
        }
    }

    /// Verdict for a market, `Unset` when none was recorded.
    pub fn status_for(&self, market: &Market) -> MarketStatus {
        self.market_status
            .get(market)
            .copied()
            .unwrap_or(MarketStatus::Unset)
    }

    /// Record a verdict for a market and return the previous one.
    /// Recording [`MarketStatus::Unset`] clears the entry.
    pub fn set_status(&mut self, market: Market, status: MarketStatus) -> MarketStatus {
        let previous = match status {
            MarketStatus::Unset => self.market_status.remove(&market),
            other => self.market_status.insert(market, other),
        };
        previous.unwrap_or(MarketStatus::Unset)
    }

    /// Advance to the next minor version.
    pub fn bump_version(&mut self) {
        self.version = next_minor_version(&self.version);
    }
}

/// Next minor version label: `"1.0"` becomes `"1.1"`, `"1.9"` becomes
/// `"1.10"`, a bare major `"2"` becomes `"2.1"`. Labels that do not parse
/// get `".1"` appended.
pub fn next_minor_version(version: &str) -> String {
    let trimmed = version.trim();
    match trimmed.split_once('.') {
        Some((major, minor)) => match (major.parse::<u32>(), minor.parse::<u32>()) {
            (Ok(major), Ok(minor)) => format!("{major}.{}", minor.saturating_add(1)),
            _ => format!("{trimmed}.1"),
        },
        None => match trimmed.parse::<u32>() {
            Ok(major) => format!("{major}.1"),
            Err(_) if trimmed.is_empty() => "1.1".to_string(),
            Err(_) => format!("{trimmed}.1"),
        },
    }
}

/// Lifecycle stage of a requirement with respect to impact inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementStage {
    /// Just extracted; never queued for resolution.
    Created,
    /// Awaiting (or undergoing) impact resolution.
    ImpactPending,
    /// An impact has been computed and stored.
    ImpactResolved,
}

impl RequirementStage {
    /// Whether the state machine permits moving from `self` to `to`.
    pub fn can_transition_to(self, to: RequirementStage) -> bool {
        use RequirementStage::*;
        matches!(
            (self, to),
            (Created, ImpactPending)
                | (Created, ImpactResolved)
                | (ImpactPending, ImpactResolved)
                | (ImpactResolved, ImpactPending)
                | (ImpactResolved, ImpactResolved)
        )
    }

    /// Canonical string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::ImpactPending => "IMPACT_PENDING",
            Self::ImpactResolved => "IMPACT_RESOLVED",
        }
    }
}

impl std::fmt::Display for RequirementStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(raw: &str, eng: &str) -> Requirement {
        Requirement::new(
            RequirementId::new("REQ_EU_0001").unwrap(),
            RegulationId::new("EU-BATT-2025-V1").unwrap(),
            Market::new("EU").unwrap(),
            raw,
            eng,
            Timestamp::from_ymd(2025, 1, 15).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn new_requirement_starts_at_initial_version() {
        let r = req("Batteries must not leak.", "");
        assert_eq!(r.version, "1.0");
        assert!(r.updated_at.is_none());
        assert!(r.market_status.is_empty());
    }

    #[test]
    fn blank_raw_text_rejected() {
        let err = Requirement::new(
            RequirementId::new("REQ_EU_0002").unwrap(),
            RegulationId::new("R").unwrap(),
            Market::new("EU").unwrap(),
            "  ",
            "",
            Timestamp::now(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::EmptyText { .. }));
    }

    #[test]
    fn analysis_text_prefers_engineering() {
        assert_eq!(req("raw", "eng").analysis_text(), "eng");
        assert_eq!(req("raw", "   ").analysis_text(), "raw");
    }

    #[test]
    fn set_status_returns_previous_and_unset_clears() {
        let mut r = req("raw", "");
        let usa = Market::new("USA").unwrap();
        assert_eq!(r.set_status(usa.clone(), MarketStatus::Nok), MarketStatus::Unset);
        assert_eq!(r.status_for(&usa), MarketStatus::Nok);
        assert_eq!(r.set_status(usa.clone(), MarketStatus::Ok), MarketStatus::Nok);
        assert_eq!(r.set_status(usa.clone(), MarketStatus::Unset), MarketStatus::Ok);
        assert!(!r.market_status.contains_key(&usa));
        assert_eq!(r.status_for(&usa), MarketStatus::Unset);
    }

    #[test]
    fn minor_version_increments() {
        assert_eq!(next_minor_version("1.0"), "1.1");
        assert_eq!(next_minor_version("1.9"), "1.10");
        assert_eq!(next_minor_version("2"), "2.1");
        assert_eq!(next_minor_version("draft"), "draft.1");
        assert_eq!(next_minor_version(""), "1.1");
    }

    #[test]
    fn bump_version_mutates_in_place() {
        let mut r = req("raw", "");
        r.bump_version();
        r.bump_version();
        assert_eq!(r.version, "1.2");
    }

    #[test]
    fn market_status_map_serializes_with_string_keys() {
        let mut r = req("raw", "");
        r.set_status(Market::new("EU").unwrap(), MarketStatus::Ok);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["market_status"]["EU"], "OK");
        let back: Requirement = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn lifecycle_transitions() {
        use RequirementStage::*;
        assert!(Created.can_transition_to(ImpactPending));
        assert!(ImpactPending.can_transition_to(ImpactResolved));
        assert!(ImpactResolved.can_transition_to(ImpactResolved));
        assert!(!ImpactResolved.can_transition_to(Created));
        assert!(!ImpactPending.can_transition_to(Created));
        assert!(!Created.can_transition_to(Created));
    }

    #[test]
    fn lifecycle_serde_is_screaming_snake() {
        let json = serde_json::to_string(&RequirementStage::ImpactPending).unwrap();
        assert_eq!(json, "\"IMPACT_PENDING\"");
        assert_eq!(format!("{}", RequirementStage::ImpactResolved), "IMPACT_RESOLVED");
    }
}
