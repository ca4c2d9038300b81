//! Risk tiers derived from coverage.

use serde::{Deserialize, Serialize};

/// Minimum coverage (percent) for [`RiskTier::Low`].
pub const LOW_RISK_MIN_COVERAGE: f64 = 90.0;

/// Minimum coverage (percent) for [`RiskTier::Medium`].
pub const MEDIUM_RISK_MIN_COVERAGE: f64 = 70.0;

/// Compliance risk of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    /// Coverage of at least 90%.
    Low,
    /// Coverage of at least 70% and below 90%.
    Medium,
    /// Coverage below 70%.
    High,
}

impl RiskTier {
    /// Tier for a coverage percentage. The same thresholds apply to every
    /// view.
    pub fn from_coverage(coverage_percent: f64) -> Self {
        if coverage_percent >= LOW_RISK_MIN_COVERAGE {
            Self::Low
        } else if coverage_percent >= MEDIUM_RISK_MIN_COVERAGE {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// All tiers, lowest risk first.
    pub fn all() -> &'static [RiskTier] {
        &[Self::Low, Self::Medium, Self::High]
    }

    /// Canonical string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        assert_eq!(RiskTier::from_coverage(100.0), RiskTier::Low);
        assert_eq!(RiskTier::from_coverage(90.0), RiskTier::Low);
        assert_eq!(RiskTier::from_coverage(89.9), RiskTier::Medium);
        assert_eq!(RiskTier::from_coverage(70.0), RiskTier::Medium);
        assert_eq!(RiskTier::from_coverage(69.9), RiskTier::High);
        assert_eq!(RiskTier::from_coverage(0.0), RiskTier::High);
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskTier::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!(RiskTier::all().len(), 3);
    }
}
