//! # regtrace-compliance — Compliance Aggregation
//!
//! Turns requirements, their current impacts, and a product's test
//! inventory into per-market coverage, risk tiers and remediation work.
//! Everything here is a pure function over borrowed data; callers take a
//! consistent snapshot of the store first.
//!
//! ```text
//! requirements ─┐
//! impacts ──────┼──▶ compute_country_compliance ──▶ coverage, RiskTier, non-compliant ids
//! product ──────┘            │
//!                            └──▶ actions_for_country ──▶ remediation rows
//! ```

pub mod aggregate;
pub mod risk;
pub mod views;

pub use aggregate::{
    actions_for_country, compute_country_compliance, country_dashboard, is_compliant,
    remediation_action, resolve_market, summarize, CountryCompliance, DashboardRow,
    RemediationAction,
};
pub use risk::RiskTier;
pub use views::{
    history_statistics, impact_matrix, impact_summary, market_status_summary, HistoryStatistics,
    ImpactMatrix, ImpactSummaryRow, MarketStatusSummary,
};
