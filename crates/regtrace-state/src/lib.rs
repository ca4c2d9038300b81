//! # regtrace-state — Store and Traceability Log
//!
//! The explicit store object that replaces ambient global state. All
//! mutation goes through [`ComplianceStore`]'s named methods
//! (`add_regulations`, `add_requirement`, `update_requirement`,
//! `set_market_status`, `save_impact`, `append_history`), which are the
//! only places the store invariants can be broken and therefore the only
//! places they are checked.
//!
//! ## Requirement lifecycle
//!
//! ```text
//! CREATED ──▶ IMPACT_PENDING ──▶ IMPACT_RESOLVED ─┐
//!    │              ▲                   ▲          │ recompute
//!    └──────────────┼───────────────────┘          │
//!                   └──────────────────────────────┘
//! ```
//!
//! Stages live in the store next to the requirement; `begin_resolution`
//! and `save_impact` drive the transitions.

pub mod error;
pub mod history;
pub mod resolve;
pub mod store;

pub use error::StoreError;
pub use history::TraceabilityLog;
pub use resolve::{resolve_all, resolve_requirement, shared, SharedStore};
pub use store::{ComplianceStore, RegulationFilter, RequirementEdit, DEFAULT_UPDATE_SUMMARY};
