//! # regtrace-impact — Impact Inference
//!
//! Turns a free-text [`Requirement`](regtrace_core::Requirement) into a
//! structured [`Impact`](regtrace_core::Impact): the components, tests and
//! documents it touches, its criticality, and recommended validation work.
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────────┐
//!   Requirement ──────▶│  ImpactAdvisor   │── Option<AdvisorImpact> ──┐
//!        │             └──────────────────┘                          │
//!        │             ┌──────────────────┐                          ▼
//!        ├────────────▶│   RuleTables     │── ids ──────────▶ resolver::merge ──▶ Impact
//!        │             └──────────────────┘                          ▲
//!        │             ┌──────────────────┐                          │
//!        └────────────▶│ classify/synthesize│── gap fill ────────────┘
//!                      └──────────────────┘
//! ```
//!
//! The advisor capability is defined here; its HTTP implementation lives in
//! `regtrace-advisor-client` so this crate stays transport-free.

pub mod actions;
pub mod advisor;
pub mod criticality;
pub mod resolver;
pub mod rules;

pub use actions::synthesize;
pub use advisor::{
    build_prompt, extract_json_object, AdvisorImpact, AdvisorOutputError, ImpactAdvisor,
    MockAdvisor, NoAdvisor,
};
pub use criticality::classify;
pub use resolver::{merge, ImpactResolver};
pub use rules::{KeywordTable, RuleTables};
