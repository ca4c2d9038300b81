//! # API Route Modules
//!
//! - `regulations` — catalogue, search, lineage, extraction.
//! - `requirements` — listing, in-place edits, market verdicts.
//! - `impact` — resolve and read impacts.
//! - `compliance` — country dashboard and per-market detail.
//! - `history` — the traceability log.

pub mod compliance;
pub mod history;
pub mod impact;
pub mod regulations;
pub mod requirements;
