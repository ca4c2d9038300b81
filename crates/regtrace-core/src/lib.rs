#![deny(missing_docs)]

//! # regtrace-core — Foundational Types for regtrace
//!
//! This crate defines the records every other crate in the workspace passes
//! around: regulations, requirements, impacts, products, and history items.
//! It has no internal crate dependencies, only `serde`, `thiserror`
//! and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`TestId`] cannot be passed where
//!    a [`ComponentId`] is expected, and every identifier is validated
//!    non-empty at construction (including on deserialization).
//!
//! 2. **Single [`Criticality`] enum.** Three variants, exhaustive `match`
//!    everywhere. Once an [`Impact`] exists its criticality is never empty.
//!
//! 3. **Two error classes.** [`ValidationError`] and [`InvariantError`],
//!    built with `thiserror`. [`InvariantError`] is reserved for programming
//!    defects (duplicate requirement id, impact without a requirement);
//!    everything else is routine degraded-mode behavior handled by the
//!    caller.

pub mod error;
pub mod history;
pub mod identity;
pub mod impact;
pub mod market;
pub mod product;
pub mod regulation;
pub mod requirement;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{InvariantError, ValidationError};
pub use history::{ChangeType, HistoryItem};
pub use identity::{ComponentId, DocumentId, ProductId, RegulationId, RequirementId, TestId};
pub use impact::{Criticality, Impact};
pub use market::{Market, MarketStatus};
pub use product::Product;
pub use regulation::Regulation;
pub use requirement::{Requirement, RequirementStage};
pub use temporal::Timestamp;
