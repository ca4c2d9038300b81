//! # regtrace-ingest — Regulation Ingestion
//!
//! Everything between an acquired regulatory text and stored requirement
//! records:
//!
//! - [`normalize`]: raw EUR-Lex / Federal Register records into
//!   [`Regulation`](regtrace_core::Regulation)s.
//! - [`extract`]: sentence segmentation, obligation detection, engineering
//!   reformulation, and [`RequirementIdIssuer`].
//! - [`compare`]: sentence-level diff between regulation versions.
//! - [`sample`]: the built-in demo dataset.

pub mod compare;
pub mod extract;
pub mod normalize;
pub mod sample;

pub use compare::{compare_versions, VersionDiff};
pub use extract::{
    extract_new_requirements, extract_requirements, is_requirement_sentence,
    requirement_sentences, split_sentences, to_engineering_text, RequirementIdIssuer,
};
pub use normalize::{normalize_batch, normalize_eu_record, normalize_us_record, SourceRecord};
pub use sample::{sample_dataset, SampleDataset};
