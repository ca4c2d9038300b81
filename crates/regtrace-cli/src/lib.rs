//! # regtrace-cli — Compliance Pipeline CLI
//!
//! Runs the extraction, resolution and aggregation pipeline over regulation
//! files without the HTTP service:
//!
//! - `regtrace extract` — extract requirements from a regulations file.
//! - `regtrace resolve` — extract, then resolve every requirement's impact.
//! - `regtrace compliance` — measure a product against the resolved
//!   requirements and print per-market coverage and remediation actions.
//! - `regtrace sample` — run the full pipeline on the built-in dataset.
//!
//! Regulation files are JSON or YAML, either a list of regulation records or
//! a bundle with `regulations`, `eur_lex` and `federal_register` keys. The
//! advisor is configured from `REGTRACE_ADVISOR_*` variables and can be
//! switched off with `--no-advisor`.

pub mod compliance;
pub mod extract;
pub mod input;
pub mod pipeline;
pub mod resolve;
pub mod sample;
