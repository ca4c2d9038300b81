//! # Sample Subcommand
//!
//! Run extraction, resolution and aggregation over the built-in dataset.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use regtrace_ingest::sample_dataset;

use crate::pipeline::{build_resolver, compliance_report, load_store, resolve_store, write_output};

/// Arguments for `regtrace sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Report on one market only.
    #[arg(long, short)]
    pub country: Option<String>,

    /// Resolve from keyword rules only.
    #[arg(long)]
    pub no_advisor: bool,

    /// Write the report here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the sample subcommand.
pub fn run_sample(args: &SampleArgs) -> Result<u8> {
    let resolver = build_resolver(args.no_advisor)?;
    let dataset = sample_dataset().context("built-in sample dataset is invalid")?;
    let mut store = load_store(dataset.regulations)?;
    store.set_product(dataset.product);

    let store = resolve_store(store, &resolver)?;
    let report = compliance_report(&store.read(), args.country.as_deref())?;
    write_output(&report, args.out.as_deref())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_report_for_unece() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.json");
        let code = run_sample(&SampleArgs {
            country: Some("UNECE".to_string()),
            no_advisor: true,
            out: Some(out.clone()),
        })
        .unwrap();
        assert_eq!(code, 0);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let unece = &report["countries"][0];
        assert_eq!(unece["total"], 5);
        assert!(unece["coverage_percent"].as_f64().unwrap() < 100.0);
        let actions = unece["actions"].as_array().unwrap();
        assert!(actions
            .iter()
            .any(|a| a["action"].as_str().unwrap().starts_with("Schedule / rerun tests")));
    }
}
