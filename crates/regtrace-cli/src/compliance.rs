//! # Compliance Subcommand
//!
//! Measure a product against resolved requirements and print per-market
//! coverage, risk tier and remediation actions.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::input::{load_product, load_regulations};
use crate::pipeline::{build_resolver, compliance_report, load_store, resolve_store, write_output};

/// Arguments for `regtrace compliance`.
#[derive(Args, Debug)]
pub struct ComplianceArgs {
    /// Regulations file (JSON or YAML).
    #[arg(long, short)]
    pub regulations: PathBuf,

    /// Product file (JSON or YAML).
    #[arg(long, short)]
    pub product: PathBuf,

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

/// Execute the compliance subcommand.
pub fn run_compliance(args: &ComplianceArgs) -> Result<u8> {
    let resolver = build_resolver(args.no_advisor)?;
    let product = load_product(&args.product)?;
    let mut store = load_store(load_regulations(&args.regulations)?)?;
    store.set_product(product);

    let store = resolve_store(store, &resolver)?;
    let report = compliance_report(&store.read(), args.country.as_deref())?;
    for row in &report.dashboard {
        tracing::info!(
            country = %row.country,
            coverage = row.coverage_percent,
            risk = %row.risk_tier,
            "market compliance"
        );
    }
    write_output(&report, args.out.as_deref())?;
    Ok(0)
}
