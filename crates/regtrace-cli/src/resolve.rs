//! # Resolve Subcommand
//!
//! Extract requirements and resolve the engineering impact of each one,
//! printing the impacts in requirement id order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use regtrace_core::Impact;

use crate::input::load_regulations;
use crate::pipeline::{build_resolver, load_store, resolve_store, write_output};

/// Arguments for `regtrace resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Regulations file (JSON or YAML).
    #[arg(long, short)]
    pub regulations: PathBuf,

    /// Resolve from keyword rules only.
    #[arg(long)]
    pub no_advisor: bool,

    /// Write the impacts here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs) -> Result<u8> {
    let resolver = build_resolver(args.no_advisor)?;
    let store = load_store(load_regulations(&args.regulations)?)?;
    let store = resolve_store(store, &resolver)?;
    let impacts: Vec<Impact> = store.read().impacts().values().cloned().collect();
    write_output(&impacts, args.out.as_deref())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_core::{Criticality, TestId};
    use regtrace_ingest::sample::sample_regulations;

    #[test]
    fn resolves_every_requirement_from_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let regs = dir.path().join("regs.json");
        let out = dir.path().join("impacts.json");
        std::fs::write(&regs, serde_json::to_string(&sample_regulations().unwrap()).unwrap())
            .unwrap();

        let code = run_resolve(&ResolveArgs {
            regulations: regs,
            no_advisor: true,
            out: Some(out.clone()),
        })
        .unwrap();
        assert_eq!(code, 0);

        let impacts: Vec<Impact> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(impacts.len(), 11);
        let leak = TestId::new("TEST_LEAK").unwrap();
        assert!(impacts
            .iter()
            .any(|i| i.tests.contains(&leak) && i.criticality == Criticality::High));
    }
}
