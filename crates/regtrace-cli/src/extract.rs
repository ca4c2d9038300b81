//! # Extract Subcommand
//!
//! Register the regulations of a file and print the requirements extracted
//! from them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use regtrace_core::Requirement;

use crate::input::load_regulations;
use crate::pipeline::{load_store, write_output};

/// Arguments for `regtrace extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Regulations file (JSON or YAML).
    #[arg(long, short)]
    pub regulations: PathBuf,

    /// Write the requirements here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the extract subcommand.
pub fn run_extract(args: &ExtractArgs) -> Result<u8> {
    let store = load_store(load_regulations(&args.regulations)?)?;
    let requirements: Vec<&Requirement> = store.requirements().collect();
    tracing::info!(count = requirements.len(), "requirements extracted");
    write_output(&requirements, args.out.as_deref())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrace_ingest::sample::sample_regulations;

    #[test]
    fn writes_extracted_requirements() {
        let dir = tempfile::tempdir().unwrap();
        let regs = dir.path().join("regs.json");
        let out = dir.path().join("reqs.json");
        std::fs::write(&regs, serde_json::to_string(&sample_regulations().unwrap()).unwrap())
            .unwrap();

        let code = run_extract(&ExtractArgs {
            regulations: regs,
            out: Some(out.clone()),
        })
        .unwrap();
        assert_eq!(code, 0);

        let written: Vec<Requirement> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.len(), 11);
        assert!(written.iter().all(|r| r.version == "1.0"));
    }
}
