//! # regtrace CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regtrace_cli::compliance::{run_compliance, ComplianceArgs};
use regtrace_cli::extract::{run_extract, ExtractArgs};
use regtrace_cli::resolve::{run_resolve, ResolveArgs};
use regtrace_cli::sample::{run_sample, SampleArgs};

/// Regulatory traceability pipeline.
///
/// Extracts engineering requirements from regulatory texts, resolves their
/// impact on components, tests and documents, and measures a product's
/// compliance per market.
#[derive(Parser, Debug)]
#[command(name = "regtrace", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract requirements from a regulations file.
    Extract(ExtractArgs),

    /// Extract requirements and resolve their engineering impact.
    Resolve(ResolveArgs),

    /// Report per-market compliance of a product.
    Compliance(ComplianceArgs),

    /// Run the full pipeline on the built-in sample dataset.
    Sample(SampleArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("regtrace CLI starting");

    let result = match &cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Resolve(args) => run_resolve(args),
        Commands::Compliance(args) => run_compliance(args),
        Commands::Sample(args) => run_sample(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
