//! `semio-conformance` — Validates generated artifacts against their schema.
//!
//! Rebuilds the schema from the definition table and checks:
//! - the schema inventory (non-empty, unique class names)
//! - protobuf files (one per package, one message per class, field numbers)
//! - SHACL shapes (Turtle 1.1, node and property shapes)
//!
//! **Usage:**
//! ```text
//! semio-conformance [--config <file>] [--definitions <csv>] [--artifacts <path>]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use semio_clients::config::{BuildConfig, FileConfig, Overrides};
use semio_clients::{load_schema, logging};
use semio_conformance::{run_all, Severity};

/// Run the semio conformance suite.
#[derive(Parser)]
#[command(
    name = "semio-conformance",
    about = "Validate generated semio artifacts against their definitions"
)]
struct Args {
    /// Config file (default: semio.toml, if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Definition table (default: definitions.csv).
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Directory holding the generated artifacts (default: the build output).
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let file = FileConfig::discover(args.config.as_deref())?;
    let config = BuildConfig::resolve(
        file,
        Overrides {
            definitions: args.definitions,
            out: args.artifacts,
            ..Overrides::default()
        },
    );

    let schema = load_schema(&config.definitions, &config.schema)?;
    let report = run_all(&schema, &config.out)?;

    println!("semio Conformance Report");
    println!("========================");
    println!();

    for result in &report.results {
        let status = match result.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        println!("[{}] {} — {}", status, result.validator, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.failure_count();
    let warned = report.warning_count();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.results.len() - failed - warned,
        warned,
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
