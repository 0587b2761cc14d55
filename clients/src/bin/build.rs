//! `semio-build` — Compiles a definition table into schema artifacts.
//!
//! Reads the definition records, resolves them into a schema and runs the
//! selected generators against it in parallel.
//!
//! **Outputs:**
//! - `<out>/<package>.proto` — one protobuf (proto2) file per package
//! - `<out>/<schema>.shapes.ttl` — SHACL shapes for the whole schema
//!
//! **Usage:**
//! ```text
//! semio-build [--config <file>] [--definitions <csv>] [--out <path>]
//!             [--templates <dir>] [--generator <name>]... [--json] [--verbose]
//! ```
//!
//! Exits non-zero if any generator fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use semio_clients::config::{BuildConfig, FileConfig, Overrides};
use semio_clients::{load_schema, logging};
use semio_codegen::{dispatch, registry, GenerationReport};

/// Build semio schema artifacts.
#[derive(Parser)]
#[command(name = "semio-build", about = "Compile semio definitions into schema artifacts")]
struct Args {
    /// Config file (default: semio.toml, if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Definition table (default: definitions.csv).
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Output directory for generated artifacts (default: generated).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory to read templates from instead of the bundled ones.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Generator to run; repeat for several (default: all).
    #[arg(long = "generator", value_name = "NAME")]
    generators: Vec<String>,

    /// Print the generation report as JSON.
    #[arg(long)]
    json: bool,

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
            out: args.out,
            templates: args.templates,
            generators: args.generators,
        },
    );

    let schema = load_schema(&config.definitions, &config.schema)?;
    if !args.json {
        println!(
            "{} v{}: {} packages, {} classes, {} properties",
            schema.characterization.name,
            schema.version,
            schema.packages.len(),
            schema.class_count(),
            schema.property_count()
        );
    }

    let generators = registry::select(&config.generators, &config.templates)?;
    let outcomes = dispatch(&generators, &config.out, &schema);
    let report = GenerationReport::new(&schema, &config.out, &outcomes);

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize generation report")?;
        println!("{json}");
    } else {
        for file in &report.files {
            println!("  Written: {}", config.out.join(file).display());
        }
    }

    if !report.all_passed() {
        for failure in &report.failures {
            eprintln!("Generator {} failed: {}", failure.generator, failure.error);
        }
        eprintln!("Build FAILED: {} generator(s) did not finish.", report.failures.len());
        process::exit(1);
    }

    if !args.json {
        println!("Build complete.");
    }
    Ok(())
}
