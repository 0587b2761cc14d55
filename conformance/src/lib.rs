//! semio conformance suite.
//!
//! Checks a directory of generated artifacts against the schema it was
//! generated from.
//!
//! # Conformance Scope
//!
//! | Component | Standard |
//! |-----------|----------|
//! | Schema | non-empty, class names unique |
//! | Protobuf | one proto2 file per package, one message per class, unique field numbers |
//! | SHACL | Turtle 1.1, one node shape per class, one property shape per property |
//!
//! # Entry Point
//!
//! ```no_run
//! use semio_conformance::run_all;
//! use semio_schema::{build_schema, read_definitions, Characterization, Schema};
//! use std::path::Path;
//!
//! let records = read_definitions(Path::new("definitions.csv")).unwrap();
//! let schema = build_schema(Schema::new(Characterization::named("Semio"), "0.1.0"), &records).unwrap();
//! let report = run_all(&schema, Path::new("generated")).unwrap();
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::Path;

use semio_schema::Schema;

pub use report::{ConformanceReport, Severity, TestResult};

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Schema inventory
/// 2. Protobuf files
/// 3. SHACL shapes
///
/// # Errors
///
/// Returns an error only if a file system operation fails.
pub fn run_all(schema: &Schema, artifacts: &Path) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    report.extend(validators::inventory::validate(schema));
    report.extend(validators::protobuf::validate(schema, artifacts)?);
    report.extend(validators::shacl::validate(schema, artifacts)?);

    tracing::debug!(
        results = report.results.len(),
        failures = report.failure_count(),
        "conformance finished"
    );
    Ok(report)
}
