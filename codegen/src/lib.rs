//! semio schema generators.
//!
//! Renders a resolved [`Schema`] into target schema artifacts through Tera
//! templates: one protobuf file per package ([`ProtobufGenerator`]) and one
//! SHACL shapes document for the whole schema ([`ShaclGenerator`]).
//!
//! Generators only read the schema, so [`dispatch`] runs a selection of them
//! in parallel. Each generator renders all of its files in memory before
//! writing any; a failing generator leaves no partial output and does not
//! affect the others.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod emit;
pub mod error;
pub mod helpers;
pub mod mapping;
pub mod protobuf;
pub mod registry;
pub mod shacl;
pub mod templates;
pub mod view;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use semio_schema::Schema;

pub use emit::RenderedFile;
pub use error::GenerateError;
pub use protobuf::ProtobufGenerator;
pub use shacl::ShaclGenerator;
pub use templates::TemplateSource;

/// A target format.
pub trait Generator: Send + Sync {
    /// Registry name (`protobuf`, `shacl`).
    fn name(&self) -> &'static str;

    /// Renders every output file in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be loaded or rendered.
    fn render(&self, schema: &Schema) -> Result<Vec<RenderedFile>, GenerateError>;

    /// Renders and writes all files under `out_dir`, returning their paths.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or any file cannot be written; in
    /// both cases nothing this call wrote is left behind.
    fn generate(&self, out_dir: &Path, schema: &Schema) -> Result<Vec<PathBuf>, GenerateError> {
        let files = self.render(schema)?;
        let written = emit::write_all(out_dir, &files)?;
        tracing::info!(generator = self.name(), files = written.len(), "generator finished");
        Ok(written)
    }
}

/// The result of one generator within a [`dispatch`].
#[derive(Debug)]
pub struct GeneratorOutcome {
    /// Name of the generator.
    pub generator: &'static str,
    /// Paths written, or why nothing was.
    pub result: Result<Vec<PathBuf>, GenerateError>,
}

/// Runs `generators` in parallel against the same schema.
///
/// Outcomes are returned in the order of `generators`.
pub fn dispatch(
    generators: &[Box<dyn Generator>],
    out_dir: &Path,
    schema: &Schema,
) -> Vec<GeneratorOutcome> {
    generators
        .par_iter()
        .map(|generator| {
            let result = generator.generate(out_dir, schema);
            if let Err(err) = &result {
                tracing::error!(generator = generator.name(), error = %err, "generator failed");
            }
            GeneratorOutcome {
                generator: generator.name(),
                result,
            }
        })
        .collect()
}

/// A generator that failed during a dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorFailure {
    /// Name of the generator.
    pub generator: String,
    /// Error message, including its causes.
    pub error: String,
}

/// Report of what was generated.
#[derive(Debug, Default, Clone, Serialize)]
pub struct GenerationReport {
    /// Number of packages in the schema.
    pub package_count: usize,
    /// Number of classes in the schema.
    pub class_count: usize,
    /// Number of properties in the schema.
    pub property_count: usize,
    /// Generators that completed.
    pub generators: Vec<String>,
    /// Files written, relative to the output directory.
    pub files: Vec<String>,
    /// Generators that failed.
    pub failures: Vec<GeneratorFailure>,
}

impl GenerationReport {
    /// Summarizes `outcomes` of a dispatch over `schema` into `out_dir`.
    #[must_use]
    pub fn new(schema: &Schema, out_dir: &Path, outcomes: &[GeneratorOutcome]) -> Self {
        let mut report = Self {
            package_count: schema.packages.len(),
            class_count: schema.class_count(),
            property_count: schema.property_count(),
            ..Self::default()
        };
        for outcome in outcomes {
            match &outcome.result {
                Ok(paths) => {
                    report.generators.push(outcome.generator.to_string());
                    report.files.extend(paths.iter().map(|path| {
                        path.strip_prefix(out_dir)
                            .unwrap_or(path)
                            .display()
                            .to_string()
                    }));
                }
                Err(err) => report.failures.push(GeneratorFailure {
                    generator: outcome.generator.to_string(),
                    error: error_chain(err),
                }),
            }
        }
        report
    }

    /// Whether every generator completed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

fn error_chain(err: &GenerateError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
