//! Shared plumbing of the semio client binaries: configuration, logging and
//! schema loading.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod logging;

use std::path::Path;

use anyhow::{Context, Result};

use semio_schema::{build_schema, read_definitions, Schema};

use config::SchemaConfig;

/// Reads the definition table at `definitions` and resolves it into a schema
/// carrying the identity in `schema`.
///
/// # Errors
///
/// Returns an error if the table cannot be read or a record does not resolve.
pub fn load_schema(definitions: &Path, schema: &SchemaConfig) -> Result<Schema> {
    let records = read_definitions(definitions)
        .with_context(|| format!("Failed to read definitions: {}", definitions.display()))?;
    tracing::debug!(records = records.len(), path = %definitions.display(), "read definitions");
    build_schema(schema.seed(), &records)
        .with_context(|| format!("Failed to resolve definitions: {}", definitions.display()))
}
