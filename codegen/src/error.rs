//! Generator failures.

use std::io;
use std::path::PathBuf;

/// Why a generator could not produce its files.
///
/// Every variant is fatal to the generator that raised it; other generators
/// of the same dispatch are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// No bundled template carries this name.
    #[error("no bundled template named `{name}`")]
    UnknownTemplate {
        /// Template name.
        name: String,
    },
    /// A template could not be read from the configured directory.
    #[error("cannot read template `{name}` from {}", path.display())]
    TemplateRead {
        /// Template name.
        name: String,
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A template failed to parse or render.
    #[error("template `{name}` failed")]
    Template {
        /// Template name.
        name: String,
        /// Underlying engine error.
        #[source]
        source: tera::Error,
    },
    /// The output directory could not be created.
    #[error("cannot create directory {}", path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An output file could not be written.
    #[error("cannot write {}", path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A generator was selected by a name no built-in generator has.
    #[error("unknown generator `{name}` (available: {available})")]
    UnknownGenerator {
        /// Requested name.
        name: String,
        /// Comma-separated built-in names.
        available: String,
    },
}
