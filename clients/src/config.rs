//! Build configuration.
//!
//! Loaded from an optional TOML file, then overridden by command-line flags.
//!
//! Example `semio.toml`:
//! ```toml
//! definitions = "definitions.csv"
//! out = "generated"
//! generators = ["protobuf", "shacl"]
//!
//! [schema]
//! name = "Semio"
//! symbol = "⭕"
//! version = "0.1.0"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use semio_codegen::TemplateSource;
use semio_schema::{Characterization, Schema};

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG: &str = "semio.toml";

/// Definition table used when neither the file nor the flags name one.
pub const DEFAULT_DEFINITIONS: &str = "definitions.csv";

/// Output directory used when neither the file nor the flags name one.
pub const DEFAULT_OUT: &str = "generated";

/// Identity of the schema being built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Schema name; also names the shapes file and the protobuf root package.
    pub name: String,
    /// Emblematic glyph.
    pub symbol: String,
    /// Short display name.
    pub logogram: String,
    /// Compact code.
    pub abbreviation: String,
    /// Free-text explanation.
    pub explanation: String,
    /// Schema version.
    pub version: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            name: "Semio".to_string(),
            symbol: String::new(),
            logogram: String::new(),
            abbreviation: String::new(),
            explanation: String::new(),
            version: "0.1.0".to_string(),
        }
    }
}

impl SchemaConfig {
    /// An empty schema carrying this identity.
    pub fn seed(&self) -> Schema {
        Schema::new(
            Characterization {
                symbol: self.symbol.clone(),
                logogram: self.logogram.clone(),
                abbreviation: self.abbreviation.clone(),
                name: self.name.clone(),
                explanation: self.explanation.clone(),
            },
            self.version.clone(),
        )
    }
}

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Definition table.
    pub definitions: Option<PathBuf>,
    /// Output directory.
    pub out: Option<PathBuf>,
    /// Template directory; bundled templates when absent.
    pub templates: Option<PathBuf>,
    /// Generators to run; all when empty.
    pub generators: Vec<String>,
    /// Schema identity.
    pub schema: SchemaConfig,
}

impl FileConfig {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Loads `explicit` if given; otherwise [`DEFAULT_CONFIG`] if it exists;
    /// otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG);
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "using config file");
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--definitions`
    pub definitions: Option<PathBuf>,
    /// `--out`
    pub out: Option<PathBuf>,
    /// `--templates`
    pub templates: Option<PathBuf>,
    /// `--generator`, repeatable.
    pub generators: Vec<String>,
}

/// Fully resolved settings of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Definition table.
    pub definitions: PathBuf,
    /// Output directory.
    pub out: PathBuf,
    /// Template source.
    pub templates: TemplateSource,
    /// Generators to run; all when empty.
    pub generators: Vec<String>,
    /// Schema identity.
    pub schema: SchemaConfig,
}

impl BuildConfig {
    /// Applies `overrides` on top of `file`, then the defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let generators = if overrides.generators.is_empty() {
            file.generators
        } else {
            overrides.generators
        };
        Self {
            definitions: overrides
                .definitions
                .or(file.definitions)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEFINITIONS)),
            out: overrides
                .out
                .or(file.out)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT)),
            templates: overrides
                .templates
                .or(file.templates)
                .map_or(TemplateSource::Bundled, TemplateSource::Directory),
            generators,
            schema: file.schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = BuildConfig::resolve(FileConfig::from_toml("").unwrap(), Overrides::default());
        assert_eq!(config.definitions, PathBuf::from("definitions.csv"));
        assert_eq!(config.out, PathBuf::from("generated"));
        assert_eq!(config.templates, TemplateSource::Bundled);
        assert!(config.generators.is_empty());
        assert_eq!(config.schema.name, "Semio");
        assert_eq!(config.schema.version, "0.1.0");
    }

    #[test]
    fn file_values_are_read() {
        let file = FileConfig::from_toml(
            r#"
definitions = "model.csv"
templates = "templates"
generators = ["shacl"]

[schema]
name = "Atlas"
symbol = "🗺️"
version = "2.0.0"
"#,
        )
        .unwrap();
        let config = BuildConfig::resolve(file, Overrides::default());
        assert_eq!(config.definitions, PathBuf::from("model.csv"));
        assert_eq!(
            config.templates,
            TemplateSource::Directory(PathBuf::from("templates"))
        );
        assert_eq!(config.generators, vec!["shacl"]);

        let seed = config.schema.seed();
        assert_eq!(seed.characterization.name, "Atlas");
        assert_eq!(seed.characterization.symbol, "🗺️");
        assert_eq!(seed.version, "2.0.0");
        assert!(seed.packages.is_empty());
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::from_toml("out = \"from-file\"\ngenerators = [\"shacl\"]").unwrap();
        let config = BuildConfig::resolve(
            file,
            Overrides {
                out: Some(PathBuf::from("from-flag")),
                generators: vec!["protobuf".to_string()],
                ..Overrides::default()
            },
        );
        assert_eq!(config.out, PathBuf::from("from-flag"));
        assert_eq!(config.generators, vec!["protobuf"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("output = \"x\"").is_err());
    }

    #[test]
    fn explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::discover(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
