//! Definition records: the flat rows a schema is compiled from.
//!
//! Records are read from a CSV table whose header row names the columns
//! (`Category`, `Owner`, `Kind`, `Name`, ...). Only the columns that matter for
//! a row's category are looked at; the rest are carried along and ignored.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;

use crate::model::{Cardinality, Characterization, Extensions, Grasshopper};

/// What a definition row declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Glossary-only entry, produces nothing.
    Term,
    /// A package.
    Package,
    /// A class of the current package.
    Class,
    /// A property of a class.
    Property,
    /// Any other value; the row is skipped.
    Other(String),
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "term" => Category::Term,
            "package" => Category::Package,
            "class" => Category::Class,
            "property" => Category::Property,
            _ => Category::Other(value),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Term => f.write_str("term"),
            Category::Package => f.write_str("package"),
            Category::Class => f.write_str("class"),
            Category::Property => f.write_str("property"),
            Category::Other(other) => f.write_str(other),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

/// One row of the definition table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefinitionRecord {
    /// Row category.
    #[serde(deserialize_with = "de_category")]
    pub category: Category,
    /// Owner name: enclosing package for packages and classes, owning class
    /// for properties.
    #[serde(default)]
    pub owner: String,
    /// Super-class name for classes, type expression for properties.
    #[serde(default)]
    pub kind: String,
    /// Entity name.
    pub name: String,
    /// Characterization symbol.
    #[serde(default)]
    pub symbol: String,
    /// Characterization logogram.
    #[serde(default)]
    pub logogram: String,
    /// Characterization abbreviation.
    #[serde(default)]
    pub abbreviation: String,
    /// Characterization explanation.
    #[serde(default)]
    pub explanation: String,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
    /// Comma-separated imported package names.
    #[serde(default)]
    pub package_imports: String,
    /// Property cardinality; empty means exactly one.
    #[serde(default, deserialize_with = "de_cardinality")]
    pub property_cardinality: Option<Cardinality>,
    /// Whether a property owns its value.
    #[serde(default, deserialize_with = "de_flag")]
    pub property_owns: bool,
    /// Grasshopper component guid.
    #[serde(default)]
    pub grasshopper_guid: String,
    /// Grasshopper construct component guid.
    #[serde(default)]
    pub grasshopper_construct_guid: String,
    /// Grasshopper destruct component guid.
    #[serde(default)]
    pub grasshopper_destruct_guid: String,
}

impl DefinitionRecord {
    fn with_category(category: Category, name: &str) -> Self {
        Self {
            category,
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A `package` row.
    #[must_use]
    pub fn package(name: &str) -> Self {
        Self::with_category(Category::Package, name)
    }

    /// A `class` row.
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::with_category(Category::Class, name)
    }

    /// A `property` row owned by the class `owner`.
    #[must_use]
    pub fn property(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            ..Self::with_category(Category::Property, name)
        }
    }

    /// A `term` row.
    #[must_use]
    pub fn term(name: &str) -> Self {
        Self::with_category(Category::Term, name)
    }

    /// Sets the owner column.
    #[must_use]
    pub fn owned_by(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    /// Sets the kind column (super-class or property type).
    #[must_use]
    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    /// Sets the import list.
    #[must_use]
    pub fn imports(mut self, imports: &[&str]) -> Self {
        self.package_imports = imports.join(", ");
        self
    }

    /// Sets the property cardinality.
    #[must_use]
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.property_cardinality = Some(cardinality);
        self
    }

    /// Sets the ownership flag.
    #[must_use]
    pub fn owns(mut self, owns: bool) -> Self {
        self.property_owns = owns;
        self
    }

    /// The characterization columns of this row.
    #[must_use]
    pub fn characterization(&self) -> Characterization {
        Characterization {
            symbol: self.symbol.clone(),
            logogram: self.logogram.clone(),
            abbreviation: self.abbreviation.clone(),
            name: self.name.clone(),
            explanation: self.explanation.clone(),
        }
    }

    /// Import names: split on commas, trimmed, empty entries skipped.
    pub fn import_names(&self) -> impl Iterator<Item = &str> {
        self.package_imports
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Property type alternatives: split on `|`, trimmed, empty entries skipped.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.kind
            .split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Extension identifiers of a class row.
    #[must_use]
    pub fn extensions(&self) -> Extensions {
        let grasshopper = Grasshopper {
            guid: self.grasshopper_guid.trim().to_string(),
            construct_guid: self.grasshopper_construct_guid.trim().to_string(),
            destruct_guid: self.grasshopper_destruct_guid.trim().to_string(),
        };
        Extensions {
            grasshopper: (!grasshopper.is_empty()).then_some(grasshopper),
        }
    }
}

fn de_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    String::deserialize(deserializer).map(Category::from)
}

fn de_cardinality<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Cardinality>, D::Error> {
    let value = String::deserialize(deserializer)?;
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    Cardinality::parse(value)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid cardinality `{value}`")))
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        other => Err(D::Error::custom(format!("invalid flag `{other}`"))),
    }
}

/// The record source could not be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The definition file could not be opened.
    #[error("failed to open definitions {}: {source}", path.display())]
    Open {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A row could not be parsed.
    #[error("malformed definitions: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads all definition records from a CSV file, in file order.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or any row is malformed.
pub fn read_definitions(path: &Path) -> Result<Vec<DefinitionRecord>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definitions(file)
}

/// Parses definition records from any CSV reader, in input order.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] on the first malformed row.
pub fn parse_definitions<R: Read>(reader: R) -> Result<Vec<DefinitionRecord>, SourceError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let records = csv
        .deserialize::<DefinitionRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = records.len(), "parsed definition records");
    Ok(records)
}
