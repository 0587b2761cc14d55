//! Resolution errors raised while folding records into a schema.

use std::fmt;

use crate::definition::Category;

/// What kind of entity an unresolved reference was expected to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// The enclosing package of a package.
    OwnerPackage,
    /// An imported package.
    Import,
    /// The super-class of a class.
    SuperClass,
    /// The class a property belongs to.
    OwnerClass,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceKind::OwnerPackage => "owner package",
            ReferenceKind::Import => "import",
            ReferenceKind::SuperClass => "super-class",
            ReferenceKind::OwnerClass => "owner class",
        })
    }
}

/// A record references something that cannot be resolved.
///
/// `row` is the 1-based position of the offending record in the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// A name was not registered before the record that uses it.
    #[error(
        "record {row}: {category} `{name}` references {kind} `{reference}` \
         which is not defined before it"
    )]
    Unresolved {
        /// Record position.
        row: usize,
        /// Category of the offending record.
        category: Category,
        /// Name of the offending record.
        name: String,
        /// Role of the reference.
        kind: ReferenceKind,
        /// The name that did not resolve.
        reference: String,
    },
    /// A class row came before any package row.
    #[error("record {row}: class `{name}` is defined before any package")]
    NoCurrentPackage {
        /// Record position.
        row: usize,
        /// Class name.
        name: String,
    },
    /// A property row without an owner came before any class row.
    #[error("record {row}: property `{name}` has no owner and no class precedes it")]
    NoCurrentClass {
        /// Record position.
        row: usize,
        /// Property name.
        name: String,
    },
    /// A class row names an owner other than the package it lands in.
    #[error(
        "record {row}: class `{name}` names owner `{owner}` but is defined \
         inside package `{current}`"
    )]
    OwnerMismatch {
        /// Record position.
        row: usize,
        /// Class name.
        name: String,
        /// Owner column of the record.
        owner: String,
        /// Name of the current package.
        current: String,
    },
    /// A property type is neither a primitive nor a class of the schema.
    #[error("record {row}: property `{class}.{name}` has unknown type `{type_name}`")]
    UnknownType {
        /// Record position.
        row: usize,
        /// Owning class name.
        class: String,
        /// Property name.
        name: String,
        /// The type name that did not resolve.
        type_name: String,
    },
}

impl ResolutionError {
    /// Position of the offending record.
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            ResolutionError::Unresolved { row, .. }
            | ResolutionError::NoCurrentPackage { row, .. }
            | ResolutionError::NoCurrentClass { row, .. }
            | ResolutionError::OwnerMismatch { row, .. }
            | ResolutionError::UnknownType { row, .. } => *row,
        }
    }
}
