//! semio schema model, resolved from flat definition tables.
//!
//! The `semio-schema` crate reads an ordered table of definition records
//! (packages, classes, properties) and resolves the name strings in it into a
//! linked [`Schema`]: packages own classes, classes own properties, and every
//! other relationship is a typed reference into the same schema.
//!
//! # Entry Point
//!
//! ```
//! use semio_schema::{build_schema, Cardinality, Characterization, DefinitionRecord, Schema};
//!
//! let records = [
//!     DefinitionRecord::package("Model"),
//!     DefinitionRecord::class("Repository").owned_by("Model"),
//!     DefinitionRecord::property("Repository", "Url")
//!         .kind("Text")
//!         .cardinality(Cardinality::ExactlyOne)
//!         .owns(true),
//! ];
//! let seed = Schema::new(Characterization::named("Semio"), "0.1.0");
//! let schema = build_schema(seed, &records).unwrap();
//! assert_eq!(schema.packages[0].classes[0].properties[0].characterization.name, "Url");
//! ```
//!
//! # Reading Tables
//!
//! ```no_run
//! let records = semio_schema::read_definitions(std::path::Path::new("definitions.csv")).unwrap();
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod definition;
pub mod error;
pub mod model;
pub mod registry;

pub use builder::{build_schema, BuildState};
pub use definition::{parse_definitions, read_definitions, Category, DefinitionRecord, SourceError};
pub use error::{ReferenceKind, ResolutionError};
pub use model::{
    Cardinality, Characterization, Class, ClassId, Extensions, Grasshopper, Package, PackageId,
    Primitive, Property, PropertyType, Schema, TypeExpr, TypeRef,
};
pub use registry::NameRegistry;
