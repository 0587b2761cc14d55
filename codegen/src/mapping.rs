//! Schema → target-format mapping tables.
//!
//! Deterministic mappings from schema constructs to protobuf and SHACL
//! identifiers, labels and types.

use semio_schema::{Cardinality, ClassId, PackageId, Primitive, Schema};

/// File extension of protobuf output.
pub const PROTO_EXTENSION: &str = "proto";

/// File extension of SHACL output.
pub const SHAPES_EXTENSION: &str = "shapes.ttl";

/// Field numbers below this offset are reserved for structural fields
/// (`1` = `id`, `2` = `base`); user field `n` (1-based) gets `n + 2`.
pub const FIELD_NUMBER_OFFSET: i64 = 2;

/// Protobuf scalar type for a primitive.
pub fn proto_scalar(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Text => "string",
        Primitive::Number | Primitive::Decimal => "double",
        Primitive::Integer => "int64",
        Primitive::Bool => "bool",
        // ISO 8601 text; keeps generated files free of well-known-type imports.
        Primitive::Date => "string",
    }
}

/// XSD datatype (prefixed name) for a primitive.
pub fn xsd_datatype(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Text => "xsd:string",
        Primitive::Number | Primitive::Decimal => "xsd:decimal",
        Primitive::Integer => "xsd:integer",
        Primitive::Bool => "xsd:boolean",
        Primitive::Date => "xsd:dateTime",
    }
}

/// Protobuf (proto2) field label for a cardinality. One distinct token each.
pub fn proto_label(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::ExactlyOne => "required",
        Cardinality::ZeroOrOne => "optional",
        Cardinality::ZeroOrMany => "repeated",
        Cardinality::OneOrMany => "repeated /* nonempty */",
    }
}

/// Lower-cases the first character of `name` (`"Repository"` → `"repository"`).
pub fn lowercase_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Protobuf package of a schema package: schema name, then the package's
/// owner chain, all lower-cased and dot-separated.
pub fn proto_package(schema: &Schema, package: PackageId) -> String {
    std::iter::once(schema.characterization.name.as_str())
        .chain(schema.package_path(package))
        .map(|segment| segment.to_lowercase())
        .collect::<Vec<_>>()
        .join(".")
}

/// Output file name of a package's protobuf definitions.
pub fn proto_file_name(package_name: &str) -> String {
    format!("{}.{PROTO_EXTENSION}", lowercase_first_letter(package_name))
}

/// Output file name of the shapes document.
pub fn shapes_file_name(schema_name: &str) -> String {
    format!("{}.{SHAPES_EXTENSION}", schema_name.to_lowercase())
}

/// Protobuf type of a message field holding `class`, as seen from `from`.
///
/// Classes of the same package use their bare name; classes of other
/// packages are fully qualified (`.semio.geometry.Point`).
pub fn proto_message_type(schema: &Schema, from: PackageId, class: ClassId) -> String {
    let name = &schema.class(class).characterization.name;
    if class.package() == from {
        name.clone()
    } else {
        format!(".{}.{name}", proto_package(schema, class.package()))
    }
}

/// Namespace IRI of the shapes document (`urn:semio:`).
pub fn shapes_namespace(schema_name: &str) -> String {
    format!("urn:{}:", schema_name.to_lowercase())
}

/// Collapses runs of whitespace (including newlines) into single spaces.
pub fn normalize_comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_first_letter_conversion() {
        assert_eq!(lowercase_first_letter("Model"), "model");
        assert_eq!(lowercase_first_letter("URL"), "uRL");
        assert_eq!(lowercase_first_letter("Übersicht"), "übersicht");
        assert_eq!(lowercase_first_letter(""), "");
    }

    #[test]
    fn proto_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            Cardinality::ALL.into_iter().map(proto_label).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn file_names() {
        assert_eq!(proto_file_name("Model"), "model.proto");
        assert_eq!(shapes_file_name("Semio"), "semio.shapes.ttl");
        assert_eq!(shapes_namespace("Semio"), "urn:semio:");
    }

    #[test]
    fn comments_are_single_line() {
        assert_eq!(
            normalize_comment("is a unique location.\n  An example is: x"),
            "is a unique location. An example is: x"
        );
    }
}
