//! Template-facing views of a [`Schema`].
//!
//! Views resolve every id into names and target types up front, so the
//! templates only ever see plain strings, numbers and flags. Building a view
//! only reads the schema.

use serde::Serialize;

use semio_schema::{
    Cardinality, Characterization, Class, ClassId, Grasshopper, PackageId, Property, Schema,
    TypeRef,
};

use crate::mapping;

/// Identity of the schema being rendered.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaMeta {
    /// Schema name (`Semio`).
    pub name: String,
    /// Schema version.
    pub version: String,
    /// One-line description.
    pub header: String,
}

/// The whole schema.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaView {
    /// Identity of the schema.
    #[serde(flatten)]
    pub meta: SchemaMeta,
    /// Packages in definition order.
    pub packages: Vec<PackageView>,
}

/// One package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageView {
    /// Package name.
    pub name: String,
    /// One-line description.
    pub header: String,
    /// Schema name followed by the package's owner chain, outermost first.
    pub path: Vec<String>,
    /// Protobuf file this package renders to.
    pub file_name: String,
    /// Protobuf files this package depends on: declared imports first, then
    /// packages of message types it uses, without duplicates.
    pub imports: Vec<String>,
    /// Classes in definition order.
    pub classes: Vec<ClassView>,
}

/// One class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassView {
    /// Class name.
    pub name: String,
    /// One-line description.
    pub header: String,
    /// Normalized explanation, empty when none was given.
    pub comment: String,
    /// Super-class, if any.
    pub base: Option<BaseView>,
    /// Grasshopper identifiers, passed through untouched.
    pub grasshopper: Option<Grasshopper>,
    /// Properties in definition order.
    pub fields: Vec<FieldView>,
}

/// The super-class of a class.
#[derive(Debug, Clone, Serialize)]
pub struct BaseView {
    /// Super-class name.
    pub name: String,
    /// Protobuf message type of the super-class.
    pub proto_type: String,
}

/// One property.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    /// Property name as defined.
    pub name: String,
    /// Normalized explanation, empty when none was given.
    pub comment: String,
    /// Cardinality tag.
    pub cardinality: Cardinality,
    /// Protobuf label token for the cardinality.
    pub label: &'static str,
    /// Minimum number of values.
    pub min: u32,
    /// Maximum number of values, absent when unbounded.
    pub max: Option<u32>,
    /// Whether class-typed values are nested inline.
    pub owns: bool,
    /// Whether the property is a disjunction of types.
    pub one_of: bool,
    /// One entry per alternative type (exactly one unless `one_of`).
    pub alternatives: Vec<AlternativeView>,
}

/// How a value is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// A primitive value, always inline.
    Primitive,
    /// An owned class value, nested inline.
    Owned,
    /// A non-owned class value, carried by identifier.
    Reference,
}

/// One alternative type of a property.
#[derive(Debug, Clone, Serialize)]
pub struct AlternativeView {
    /// How the value is carried.
    pub kind: ValueKind,
    /// Primitive or class name.
    pub type_name: String,
    /// Protobuf type of the field.
    pub proto_type: String,
    /// XSD datatype, for primitives only.
    pub xsd: Option<&'static str>,
    /// Appended to the field name (`_id` for references).
    pub suffix: &'static str,
    /// 1-based field slot within the class, before the structural offset.
    pub position: usize,
}

impl SchemaView {
    /// Builds the view of `schema`.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        Self {
            meta: SchemaMeta {
                name: schema.characterization.name.clone(),
                version: schema.version.clone(),
                header: header(&schema.characterization),
            },
            packages: schema
                .package_entries()
                .map(|(id, _)| PackageView::new(schema, id))
                .collect(),
        }
    }
}

impl PackageView {
    /// Builds the view of the package behind `id`.
    #[must_use]
    pub fn new(schema: &Schema, id: PackageId) -> Self {
        let package = schema.package(id);
        let name = package.characterization.name.clone();
        let path = std::iter::once(schema.characterization.name.clone())
            .chain(schema.package_path(id).into_iter().map(str::to_string))
            .collect();
        Self {
            file_name: mapping::proto_file_name(&name),
            header: header(&package.characterization),
            path,
            imports: imports(schema, id),
            classes: package
                .classes
                .iter()
                .map(|class| ClassView::new(schema, id, class))
                .collect(),
            name,
        }
    }
}

impl ClassView {
    /// Builds the view of `class`, owned by `package`.
    #[must_use]
    pub fn new(schema: &Schema, package: PackageId, class: &Class) -> Self {
        let mut position = 0;
        Self {
            name: class.characterization.name.clone(),
            header: header(&class.characterization),
            comment: mapping::normalize_comment(&class.characterization.explanation),
            base: class.super_class.map(|super_class| BaseView {
                name: schema.class(super_class).characterization.name.clone(),
                proto_type: mapping::proto_message_type(schema, package, super_class),
            }),
            grasshopper: class
                .extensions
                .grasshopper
                .clone()
                .filter(|grasshopper| !grasshopper.is_empty()),
            fields: class
                .properties
                .iter()
                .map(|property| FieldView::new(schema, package, property, &mut position))
                .collect(),
        }
    }
}

impl FieldView {
    /// Builds the view of `property`; each alternative takes the next slot
    /// after `position`.
    #[must_use]
    pub fn new(
        schema: &Schema,
        package: PackageId,
        property: &Property,
        position: &mut usize,
    ) -> Self {
        let cardinality = property.type_.cardinality;
        let alternatives = property
            .type_
            .expr
            .alternatives()
            .iter()
            .map(|type_ref| {
                *position += 1;
                AlternativeView::new(schema, package, *type_ref, property.owns, *position)
            })
            .collect();
        Self {
            name: property.characterization.name.clone(),
            comment: mapping::normalize_comment(&property.characterization.explanation),
            cardinality,
            label: mapping::proto_label(cardinality),
            min: cardinality.min(),
            max: cardinality.max(),
            owns: property.owns,
            one_of: property.type_.expr.is_one_of(),
            alternatives,
        }
    }
}

impl AlternativeView {
    /// Builds the view of one alternative type.
    #[must_use]
    pub fn new(
        schema: &Schema,
        package: PackageId,
        type_ref: TypeRef,
        owns: bool,
        position: usize,
    ) -> Self {
        match type_ref {
            TypeRef::Primitive(primitive) => Self {
                kind: ValueKind::Primitive,
                type_name: primitive.name().to_string(),
                proto_type: mapping::proto_scalar(primitive).to_string(),
                xsd: Some(mapping::xsd_datatype(primitive)),
                suffix: "",
                position,
            },
            TypeRef::Class(class) if owns => Self {
                kind: ValueKind::Owned,
                type_name: schema.class(class).characterization.name.clone(),
                proto_type: mapping::proto_message_type(schema, package, class),
                xsd: None,
                suffix: "",
                position,
            },
            TypeRef::Class(class) => Self {
                kind: ValueKind::Reference,
                type_name: schema.class(class).characterization.name.clone(),
                proto_type: mapping::proto_scalar(semio_schema::Primitive::Text).to_string(),
                xsd: None,
                suffix: "_id",
                position,
            },
        }
    }
}

fn header(characterization: &Characterization) -> String {
    mapping::normalize_comment(&characterization.summary())
}

/// Classes whose messages `package` embeds: super-classes and owned
/// class-typed properties. References travel as identifiers and need none.
fn embedded_classes(schema: &Schema, package: PackageId) -> impl Iterator<Item = ClassId> + '_ {
    schema.package(package).classes.iter().flat_map(|class| {
        let owned = class
            .properties
            .iter()
            .filter(|property| property.owns)
            .flat_map(|property| property.type_.expr.alternatives())
            .filter_map(|type_ref| match type_ref {
                TypeRef::Class(class) => Some(*class),
                TypeRef::Primitive(_) => None,
            });
        class.super_class.into_iter().chain(owned)
    })
}

fn imports(schema: &Schema, package: PackageId) -> Vec<String> {
    let declared = schema.package(package).imports.iter().copied();
    let used = embedded_classes(schema, package).map(ClassId::package);
    let mut files: Vec<String> = Vec::new();
    for import in declared.chain(used).filter(|import| *import != package) {
        let file = mapping::proto_file_name(&schema.package(import).characterization.name);
        if !files.contains(&file) {
            files.push(file);
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use semio_schema::{build_schema, DefinitionRecord};

    fn schema(records: &[DefinitionRecord]) -> Schema {
        build_schema(
            Schema::new(Characterization::named("Semio"), "0.1.0"),
            records,
        )
        .unwrap()
    }

    #[test]
    fn positions_run_across_alternatives() {
        let schema = schema(&[
            DefinitionRecord::package("Model"),
            DefinitionRecord::class("Layout"),
            DefinitionRecord::property("Layout", "Name"),
            DefinitionRecord::property("Layout", "Value").kind("Number | Text"),
            DefinitionRecord::property("Layout", "Note"),
        ]);
        let view = SchemaView::new(&schema);
        let positions: Vec<Vec<usize>> = view.packages[0].classes[0]
            .fields
            .iter()
            .map(|field| field.alternatives.iter().map(|a| a.position).collect())
            .collect();
        assert_eq!(positions, vec![vec![1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn imports_include_embedded_packages() {
        let schema = schema(&[
            DefinitionRecord::package("Geometry"),
            DefinitionRecord::class("Point"),
            DefinitionRecord::package("Base"),
            DefinitionRecord::class("Entity"),
            DefinitionRecord::package("Model").imports(&["Base"]),
            DefinitionRecord::class("Layout").kind("Entity"),
            DefinitionRecord::property("Layout", "Origin").kind("Point").owns(true),
            DefinitionRecord::property("Layout", "Anchor").kind("Point"),
        ]);
        let view = SchemaView::new(&schema);
        let model = &view.packages[2];
        assert_eq!(model.imports, vec!["base.proto", "geometry.proto"]);
        assert_eq!(model.path, vec!["Semio", "Model"]);

        let layout = &model.classes[0];
        assert_eq!(layout.base.as_ref().unwrap().proto_type, ".semio.base.Entity");
        let origin = &layout.fields[0].alternatives[0];
        assert_eq!(origin.kind, ValueKind::Owned);
        assert_eq!(origin.proto_type, ".semio.geometry.Point");
        let anchor = &layout.fields[1].alternatives[0];
        assert_eq!(anchor.kind, ValueKind::Reference);
        assert_eq!((anchor.proto_type.as_str(), anchor.suffix), ("string", "_id"));
    }

    #[test]
    fn primitives_are_inline_regardless_of_ownership() {
        let schema = schema(&[
            DefinitionRecord::package("Model"),
            DefinitionRecord::class("Repository"),
            DefinitionRecord::property("Repository", "Url").owns(false),
        ]);
        let view = SchemaView::new(&schema);
        let url = &view.packages[0].classes[0].fields[0].alternatives[0];
        assert_eq!(url.kind, ValueKind::Primitive);
        assert_eq!(url.xsd, Some("xsd:string"));
        assert_eq!(url.suffix, "");
    }
}
