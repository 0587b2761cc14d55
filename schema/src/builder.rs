//! Graph builder: folds definition records into a [`Schema`].
//!
//! The fold is a single left-to-right pass. Its accumulator is a
//! [`BuildState`] (the schema under construction plus the current-package and
//! current-class cursors); the [`NameRegistry`] is passed into every step.
//! Structural references (package owner, imports, super-class, property owner)
//! must name something defined earlier. Property types are resolved once the
//! fold is complete, so a property may be typed with a class defined later.
//!
//! Errors are fail-fast: the first unresolved reference aborts the build and no
//! partial schema is returned.

use crate::definition::{Category, DefinitionRecord};
use crate::error::{ReferenceKind, ResolutionError};
use crate::model::{
    Cardinality, Characterization, Class, ClassId, Package, PackageId, Primitive, Property,
    PropertyType, Schema, TypeExpr, TypeRef,
};
use crate::registry::NameRegistry;

/// A property whose type names are resolved after the fold.
#[derive(Debug, Clone)]
struct PendingProperty {
    row: usize,
    class: ClassId,
    characterization: Characterization,
    cardinality: Cardinality,
    type_names: Vec<String>,
    owns: bool,
}

/// Accumulator threaded through the fold.
#[derive(Debug, Clone)]
pub struct BuildState {
    schema: Schema,
    current_package: Option<PackageId>,
    current_class: Option<ClassId>,
    pending: Vec<PendingProperty>,
}

impl BuildState {
    /// Starts a fold from an empty schema carrying the given identity.
    #[must_use]
    pub fn new(seed: Schema) -> Self {
        Self {
            schema: seed,
            current_package: None,
            current_class: None,
            pending: Vec::new(),
        }
    }

    /// The package later `class` rows attach to.
    #[must_use]
    pub fn current_package(&self) -> Option<PackageId> {
        self.current_package
    }

    /// The class ownerless `property` rows attach to.
    #[must_use]
    pub fn current_class(&self) -> Option<ClassId> {
        self.current_class
    }

    /// The schema built so far. Properties appear only after [`finish`](Self::finish).
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Applies one record. `row` is its 1-based position, used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the record references a package or class
    /// that has not been registered yet.
    pub fn step(
        self,
        registry: &mut NameRegistry,
        row: usize,
        record: &DefinitionRecord,
    ) -> Result<Self, ResolutionError> {
        tracing::debug!(row, category = %record.category, name = %record.name, "fold record");
        match record.category {
            Category::Term => Ok(self),
            Category::Package => self.package(registry, row, record),
            Category::Class => self.class(registry, row, record),
            Category::Property => self.property(registry, row, record),
            Category::Other(_) => {
                tracing::debug!(row, category = %record.category, "skipping record");
                Ok(self)
            }
        }
    }

    fn package(
        mut self,
        registry: &mut NameRegistry,
        row: usize,
        record: &DefinitionRecord,
    ) -> Result<Self, ResolutionError> {
        let owner = resolve_optional(record.owner.trim(), |name| {
            registry
                .lookup_package(name)
                .ok_or_else(|| unresolved(row, record, ReferenceKind::OwnerPackage, name))
        })?;
        let imports = record
            .import_names()
            .map(|name| {
                registry
                    .lookup_package(name)
                    .ok_or_else(|| unresolved(row, record, ReferenceKind::Import, name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let characterization = record.characterization();
        let id = self.schema.push_package(Package {
            characterization,
            owner,
            imports,
            classes: Vec::new(),
        });
        registry.register_package(&record.name, id);
        self.current_package = Some(id);
        self.current_class = None;
        Ok(self)
    }

    fn class(
        mut self,
        registry: &mut NameRegistry,
        row: usize,
        record: &DefinitionRecord,
    ) -> Result<Self, ResolutionError> {
        let package = self
            .current_package
            .ok_or_else(|| ResolutionError::NoCurrentPackage {
                row,
                name: record.name.clone(),
            })?;
        let owner = record.owner.trim();
        let current = &self.schema.package(package).characterization.name;
        if !owner.is_empty() && owner != current {
            return Err(ResolutionError::OwnerMismatch {
                row,
                name: record.name.clone(),
                owner: owner.to_string(),
                current: current.clone(),
            });
        }
        let super_class = resolve_optional(record.kind.trim(), |name| {
            registry
                .lookup_class(name)
                .ok_or_else(|| unresolved(row, record, ReferenceKind::SuperClass, name))
        })?;

        let id = self.schema.push_class(
            package,
            Class {
                characterization: record.characterization(),
                super_class,
                properties: Vec::new(),
                extensions: record.extensions(),
            },
        );
        registry.register_class(&record.name, id);
        self.current_class = Some(id);
        Ok(self)
    }

    fn property(
        mut self,
        registry: &mut NameRegistry,
        row: usize,
        record: &DefinitionRecord,
    ) -> Result<Self, ResolutionError> {
        let owner = record.owner.trim();
        let class = if owner.is_empty() {
            self.current_class
                .ok_or_else(|| ResolutionError::NoCurrentClass {
                    row,
                    name: record.name.clone(),
                })?
        } else {
            registry
                .lookup_class(owner)
                .ok_or_else(|| unresolved(row, record, ReferenceKind::OwnerClass, owner))?
        };

        let mut type_names: Vec<String> = record.type_names().map(str::to_string).collect();
        if type_names.is_empty() {
            type_names.push(Primitive::Text.name().to_string());
        }
        self.pending.push(PendingProperty {
            row,
            class,
            characterization: record.characterization(),
            cardinality: record.property_cardinality.unwrap_or_default(),
            type_names,
            owns: record.property_owns,
        });
        Ok(self)
    }

    /// Resolves property types and returns the frozen schema.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownType`] for the first property type that
    /// is neither a primitive nor a registered class.
    pub fn finish(self, registry: &NameRegistry) -> Result<Schema, ResolutionError> {
        let BuildState {
            mut schema,
            pending,
            ..
        } = self;
        for property in pending {
            let alternatives = property
                .type_names
                .iter()
                .map(|name| resolve_type(registry, name))
                .collect::<Option<Vec<_>>>();
            let expr = alternatives.and_then(TypeExpr::from_alternatives);
            let Some(expr) = expr else {
                let type_name = property
                    .type_names
                    .iter()
                    .find(|name| resolve_type(registry, name).is_none())
                    .cloned()
                    .unwrap_or_default();
                return Err(ResolutionError::UnknownType {
                    row: property.row,
                    class: schema.class(property.class).characterization.name.clone(),
                    name: property.characterization.name,
                    type_name,
                });
            };
            schema.class_mut(property.class).properties.push(Property {
                characterization: property.characterization,
                type_: PropertyType {
                    cardinality: property.cardinality,
                    expr,
                },
                owns: property.owns,
            });
        }
        tracing::debug!(
            packages = schema.packages.len(),
            classes = schema.class_count(),
            properties = schema.property_count(),
            "schema resolved"
        );
        Ok(schema)
    }
}

/// Primitive names win over class names.
fn resolve_type(registry: &NameRegistry, name: &str) -> Option<TypeRef> {
    Primitive::from_name(name)
        .map(TypeRef::Primitive)
        .or_else(|| registry.lookup_class(name).map(TypeRef::Class))
}

fn resolve_optional<T>(
    name: &str,
    resolve: impl FnOnce(&str) -> Result<T, ResolutionError>,
) -> Result<Option<T>, ResolutionError> {
    if name.is_empty() {
        Ok(None)
    } else {
        resolve(name).map(Some)
    }
}

fn unresolved(
    row: usize,
    record: &DefinitionRecord,
    kind: ReferenceKind,
    reference: &str,
) -> ResolutionError {
    ResolutionError::Unresolved {
        row,
        category: record.category.clone(),
        name: record.name.clone(),
        kind,
        reference: reference.to_string(),
    }
}

/// Folds `records` in order into a schema seeded with `seed`'s identity.
///
/// # Errors
///
/// Returns the first [`ResolutionError`] encountered.
pub fn build_schema<'a, I>(seed: Schema, records: I) -> Result<Schema, ResolutionError>
where
    I: IntoIterator<Item = &'a DefinitionRecord>,
{
    let mut registry = NameRegistry::new();
    let state = records
        .into_iter()
        .enumerate()
        .try_fold(BuildState::new(seed), |state, (index, record)| {
            state.step(&mut registry, index + 1, record)
        })?;
    state.finish(&registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Schema {
        Schema::new(Characterization::named("Semio"), "0.1.0")
    }

    #[test]
    fn cursor_follows_latest_package() {
        let mut registry = NameRegistry::new();
        let state = BuildState::new(seed())
            .step(&mut registry, 1, &DefinitionRecord::package("A"))
            .unwrap()
            .step(&mut registry, 2, &DefinitionRecord::package("B"))
            .unwrap();
        assert_eq!(state.current_package(), registry.lookup_package("B"));
        let state = state
            .step(&mut registry, 3, &DefinitionRecord::class("Point"))
            .unwrap();
        let point = registry.lookup_class("Point").unwrap();
        assert_eq!(Some(point.package()), registry.lookup_package("B"));
        assert_eq!(state.current_class(), Some(point));
    }

    #[test]
    fn term_and_unknown_rows_are_skipped() {
        let mut other = DefinitionRecord::term("Enum");
        other.category = Category::Other("enum".to_string());
        let schema = build_schema(seed(), &[DefinitionRecord::term("Glossary"), other]).unwrap();
        assert!(schema.packages.is_empty());
    }

    #[test]
    fn ownerless_property_attaches_to_current_class() {
        let records = [
            DefinitionRecord::package("Model"),
            DefinitionRecord::class("Repository"),
            DefinitionRecord::property("", "Url"),
        ];
        let schema = build_schema(seed(), &records).unwrap();
        assert_eq!(schema.packages[0].classes[0].properties.len(), 1);
    }

    #[test]
    fn ownerless_property_without_class_fails() {
        let records = [
            DefinitionRecord::package("Model"),
            DefinitionRecord::property("", "Url"),
        ];
        let err = build_schema(seed(), &records).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::NoCurrentClass {
                row: 2,
                name: "Url".to_string()
            }
        );
    }

    #[test]
    fn primitive_names_win_over_classes() {
        let registry = NameRegistry::new();
        assert_eq!(
            resolve_type(&registry, "Bool"),
            Some(TypeRef::Primitive(Primitive::Bool))
        );
        assert_eq!(resolve_type(&registry, "Layout"), None);
    }
}
