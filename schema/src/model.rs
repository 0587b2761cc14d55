//! Core schema model types.
//!
//! A [`Schema`] owns its packages, every [`Package`] owns its classes and every
//! [`Class`] owns its properties. All other relationships (package owner,
//! imports, super-class, class-typed properties) are typed indices into the
//! schema's own sequences, so ownership only ever points downwards.
//! Schemas are produced by [`build_schema`](crate::build_schema).

use serde::Serialize;

/// The identity/display bundle attached to every named schema entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Characterization {
    /// Emblematic glyph (e.g. `"🗃️"`).
    pub symbol: String,
    /// Short display name.
    pub logogram: String,
    /// Compact code (e.g. `"repo"`).
    pub abbreviation: String,
    /// Canonical identifier used for lookups (e.g. `"Repository"`).
    pub name: String,
    /// Free-text explanation.
    pub explanation: String,
}

impl Characterization {
    /// Creates a characterization that only carries a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// One-line description: symbol, name, codes and explanation.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {} ({}/{}) {}",
            self.symbol, self.name, self.abbreviation, self.logogram, self.explanation
        )
        .trim()
        .to_string()
    }

    /// Compact label: name followed by symbol and codes.
    #[must_use]
    pub fn short(&self) -> String {
        format!(
            "{} ({}{}/{})",
            self.name, self.symbol, self.abbreviation, self.logogram
        )
    }
}

/// Index of a [`Package`] inside its [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageId(pub(crate) usize);

impl PackageId {
    /// Position of the package in [`Schema::packages`].
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a [`Class`] inside its [`Schema`].
///
/// The id carries the owning package, which is how a class knows where it
/// lives without a back-pointer from the class to its package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId {
    pub(crate) package: usize,
    pub(crate) class: usize,
}

impl ClassId {
    /// The package that owns this class.
    #[must_use]
    pub fn package(self) -> PackageId {
        PackageId(self.package)
    }

    /// Position of the class in its package's [`Package::classes`].
    #[must_use]
    pub fn index(self) -> usize {
        self.class
    }
}

/// How many values a property may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// Exactly one value (`1`).
    #[default]
    ExactlyOne,
    /// Zero or one value (`?`).
    ZeroOrOne,
    /// Any number of values (`*`).
    ZeroOrMany,
    /// At least one value (`+`).
    OneOrMany,
}

impl Cardinality {
    /// All cardinalities in declaration order.
    pub const ALL: [Cardinality; 4] = [
        Cardinality::ExactlyOne,
        Cardinality::ZeroOrOne,
        Cardinality::ZeroOrMany,
        Cardinality::OneOrMany,
    ];

    /// Parses a glyph (`1`, `?`, `*`, `+`) or a long spelling
    /// (`exactly-one`, `zero-or-one`, `zero-or-many`, `one-or-many`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "exactly-one" => Some(Cardinality::ExactlyOne),
            "?" | "zero-or-one" => Some(Cardinality::ZeroOrOne),
            "*" | "zero-or-many" => Some(Cardinality::ZeroOrMany),
            "+" | "one-or-many" => Some(Cardinality::OneOrMany),
            _ => None,
        }
    }

    /// The glyph used in definition tables.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Cardinality::ExactlyOne => "1",
            Cardinality::ZeroOrOne => "?",
            Cardinality::ZeroOrMany => "*",
            Cardinality::OneOrMany => "+",
        }
    }

    /// The long spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::ExactlyOne => "exactly-one",
            Cardinality::ZeroOrOne => "zero-or-one",
            Cardinality::ZeroOrMany => "zero-or-many",
            Cardinality::OneOrMany => "one-or-many",
        }
    }

    /// Minimum number of values.
    #[must_use]
    pub fn min(self) -> u32 {
        match self {
            Cardinality::ExactlyOne | Cardinality::OneOrMany => 1,
            Cardinality::ZeroOrOne | Cardinality::ZeroOrMany => 0,
        }
    }

    /// Maximum number of values, `None` when unbounded.
    #[must_use]
    pub fn max(self) -> Option<u32> {
        match self {
            Cardinality::ExactlyOne | Cardinality::ZeroOrOne => Some(1),
            Cardinality::ZeroOrMany | Cardinality::OneOrMany => None,
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in value types a property can hold without naming a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    /// Free text.
    Text,
    /// Any number.
    Number,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
    /// Truth value.
    Bool,
    /// Calendar date and time.
    Date,
}

impl Primitive {
    /// All primitives.
    pub const ALL: [Primitive; 6] = [
        Primitive::Text,
        Primitive::Number,
        Primitive::Integer,
        Primitive::Decimal,
        Primitive::Bool,
        Primitive::Date,
    ];

    /// Looks a primitive up by its definition-table name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Definition-table name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Text => "Text",
            Primitive::Number => "Number",
            Primitive::Integer => "Integer",
            Primitive::Decimal => "Decimal",
            Primitive::Bool => "Bool",
            Primitive::Date => "Date",
        }
    }
}

/// A single named type: a primitive or a class of the same schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeRef {
    /// A built-in value type.
    Primitive(Primitive),
    /// A class of the schema.
    Class(ClassId),
}

/// The type of a property: one type, or one of several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeExpr {
    /// Exactly one type.
    Single(TypeRef),
    /// A disjunction of at least two alternatives.
    OneOf(Vec<TypeRef>),
}

impl TypeExpr {
    /// Builds a type from its alternatives in order.
    ///
    /// A single alternative yields [`TypeExpr::Single`]; duplicates are
    /// dropped. Returns `None` for an empty list.
    #[must_use]
    pub fn from_alternatives(alternatives: Vec<TypeRef>) -> Option<Self> {
        let mut unique: Vec<TypeRef> = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            if !unique.contains(&alternative) {
                unique.push(alternative);
            }
        }
        match unique.len() {
            0 => None,
            1 => Some(TypeExpr::Single(unique[0])),
            _ => Some(TypeExpr::OneOf(unique)),
        }
    }

    /// The alternatives of this type (one for [`TypeExpr::Single`]).
    #[must_use]
    pub fn alternatives(&self) -> &[TypeRef] {
        match self {
            TypeExpr::Single(single) => std::slice::from_ref(single),
            TypeExpr::OneOf(many) => many,
        }
    }

    /// Whether this is a disjunction.
    #[must_use]
    pub fn is_one_of(&self) -> bool {
        matches!(self, TypeExpr::OneOf(_))
    }
}

/// Type descriptor of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyType {
    /// How many values the property holds.
    pub cardinality: Cardinality,
    /// What the values are.
    pub expr: TypeExpr,
}

/// A property owned by a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Identity of the property.
    pub characterization: Characterization,
    /// Type and cardinality.
    pub type_: PropertyType,
    /// `true`: the value is nested inline and shares the parent's lifetime.
    /// `false`: the value is referenced by identifier only.
    pub owns: bool,
}

/// Grasshopper component identifiers attached to a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grasshopper {
    /// Component guid.
    pub guid: String,
    /// Guid of the construct component.
    pub construct_guid: String,
    /// Guid of the destruct component.
    pub destruct_guid: String,
}

impl Grasshopper {
    /// Whether no guid is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guid.is_empty() && self.construct_guid.is_empty() && self.destruct_guid.is_empty()
    }
}

/// Platform extension identifiers. Passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extensions {
    /// Grasshopper identifiers, if any were given.
    pub grasshopper: Option<Grasshopper>,
}

/// A class owned by a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Class {
    /// Identity of the class.
    pub characterization: Characterization,
    /// Single super-class, `None` for a root class.
    pub super_class: Option<ClassId>,
    /// Owned properties in definition order.
    pub properties: Vec<Property>,
    /// Opaque platform extension identifiers.
    pub extensions: Extensions,
}

/// A package: a named group of classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    /// Identity of the package.
    pub characterization: Characterization,
    /// Enclosing package, `None` at top level.
    pub owner: Option<PackageId>,
    /// Imported packages in declaration order.
    pub imports: Vec<PackageId>,
    /// Owned classes in definition order.
    pub classes: Vec<Class>,
}

/// The resolved object graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Identity of the whole schema.
    pub characterization: Characterization,
    /// Schema version (e.g. `"0.1.0"`).
    pub version: String,
    /// Packages in definition order.
    pub packages: Vec<Package>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(characterization: Characterization, version: impl Into<String>) -> Self {
        Self {
            characterization,
            version: version.into(),
            packages: Vec::new(),
        }
    }

    /// The package behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued for this schema.
    #[must_use]
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    /// The class behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued for this schema.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.packages[id.package].classes[id.class]
    }

    /// The package that owns the class behind `id`.
    #[must_use]
    pub fn package_of(&self, id: ClassId) -> &Package {
        self.package(id.package())
    }

    /// Iterates packages with their ids, in definition order.
    pub fn package_entries(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(index, package)| (PackageId(index), package))
    }

    /// Iterates all classes with their ids, package by package.
    pub fn class_entries(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.packages.iter().enumerate().flat_map(|(p, package)| {
            package.classes.iter().enumerate().map(move |(c, class)| {
                (
                    ClassId {
                        package: p,
                        class: c,
                    },
                    class,
                )
            })
        })
    }

    /// Looks up the first package with the given name.
    #[must_use]
    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.package_entries()
            .find(|(_, p)| p.characterization.name == name)
            .map(|(id, _)| id)
    }

    /// Looks up the first class with the given name.
    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.class_entries()
            .find(|(_, c)| c.characterization.name == name)
            .map(|(id, _)| id)
    }

    /// Total number of classes across all packages.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.packages.iter().map(|p| p.classes.len()).sum()
    }

    /// Total number of properties across all classes.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.class_entries().map(|(_, c)| c.properties.len()).sum()
    }

    /// Chain of package names from the outermost owner down to `id`.
    #[must_use]
    pub fn package_path(&self, id: PackageId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let package = self.package(current);
            path.push(package.characterization.name.as_str());
            // Owners are always defined earlier, so the chain terminates.
            cursor = package.owner.filter(|owner| owner.0 < current.0);
        }
        path.reverse();
        path
    }

    pub(crate) fn push_package(&mut self, package: Package) -> PackageId {
        self.packages.push(package);
        PackageId(self.packages.len() - 1)
    }

    pub(crate) fn push_class(&mut self, package: PackageId, class: Class) -> ClassId {
        let classes = &mut self.packages[package.0].classes;
        classes.push(class);
        ClassId {
            package: package.0,
            class: classes.len() - 1,
        }
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.packages[id.package].classes[id.class]
    }
}
