//! Name registry: bare names to already-constructed packages and classes.
//!
//! Packages and classes live in separate scopes, so a package and a class may
//! share a name. Registration order is lookup order: a name that is absent was
//! not registered *yet*, which the builder reports as a forward reference.

use std::collections::HashMap;

use crate::model::{ClassId, PackageId};

/// Two independent name scopes, filled while the graph is built.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    packages: HashMap<String, PackageId>,
    classes: HashMap<String, ClassId>,
}

impl NameRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package, shadowing any earlier package of the same name.
    ///
    /// Returns the shadowed id, if any.
    pub fn register_package(&mut self, name: &str, id: PackageId) -> Option<PackageId> {
        let shadowed = self.packages.insert(name.to_string(), id);
        if shadowed.is_some() {
            tracing::warn!(package = name, "package name shadows an earlier package");
        }
        shadowed
    }

    /// Registers a class, shadowing any earlier class of the same name.
    ///
    /// Returns the shadowed id, if any.
    pub fn register_class(&mut self, name: &str, id: ClassId) -> Option<ClassId> {
        let shadowed = self.classes.insert(name.to_string(), id);
        if shadowed.is_some() {
            tracing::warn!(class = name, "class name shadows an earlier class");
        }
        shadowed
    }

    /// The package most recently registered under `name`.
    #[must_use]
    pub fn lookup_package(&self, name: &str) -> Option<PackageId> {
        self.packages.get(name).copied()
    }

    /// The class most recently registered under `name`.
    #[must_use]
    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.classes.get(name).copied()
    }

    /// Number of registered package names.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of registered class names.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let mut registry = NameRegistry::new();
        registry.register_package("Model", PackageId(0));
        registry.register_class(
            "Model",
            ClassId {
                package: 0,
                class: 3,
            },
        );
        assert_eq!(registry.lookup_package("Model"), Some(PackageId(0)));
        assert_eq!(registry.lookup_class("Model").map(ClassId::index), Some(3));
    }

    #[test]
    fn later_registration_shadows() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.register_package("A", PackageId(0)), None);
        assert_eq!(
            registry.register_package("A", PackageId(1)),
            Some(PackageId(0))
        );
        assert_eq!(registry.lookup_package("A"), Some(PackageId(1)));
        assert_eq!(registry.package_count(), 1);
    }

    #[test]
    fn absent_names_are_not_found() {
        let registry = NameRegistry::new();
        assert_eq!(registry.lookup_package("Geometry"), None);
        assert_eq!(registry.lookup_class("Point"), None);
    }
}
