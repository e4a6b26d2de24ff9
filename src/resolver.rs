use std::collections::BTreeSet;

use crate::catalog::TypeCatalog;
use crate::model::TypeDefinition;
use crate::typeref::{parse, ParsedTypeRef};

/// Built-in names used when no configuration overrides them.
pub const DEFAULT_PRIMITIVES: &[&str] = &[
    "str", "int", "float", "bool", "dict", "list", "object", "array",
];

/// Names that always render as neutral built-ins, even if the catalog
/// happens to define a type with the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveSet {
    names: BTreeSet<String>,
}

impl PrimitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Default for PrimitiveSet {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMITIVES.iter().copied())
    }
}

/// How a declared type relates to the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Primitive,
    Resolved(&'a TypeDefinition),
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn definition(&self) -> Option<&'a TypeDefinition> {
        match self {
            Resolution::Resolved(def) => Some(def),
            _ => None,
        }
    }
}

/// Classifies a parsed type. Primitive names win over catalog entries; an
/// unknown name is an ordinary outcome, not an error.
pub fn resolve<'a>(
    parsed: &ParsedTypeRef,
    catalog: &'a TypeCatalog,
    primitives: &PrimitiveSet,
) -> Resolution<'a> {
    if primitives.contains(&parsed.base_name) {
        return Resolution::Primitive;
    }
    match catalog.get(&parsed.base_name) {
        Some(def) => Resolution::Resolved(def),
        None => Resolution::Unresolved,
    }
}

/// Parses and resolves a raw declared type in one step.
pub fn resolve_declared<'a>(
    raw: &str,
    catalog: &'a TypeCatalog,
    primitives: &PrimitiveSet,
) -> Resolution<'a> {
    resolve(&parse(raw), catalog, primitives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> TypeCatalog {
        TypeCatalog::from_definitions([
            TypeDefinition::new("Address").with_field("city", "str"),
            TypeDefinition::new("str").with_field("shadow", "int"),
        ])
    }

    #[test]
    fn primitives_shadow_catalog_entries() {
        let catalog = catalog();
        let primitives = PrimitiveSet::default();
        for name in DEFAULT_PRIMITIVES {
            assert_eq!(
                resolve(&parse(name), &catalog, &primitives),
                Resolution::Primitive
            );
        }
    }

    #[test]
    fn composite_reference_resolves_to_catalog_entry() {
        let catalog = catalog();
        let resolution = resolve_declared("List[Address]", &catalog, &PrimitiveSet::default());
        assert_eq!(resolution, Resolution::Resolved(catalog.get("Address").unwrap()));
        assert!(std::ptr::eq(
            resolution.definition().unwrap(),
            catalog.get("Address").unwrap()
        ));
    }

    #[test]
    fn unknown_names_are_unresolved() {
        let catalog = catalog();
        let resolution = resolve_declared("Ghost", &catalog, &PrimitiveSet::default());
        assert_eq!(resolution, Resolution::Unresolved);
        assert!(resolution.definition().is_none());
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = catalog();
        let primitives = PrimitiveSet::default();
        let parsed = parse("Address?");
        let before = catalog.clone();
        assert_eq!(
            resolve(&parsed, &catalog, &primitives),
            resolve(&parsed, &catalog, &primitives)
        );
        assert_eq!(catalog, before);
    }

    #[test]
    fn custom_primitive_set() {
        let catalog = catalog();
        let primitives = PrimitiveSet::new(["datetime"]);
        assert_eq!(
            resolve_declared("datetime", &catalog, &primitives),
            Resolution::Primitive
        );
        assert!(matches!(
            resolve_declared("str", &catalog, &primitives),
            Resolution::Resolved(_)
        ));
    }
}
