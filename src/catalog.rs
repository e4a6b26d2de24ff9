use std::collections::btree_map::{BTreeMap, Entry};

use crate::model::TypeDefinition;

/// Read-only lookup of type definitions by name.
///
/// Built once per loaded dataset. Every entry's `name` equals its key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeCatalog {
    types: BTreeMap<String, TypeDefinition>,
}

impl TypeCatalog {
    /// Builds a catalog. When two definitions share a name the first one is
    /// kept and the later one is dropped with a warning.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = TypeDefinition>,
    {
        let mut types = BTreeMap::new();
        for def in definitions {
            match types.entry(def.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(def);
                }
                Entry::Occupied(existing) => {
                    tracing::warn!(name = %existing.key(), "duplicate type definition ignored");
                }
            }
        }
        tracing::debug!(count = types.len(), "type catalog built");
        Self { types }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }
}

impl FromIterator<TypeDefinition> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeDefinition>>(iter: I) -> Self {
        Self::from_definitions(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_names() {
        let catalog: TypeCatalog = vec![TypeDefinition::new("B"), TypeDefinition::new("A")]
            .into_iter()
            .collect();
        assert_eq!(catalog.len(), 2);
        for def in catalog.iter() {
            assert_eq!(catalog.get(&def.name), Some(def));
        }
        let names: Vec<_> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut first = TypeDefinition::new("User");
        first.description = "first".into();
        let mut second = TypeDefinition::new("User");
        second.description = "second".into();

        let catalog = TypeCatalog::from_definitions([first, second]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("User").unwrap().description, "first");
    }

    #[test]
    fn missing_names_are_absent() {
        let catalog = TypeCatalog::default();
        assert!(catalog.is_empty());
        assert!(!catalog.contains("Ghost"));
        assert!(catalog.get("Ghost").is_none());
    }
}
