use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::TypeCatalog;

/// A fully loaded documentation payload.
///
/// Produced by [`crate::loader`], which normalizes the loose shapes found in
/// generated payloads before anything here is constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub api: Vec<ApiEndpoint>,
    #[serde(default)]
    pub docs: Vec<DocItem>,
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl Dataset {
    /// Builds the type catalog for this dataset.
    pub fn catalog(&self) -> TypeCatalog {
        TypeCatalog::from_definitions(self.types.iter().cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.api.is_empty() && self.docs.is_empty() && self.types.is_empty()
    }

    /// Appends every item of `other`, keeping the existing order first.
    pub fn merge(&mut self, other: Dataset) {
        self.api.extend(other.api);
        self.docs.extend(other.docs);
        self.types.extend(other.types);
    }
}

/// A named, user-defined type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    #[serde(alias = "function_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, alias = "args")]
    pub fields: BTreeMap<String, FieldSpec>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a field with the given declared type, builder style.
    pub fn with_field(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), FieldSpec::new(declared_type));
        self
    }
}

/// One field (or argument) of a type, endpoint or function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Raw type string as authored, e.g. `List[Address]` or `int`.
    #[serde(rename = "type", default)]
    pub declared_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

impl FieldSpec {
    pub fn new(declared_type: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
            ..Self::default()
        }
    }
}

/// An HTTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub function_name: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub function_source: String,
    #[serde(default)]
    pub args: BTreeMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<serde_json::Value>,
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseExample>,
}

/// A documented response for one status code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseExample {
    #[serde(default)]
    pub description: String,
    /// Either a string (possibly carrying an `@type{..}` marker) or raw JSON.
    #[serde(default)]
    pub example: serde_json::Value,
}

/// A documented plain function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocItem {
    pub function_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub function_source: String,
    #[serde(default)]
    pub args: BTreeMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Returns>,
}

/// The return section of a function doc.
///
/// Generated payloads carry either the raw docstring text or an already
/// structured object; both are kept as distinct variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Returns {
    Annotated(String),
    Typed {
        #[serde(default)]
        type_name: String,
        #[serde(default)]
        full_type: String,
        #[serde(default)]
        is_list: bool,
        #[serde(default)]
        is_type_ref: bool,
        #[serde(default)]
        description: String,
    },
}
