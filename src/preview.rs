//! Hover previews for type references.
//!
//! A declared type is turned into a [`TypeLabel`]: a neutral built-in tag, a
//! neutral tag for names the catalog does not know, or a link carrying a
//! nested [`TypePreview`] of the referenced type. Previews nest for every
//! field whose type resolves in turn.
//!
//! Expansion stops at a type already open on the current path, at
//! `max_depth`, and once a label has used up `max_expansions` nested
//! previews; past any of these the reference is still a link, just without
//! a nested preview.

use handlebars::html_escape;
use serde_json::Value;

use crate::annotation::{detect_annotation, detect_annotation_str, strip_annotation};
use crate::catalog::TypeCatalog;
use crate::highlight::pretty_json;
use crate::model::{FieldSpec, Returns, TypeDefinition};
use crate::resolver::{resolve, resolve_declared, PrimitiveSet, Resolution};
use crate::typeref::parse;

pub const DEFAULT_MAX_DEPTH: usize = 5;
/// Nested previews allowed under one top-level label or preview.
pub const DEFAULT_MAX_EXPANSIONS: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeLabel<'a> {
    Primitive {
        text: String,
    },
    Reference {
        text: String,
        definition: &'a TypeDefinition,
        preview: Option<TypePreview<'a>>,
    },
    Unresolved {
        text: String,
    },
}

impl TypeLabel<'_> {
    /// The declared type text, exactly as authored.
    pub fn text(&self) -> &str {
        match self {
            TypeLabel::Primitive { text }
            | TypeLabel::Reference { text, .. }
            | TypeLabel::Unresolved { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypePreview<'a> {
    pub definition: &'a TypeDefinition,
    /// Sorted by field name.
    pub fields: Vec<PreviewField<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewField<'a> {
    pub name: &'a str,
    pub spec: &'a FieldSpec,
    pub label: TypeLabel<'a>,
}

/// How an example value is presented.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleView<'a> {
    /// Annotated with a known type.
    Typed {
        type_name: String,
        body: String,
        preview: TypePreview<'a>,
    },
    /// Annotated with a built-in type.
    Builtin { type_name: String, body: String },
    /// Annotated, but the type is not in the catalog.
    UnknownType { type_name: String, body: String },
    Plain { body: String },
}

/// How a function's return section is presented.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnsView<'a> {
    /// Built-ins and annotated-but-unknown types.
    Neutral { text: String, description: String },
    /// A single, known type reference.
    Preview {
        description: String,
        preview: TypePreview<'a>,
    },
    /// Lists and unannotated text.
    Block {
        label: TypeLabel<'a>,
        description: String,
    },
}

pub struct PreviewBuilder<'a> {
    catalog: &'a TypeCatalog,
    primitives: &'a PrimitiveSet,
    max_depth: usize,
    max_expansions: usize,
}

impl<'a> PreviewBuilder<'a> {
    pub fn new(catalog: &'a TypeCatalog, primitives: &'a PrimitiveSet) -> Self {
        Self {
            catalog,
            primitives,
            max_depth: DEFAULT_MAX_DEPTH,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Label for a declared type string.
    pub fn label(&self, declared: &str) -> TypeLabel<'a> {
        let mut budget = self.max_expansions;
        self.label_on_path(declared, &mut Vec::new(), &mut budget)
    }

    /// Full preview of `definition`, with nested previews for its fields.
    pub fn preview(&self, definition: &'a TypeDefinition) -> TypePreview<'a> {
        let mut path = vec![definition.name.as_str()];
        let mut budget = self.max_expansions;
        self.preview_on_path(definition, &mut path, &mut budget)
    }

    pub fn example(&self, value: &Value) -> ExampleView<'a> {
        let annotation = detect_annotation(value);
        let Some(type_name) = annotation.type_name else {
            let body = match value {
                Value::String(text) => pretty_json(text),
                other => serde_json::to_string_pretty(other).unwrap_or_default(),
            };
            return ExampleView::Plain { body };
        };

        // Only strings carry annotations.
        let text = value.as_str().unwrap_or_default();
        let body = pretty_json(&strip_annotation(text));
        match resolve_declared(&type_name, self.catalog, self.primitives) {
            Resolution::Resolved(definition) => ExampleView::Typed {
                type_name,
                body,
                preview: self.preview(definition),
            },
            Resolution::Primitive => ExampleView::Builtin { type_name, body },
            Resolution::Unresolved => ExampleView::UnknownType { type_name, body },
        }
    }

    pub fn returns(&self, returns: &Returns) -> Option<ReturnsView<'a>> {
        let (type_name, description, is_list, is_type_ref) = match returns {
            Returns::Annotated(text) => match detect_annotation_str(text).type_name {
                Some(name) => {
                    let rest = strip_annotation(text);
                    let description = rest.trim_start_matches(':').trim().to_string();
                    (name, description, false, true)
                }
                None => (text.clone(), String::new(), false, false),
            },
            Returns::Typed {
                type_name,
                full_type,
                is_list,
                is_type_ref,
                description,
            } => {
                let name = if type_name.is_empty() { full_type } else { type_name };
                (name.clone(), description.clone(), *is_list, *is_type_ref)
            }
        };
        if type_name.is_empty() {
            return None;
        }

        let parsed = parse(&type_name);
        let is_list = is_list || parsed.is_list();
        let view = match resolve(&parsed, self.catalog, self.primitives) {
            Resolution::Primitive => ReturnsView::Neutral {
                text: type_name,
                description,
            },
            Resolution::Resolved(definition) if is_type_ref && !is_list => ReturnsView::Preview {
                description,
                preview: self.preview(definition),
            },
            Resolution::Unresolved if is_type_ref && !is_list => ReturnsView::Neutral {
                text: type_name,
                description,
            },
            _ => ReturnsView::Block {
                label: self.label(&type_name),
                description,
            },
        };
        Some(view)
    }

    fn label_on_path(
        &self,
        declared: &str,
        path: &mut Vec<&'a str>,
        budget: &mut usize,
    ) -> TypeLabel<'a> {
        let text = declared.to_string();
        match resolve_declared(declared, self.catalog, self.primitives) {
            Resolution::Primitive => TypeLabel::Primitive { text },
            Resolution::Unresolved => TypeLabel::Unresolved { text },
            Resolution::Resolved(definition) => {
                let name = definition.name.as_str();
                let preview = if *budget == 0
                    || path.len() >= self.max_depth
                    || path.contains(&name)
                {
                    None
                } else {
                    *budget -= 1;
                    path.push(name);
                    let preview = self.preview_on_path(definition, path, budget);
                    path.pop();
                    Some(preview)
                };
                TypeLabel::Reference {
                    text,
                    definition,
                    preview,
                }
            }
        }
    }

    fn preview_on_path(
        &self,
        definition: &'a TypeDefinition,
        path: &mut Vec<&'a str>,
        budget: &mut usize,
    ) -> TypePreview<'a> {
        let fields = definition
            .fields
            .iter()
            .map(|(name, spec)| PreviewField {
                name: name.as_str(),
                spec,
                label: self.label_on_path(&spec.declared_type, path, budget),
            })
            .collect();
        TypePreview { definition, fields }
    }
}

/// Anchor id of an item on its section page.
pub fn anchor_id(section: &str, name: &str) -> String {
    format!("{section}-{name}").to_lowercase().replace(' ', "-")
}

pub fn render_label(label: &TypeLabel<'_>) -> String {
    match label {
        TypeLabel::Primitive { text } => format!(
            "<span class=\"type-tag type-tag--primitive\">{}</span>",
            html_escape(text)
        ),
        TypeLabel::Unresolved { text } => format!(
            "<span class=\"type-tag type-tag--plain\">{}</span>",
            html_escape(text)
        ),
        TypeLabel::Reference {
            text,
            definition,
            preview,
        } => {
            let link = format!(
                "<a class=\"type-tag type-tag--link\" href=\"types.html#{}\">{}</a>",
                html_escape(&anchor_id("types", &definition.name)),
                html_escape(text)
            );
            match preview {
                Some(preview) => format!(
                    "<span class=\"type-ref\" tabindex=\"0\">{link}<span class=\"type-popover\" role=\"tooltip\">{}</span></span>",
                    render_preview(preview)
                ),
                None => format!("<span class=\"type-ref\">{link}</span>"),
            }
        }
    }
}

pub fn render_preview(preview: &TypePreview<'_>) -> String {
    let def = preview.definition;
    let mut html = String::new();
    html.push_str("<span class=\"type-preview\">");
    html.push_str(&format!(
        "<span class=\"type-preview__title\"><strong>{}</strong> (Tag: {})</span>",
        html_escape(&def.name),
        html_escape(&def.tag)
    ));
    if !def.description.is_empty() {
        html.push_str(&format!(
            "<span class=\"type-preview__description\">{}</span>",
            html_escape(&def.description)
        ));
    }
    html.push_str("<span class=\"type-preview__fields\">");
    for field in &preview.fields {
        html.push_str(&format!(
            "<span class=\"type-preview__field\"><span class=\"field-name\">{}</span>: {}",
            html_escape(field.name),
            render_label(&field.label)
        ));
        if !field.spec.description.is_empty() {
            html.push_str(&format!(
                " <span class=\"field-description\">{}</span>",
                html_escape(&field.spec.description)
            ));
        }
        html.push_str("</span>");
    }
    html.push_str("</span></span>");
    html
}
