//! Static documentation sites for generated API, type and function docs.
//!
//! A payload of endpoints, type definitions and function docs is loaded once,
//! indexed into a [`TypeCatalog`], and rendered into Home, API, Types and Docs
//! pages. Every declared type on those pages is parsed ([`typeref`]), resolved
//! against the catalog ([`resolver`]) and rendered with a nested hover preview
//! when it names a known type ([`preview`]).

pub mod annotation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod model;
pub mod preview;
pub mod resolver;
pub mod site;
pub mod typeref;

pub use annotation::{detect_annotation, detect_annotation_str, strip_annotation, Annotation};
pub use catalog::TypeCatalog;
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use model::{ApiEndpoint, Dataset, DocItem, FieldSpec, Returns, TypeDefinition};
pub use preview::{PreviewBuilder, TypeLabel, TypePreview};
pub use resolver::{resolve, resolve_declared, PrimitiveSet, Resolution};
pub use site::{Page, SiteGenerator};
pub use typeref::{parse, Cardinality, ParsedTypeRef};
