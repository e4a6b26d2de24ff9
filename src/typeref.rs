//! Composite type syntax: `List[T]`, `T[]` and `T?`.

use regex::Regex;
use std::sync::LazyLock;

static LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"List\[(\w+)\]").expect("valid List[T] pattern"));
static ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\[\]").expect("valid T[] pattern"));
static OPTIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\?$").expect("valid T? pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    List,
}

/// A declared type with its composite syntax stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedTypeRef {
    pub base_name: String,
    pub cardinality: Cardinality,
    pub optional: bool,
}

impl ParsedTypeRef {
    fn single(base_name: &str) -> Self {
        Self {
            base_name: base_name.to_string(),
            cardinality: Cardinality::Single,
            optional: false,
        }
    }

    pub fn is_list(&self) -> bool {
        self.cardinality == Cardinality::List
    }
}

/// Parses a declared type string. Never fails: anything that matches no
/// composite form is returned verbatim as the base name.
///
/// Forms are tried in order `List[T]`, `T[]`, `T?`. The list forms may appear
/// anywhere in the input, the optional form must be the whole input.
pub fn parse(raw: &str) -> ParsedTypeRef {
    if let Some(caps) = LIST_RE.captures(raw) {
        return ParsedTypeRef {
            base_name: caps[1].to_string(),
            cardinality: Cardinality::List,
            optional: false,
        };
    }
    if let Some(caps) = ARRAY_RE.captures(raw) {
        return ParsedTypeRef {
            base_name: caps[1].to_string(),
            cardinality: Cardinality::List,
            optional: false,
        };
    }
    if let Some(caps) = OPTIONAL_RE.captures(raw) {
        return ParsedTypeRef {
            base_name: caps[1].to_string(),
            cardinality: Cardinality::Single,
            optional: true,
        };
    }
    ParsedTypeRef::single(raw)
}

/// Rewrites `List[X]` as `X[]` for interface-style listings.
pub fn interface_notation(raw: &str) -> String {
    match raw.strip_prefix("List[").and_then(|rest| rest.strip_suffix(']')) {
        Some(inner) => format!("{inner}[]"),
        None => raw.to_string(),
    }
}
