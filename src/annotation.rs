//! `@type{Name}` markers embedded in example values and return docs.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@type\{([^}]+)\}").expect("valid annotation pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub type_name: Option<String>,
}

impl Annotation {
    pub fn is_type_ref(&self) -> bool {
        self.type_name.is_some()
    }
}

/// Detects a marker in a JSON value. Only strings can carry one.
pub fn detect_annotation(value: &Value) -> Annotation {
    match value {
        Value::String(text) => detect_annotation_str(text),
        _ => Annotation::default(),
    }
}

/// Detects the first `@type{Name}` marker in `text`.
pub fn detect_annotation_str(text: &str) -> Annotation {
    Annotation {
        type_name: MARKER_RE
            .captures(text)
            .map(|caps| caps[1].to_string()),
    }
}

/// Removes the first marker and trims what remains, for display.
pub fn strip_annotation(text: &str) -> String {
    MARKER_RE.replace(text, "").trim().to_string()
}
