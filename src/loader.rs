//! Loading generated documentation payloads.
//!
//! Payloads come from several generations of the docstring extractor and are
//! loosely shaped: sections may be a single object instead of an array, `args`
//! may be a bare string, fields may be shorthand strings, and the whole thing
//! may be wrapped in a `{"data": ..}` envelope or a `window.globalData = ..;`
//! script. All of that is normalized here, once, into the strict [`Dataset`].

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::model::Dataset;

const SECTIONS: [&str; 3] = ["api", "docs", "types"];
const SCRIPT_PREFIX: &str = "window.globalData";

/// Loads a single payload file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let dataset = parse_payload(&text, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        api = dataset.api.len(),
        docs = dataset.docs.len(),
        types = dataset.types.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Loads a payload held in memory.
pub fn load_str(text: &str) -> Result<Dataset> {
    parse_payload(text, "<memory>")
}

/// Loads and merges every `*.json` payload below `dir`, in path order.
/// Files that cannot be read or are not payloads are skipped with a warning.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Dataset> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut merged = Dataset::default();
    let mut files = 0usize;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match load_file(entry.path()) {
            Ok(dataset) => {
                files += 1;
                merged.merge(dataset);
            }
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "skipping payload");
            }
        }
    }

    tracing::info!(dir = %dir.display(), files, "merged dataset directory");
    Ok(merged)
}

/// Loads from a file or a directory, whichever `path` is.
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if path.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

fn parse_payload(text: &str, origin: &str) -> Result<Dataset> {
    let json = strip_script_wrapper(text);
    let value: Value = serde_json::from_str(json).map_err(|source| Error::Json {
        origin: origin.to_string(),
        source,
    })?;
    let normalized = normalize(value, origin)?;
    serde_json::from_value(normalized).map_err(|source| Error::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Turns `window.globalData = {...};` into `{...}`. Plain JSON passes through.
fn strip_script_wrapper(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix(SCRIPT_PREFIX) {
        Some(rest) => rest
            .trim_start()
            .trim_start_matches('=')
            .trim()
            .trim_end_matches(';')
            .trim_end(),
        None => trimmed,
    }
}

fn normalize(value: Value, origin: &str) -> Result<Value> {
    let Value::Object(mut root) = value else {
        return Err(Error::invalid(origin, "payload is not a JSON object"));
    };

    if !SECTIONS.iter().any(|s| root.contains_key(*s)) {
        match root.remove("data") {
            Some(Value::Object(inner)) => root = inner,
            _ => {
                return Err(Error::invalid(
                    origin,
                    "expected at least one of `api`, `docs`, `types`",
                ))
            }
        }
    }

    let mut out = Map::new();
    for section in SECTIONS {
        let items = match root.remove(section) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(obj @ Value::Object(_)) => vec![obj],
            Some(other) => {
                return Err(Error::invalid(
                    origin,
                    format!("section `{section}` must be an array or object, got {other}"),
                ))
            }
        };
        let items = items
            .into_iter()
            .map(|item| normalize_item(item, section, origin))
            .collect::<Result<Vec<_>>>()?;
        out.insert(section.to_string(), Value::Array(items));
    }
    Ok(Value::Object(out))
}

fn normalize_item(item: Value, section: &str, origin: &str) -> Result<Value> {
    let Value::Object(mut item) = item else {
        return Err(Error::invalid(
            origin,
            format!("entries of `{section}` must be objects"),
        ));
    };

    for key in ["args", "fields"] {
        if let Some(args) = item.remove(key) {
            item.insert(key.to_string(), normalize_fields(args));
        }
    }

    match item.remove("json_body") {
        Some(Value::String(body)) => {
            let parsed = serde_json::from_str::<Value>(&body)
                .unwrap_or_else(|_| serde_json::json!({ "content": body }));
            item.insert("json_body".to_string(), parsed);
        }
        Some(Value::Null) | None => {}
        Some(body) => {
            item.insert("json_body".to_string(), body);
        }
    }

    if let Some(Value::Object(responses)) = item.get_mut("responses") {
        for response in responses.values_mut() {
            if let Value::String(text) = response {
                let text = std::mem::take(text);
                *response = serde_json::json!({ "description": "", "example": text });
            }
        }
    }

    Ok(Value::Object(item))
}

fn normalize_fields(args: Value) -> Value {
    match args {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, spec)| {
                    let spec = match spec {
                        Value::String(declared) => serde_json::json!({ "type": declared }),
                        Value::Null => serde_json::json!({}),
                        other => other,
                    };
                    (name, spec)
                })
                .collect(),
        ),
        Value::String(text) => serde_json::json!({
            "args": { "type": "Unknown", "description": text }
        }),
        _ => Value::Object(Map::new()),
    }
}
