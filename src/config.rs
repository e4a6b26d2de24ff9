use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::preview::DEFAULT_MAX_EXPANSIONS;
use crate::resolver::{PrimitiveSet, DEFAULT_PRIMITIVES};

/// Site-wide settings, read from a YAML file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub version: String,
    pub theme: Theme,
    /// Display names for the `api`, `types` and `docs` sections.
    pub type_mappings: BTreeMap<String, String>,
    /// Display names for tags. Unmapped tags are title-cased.
    pub tag_mappings: BTreeMap<String, String>,
    /// Type names rendered as built-ins.
    pub primitives: Vec<String>,
    /// How deep hover previews nest before degrading to plain links.
    pub max_preview_depth: usize,
    /// Nested previews allowed under a single type label.
    pub max_preview_expansions: usize,
    /// Markdown file shown on the home page.
    pub welcome: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub type_bg_color: String,
    pub type_text_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#4CAF50".to_string(),
            secondary_color: "#45a049".to_string(),
            type_bg_color: "#f5f0eb".to_string(),
            type_text_color: "#3a2f2a".to_string(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let type_mappings = [("api", "API"), ("types", "Types"), ("docs", "Documentation")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            title: "Documentation".to_string(),
            description: "Welcome to the documentation.".to_string(),
            version: "1.0.0".to_string(),
            theme: Theme::default(),
            type_mappings,
            tag_mappings: BTreeMap::new(),
            primitives: DEFAULT_PRIMITIVES.iter().map(|s| s.to_string()).collect(),
            max_preview_depth: 5,
            max_preview_expansions: DEFAULT_MAX_EXPANSIONS,
            welcome: None,
        }
    }
}

impl SiteConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: SiteConfig =
            serde_yaml::from_str(&text).map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            })?;
        // A relative welcome page is relative to the config file.
        if let (Some(welcome), Some(parent)) = (config.welcome.as_mut(), path.parent()) {
            if welcome.is_relative() {
                *welcome = parent.join(&*welcome);
            }
        }
        tracing::info!(path = %path.display(), title = %config.title, "loaded site configuration");
        Ok(config)
    }

    /// A missing file yields the defaults; a malformed one is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.is_file() => Self::load(path),
            Some(path) => {
                tracing::warn!(path = %path.display(), "no configuration file found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn display_name(&self, section: &str) -> String {
        self.type_mappings
            .get(section)
            .cloned()
            .unwrap_or_else(|| title_case(section))
    }

    pub fn tag_display(&self, tag: &str) -> String {
        self.tag_mappings
            .get(tag)
            .cloned()
            .unwrap_or_else(|| title_case(tag))
    }

    pub fn primitive_set(&self) -> PrimitiveSet {
        PrimitiveSet::new(self.primitives.iter().cloned())
    }
}

/// Upper-cases the first letter of every word and lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.yaml");
        fs::write(
            &path,
            "title: Shop API\ntheme:\n  primary_color: '#112233'\ntag_mappings:\n  users: People\nwelcome: welcome.md\n",
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Shop API");
        assert_eq!(config.theme.primary_color, "#112233");
        assert_eq!(config.theme.secondary_color, "#45a049");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.welcome, Some(dir.path().join("welcome.md")));
        assert_eq!(config.tag_display("users"), "People");
        assert_eq!(config.tag_display("order_items"), "Order_Items");
    }

    #[test]
    fn missing_file_uses_defaults_but_bad_yaml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        assert_eq!(
            SiteConfig::load_or_default(Some(&missing)).unwrap(),
            SiteConfig::default()
        );

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "title: [unclosed").unwrap();
        assert!(matches!(
            SiteConfig::load_or_default(Some(&bad)),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn section_names() {
        let config = SiteConfig::default();
        assert_eq!(config.display_name("docs"), "Documentation");
        assert_eq!(config.display_name("guides"), "Guides");
        assert!(config.primitive_set().contains("str"));
    }
}
