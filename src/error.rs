use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for dataset loading and site generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the edges of the crate: reading payloads and config,
/// rendering templates and writing output. Type resolution itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A payload was not valid JSON.
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON that is not a documentation payload.
    #[error("invalid dataset in {origin}: {details}")]
    InvalidDataset { origin: String, details: String },

    /// The site configuration file could not be parsed.
    #[error("invalid configuration '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(origin: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidDataset {
            origin: origin.into(),
            details: details.into(),
        }
    }
}
