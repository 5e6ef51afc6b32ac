//! Error types for loading, parsing, and rendering configurations.

use crate::load::Format;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the loader and scanner.
pub type Result<T> = std::result::Result<T, Error>;

/// A configuration that parsed but does not fit the schema.
///
/// Always carries the path of the offending field, e.g.
/// `packageRules[0].matchManagers[1]`. The empty path means the document root.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required field `{path}`")]
    Missing { path: String },

    #[error("`{path}` must not be empty")]
    Empty { path: String },

    #[error("`{}`: expected {expected}, found {found}", display_path(path))]
    Type {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{path}`: unknown {kind} `{value}`")]
    Unknown {
        path: String,
        kind: &'static str,
        value: String,
    },

    #[error("`{path}`: invalid regular expression `{pattern}`: {source}")]
    Pattern {
        path: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("`{path}`: invalid URL `{value}`: {reason}")]
    Url {
        path: String,
        value: String,
        reason: String,
    },
}

impl SchemaError {
    /// Path of the offending field.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::Missing { path }
            | SchemaError::Empty { path }
            | SchemaError::Type { path, .. }
            | SchemaError::Unknown { path, .. }
            | SchemaError::Pattern { path, .. }
            | SchemaError::Url { path, .. } => path,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}

/// Errors surfaced by file loading, discovery, scanning, and rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} syntax: {message}")]
    Syntax { format: Format, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("no configuration file found under {}", root.display())]
    NotFound { root: PathBuf },

    #[error("cannot render configuration as {format}: {message}")]
    Render { format: Format, message: String },

    #[error("invalid glob pattern `{pattern}`: {message}")]
    Glob { pattern: String, message: String },
}
