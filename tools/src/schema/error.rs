//! Error types for schema validation

use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while normalizing a document or trying a candidate schema
///
/// Normalization errors (`FileNotFound`, `Syntax`, `Shape`) and
/// `Cancelled` end the whole request. Everything else only rules out the
/// candidate being tried.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Document path does not resolve to a readable file
    #[error("file not found or unreadable: '{}': {source}", path.display())]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML
    #[error("failed to unmarshal YAML: {0}")]
    Syntax(String),

    /// Parsed YAML has no JSON representation (e.g. a sequence used as a map key)
    #[error("failed to convert YAML to JSON: {0}")]
    Shape(String),

    /// No loader registered for the URI scheme
    #[error("unsupported schema URI scheme '{scheme}' in '{uri}'")]
    UnsupportedScheme {
        /// Scheme that had no loader
        scheme: String,
        /// Full schema URI
        uri: String,
    },

    /// Transport failure or timeout while fetching a schema
    #[error("failed to fetch schema '{uri}': {reason}")]
    Fetch {
        /// Schema URI
        uri: String,
        /// Transport error text
        reason: String,
    },

    /// Schema server answered with a non-2xx status
    #[error("failed to fetch schema '{uri}': HTTP status {status}")]
    FetchStatus {
        /// Schema URI
        uri: String,
        /// HTTP status code
        status: u16,
    },

    /// Fetched bytes are not a JSON document
    #[error("failed to parse schema '{uri}': {reason}")]
    SchemaParse {
        /// Schema URI
        uri: String,
        /// Parser error text
        reason: String,
    },

    /// Schema JSON could not be compiled into a validator
    #[error("failed to compile schema '{uri}': {reason}")]
    SchemaCompile {
        /// Schema URI
        uri: String,
        /// Compiler error text
        reason: String,
    },

    /// Document does not satisfy a compiled schema
    #[error("jsonschema validation failed with '{uri}'\n{diagnostic}")]
    Validation {
        /// Schema URI
        uri: String,
        /// One line per violated constraint
        diagnostic: String,
    },

    /// Caller cancelled the request
    #[error("schema validation cancelled")]
    Cancelled,
}

impl SchemaError {
    /// Whether this error aborts the request instead of skipping a candidate
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::Syntax(_) | Self::Shape(_) | Self::Cancelled
        )
    }

    /// Whether this is a semantic validation failure
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub(crate) fn fetch(uri: &Url, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
