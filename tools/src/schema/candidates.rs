//! Ordered schema candidates, most preferred first

use reqwest::Url;
use std::path::Path;

/// Stable `azure.yaml` schema
pub const AZURE_YAML_STABLE_URI: &str =
    "https://raw.githubusercontent.com/Azure/azure-dev/main/schemas/v1.0/azure.yaml.json";

/// Alpha `azure.yaml` schema (experimental features)
pub const AZURE_YAML_ALPHA_URI: &str =
    "https://raw.githubusercontent.com/Azure/azure-dev/main/schemas/alpha/azure.yaml.json";

/// Error returned for a schema identifier that does not name a loadable URI
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schema identifier '{identifier}': {reason}")]
pub struct InvalidSchemaIdentifier {
    /// Identifier as given
    pub identifier: String,
    /// Why it was rejected
    pub reason: String,
}

/// Resolve a schema identifier to a URI
///
/// `file:` identifiers without an authority (`file:schemas/azure.json`,
/// `file:/opt/schemas/azure.json`) are filesystem paths; relative ones are
/// resolved against the current working directory. Anything else must be an
/// absolute URI.
///
/// # Errors
///
/// Returns `InvalidSchemaIdentifier` if the identifier is not a URI or the
/// working directory cannot be determined
pub fn resolve_identifier(identifier: &str) -> Result<Url, InvalidSchemaIdentifier> {
    let invalid = |reason: String| InvalidSchemaIdentifier {
        identifier: identifier.to_string(),
        reason,
    };

    match identifier.strip_prefix("file:") {
        Some(path) if !path.starts_with("//") => {
            let path = Path::new(path);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map_err(|e| invalid(format!("working directory unavailable: {e}")))?
                    .join(path)
            };
            Url::from_file_path(&path).map_err(|()| invalid("not a local file path".to_string()))
        }
        _ => Url::parse(identifier).map_err(|e| invalid(e.to_string())),
    }
}

/// One schema version the validator is willing to try
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaCandidate {
    /// Where the schema lives
    pub uri: Url,
    /// Human-readable tier, e.g. "stable"
    pub label: String,
}

impl SchemaCandidate {
    /// Create a candidate
    #[must_use]
    pub fn new(uri: Url, label: impl Into<String>) -> Self {
        Self {
            uri,
            label: label.into(),
        }
    }

    /// Create a candidate from a textual identifier
    ///
    /// # Errors
    ///
    /// See [`resolve_identifier`]
    pub fn parse(
        identifier: &str,
        label: impl Into<String>,
    ) -> Result<Self, InvalidSchemaIdentifier> {
        Ok(Self::new(resolve_identifier(identifier)?, label))
    }
}

/// Error returned when building a candidate list with no entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("candidate schema list must not be empty")]
pub struct EmptyCandidateList;

/// Non-empty, ordered list of candidates
///
/// Order is policy: a document valid against several candidates is reported
/// against the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateList {
    candidates: Vec<SchemaCandidate>,
}

impl CandidateList {
    /// Build a list from candidates in priority order
    ///
    /// # Errors
    ///
    /// Returns `EmptyCandidateList` if `candidates` is empty
    pub fn new(candidates: Vec<SchemaCandidate>) -> Result<Self, EmptyCandidateList> {
        if candidates.is_empty() {
            return Err(EmptyCandidateList);
        }
        Ok(Self { candidates })
    }

    /// The published `azure.yaml` schemas: stable, then alpha
    ///
    /// # Panics
    ///
    /// Panics if a hardcoded schema URI fails to parse, which should never
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn azure_yaml() -> Self {
        Self {
            candidates: vec![
                SchemaCandidate::parse(AZURE_YAML_STABLE_URI, "stable")
                    .expect("stable schema URI is valid"),
                SchemaCandidate::parse(AZURE_YAML_ALPHA_URI, "alpha")
                    .expect("alpha schema URI is valid"),
            ],
        }
    }

    /// Candidates in priority order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaCandidate> {
        self.candidates.iter()
    }

    /// Number of candidates (always at least one)
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always `false` for a constructed list
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::azure_yaml()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a SchemaCandidate;
    type IntoIter = std::slice::Iter<'a, SchemaCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
