//! Validation orchestrator
//!
//! `normalize → for each candidate: fetch → compile → check → decide`.
//!
//! Candidates are awaited one after another, never concurrently: the list
//! order is a preference policy and the first match is authoritative.

use super::candidates::{CandidateList, SchemaCandidate};
use super::engine::{self, PrefetchedSchemas};
use super::error::{Result, SchemaError};
use super::loader::{DEFAULT_FETCH_TIMEOUT, LoaderRegistry};
use super::normalize::normalize_file;
use reqwest::Url;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Terminal result of one validation request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Document is valid against the candidate with this label
    Matched {
        /// Label of the matching candidate
        label: String,
    },
    /// No candidate matched
    Failed {
        /// Most actionable underlying error
        message: String,
    },
}

impl ValidationOutcome {
    /// Whether a candidate matched
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Text handed back to the caller
    ///
    /// A match is one sentence naming the tier; a failure is a JSON object
    /// `{"error": true, "message": "..."}`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Matched { label } => {
                format!("The azure.yaml file is valid against the {label} schema.")
            }
            Self::Failed { message } => json!({
                "error": true,
                "message": message,
            })
            .to_string(),
        }
    }
}

impl From<SchemaError> for ValidationOutcome {
    fn from(error: SchemaError) -> Self {
        Self::Failed {
            message: error.to_string(),
        }
    }
}

/// Construction-time settings for [`SchemaValidator`]
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Timeout for each remote schema fetch
    pub fetch_timeout: Duration,
    /// Candidates in priority order
    pub candidates: CandidateList,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            candidates: CandidateList::azure_yaml(),
        }
    }
}

impl ValidatorConfig {
    /// Builder: set the remote fetch timeout
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Builder: replace the candidate list
    #[must_use]
    pub fn with_candidates(mut self, candidates: CandidateList) -> Self {
        self.candidates = candidates;
        self
    }
}

/// Validates configuration documents against an ordered list of schemas
///
/// Holds no per-request state; one instance can serve concurrent callers.
///
/// ## Example
///
/// ```ignore
/// let validator = SchemaValidator::from_config(ValidatorConfig::default())?;
/// match validator.validate(Path::new("azure.yaml")).await {
///     ValidationOutcome::Matched { label } => println!("valid ({label})"),
///     ValidationOutcome::Failed { message } => eprintln!("{message}"),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SchemaValidator {
    loaders: LoaderRegistry,
    candidates: CandidateList,
}

impl SchemaValidator {
    /// Create a validator from an explicit loader registry and candidate list
    #[must_use]
    pub const fn new(loaders: LoaderRegistry, candidates: CandidateList) -> Self {
        Self {
            loaders,
            candidates,
        }
    }

    /// Create a validator with the standard `file` + `https` loaders
    ///
    /// # Errors
    ///
    /// Returns the HTTP client build error if the TLS backend cannot be initialized
    pub fn from_config(config: ValidatorConfig) -> std::result::Result<Self, reqwest::Error> {
        let loaders = LoaderRegistry::standard(config.fetch_timeout)?;
        Ok(Self::new(loaders, config.candidates))
    }

    /// Candidates this validator tries, in order
    #[must_use]
    pub const fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Validate the document at `path`
    pub async fn validate(&self, path: &Path) -> ValidationOutcome {
        self.validate_with_cancellation(path, &CancellationToken::new())
            .await
    }

    /// Validate the document at `path`, stopping early if `cancel` fires
    ///
    /// Total: every input yields an outcome.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn validate_with_cancellation(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> ValidationOutcome {
        let document = match normalize_file(path).await {
            Ok(document) => document,
            Err(error) => {
                warn!(%error, "document could not be normalized");
                return error.into();
            }
        };

        let mut last_error: Option<SchemaError> = None;
        let mut last_validation_error: Option<SchemaError> = None;

        for candidate in &self.candidates {
            if cancel.is_cancelled() {
                return SchemaError::Cancelled.into();
            }

            debug!(label = %candidate.label, uri = %candidate.uri, "trying candidate schema");

            let attempt = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(SchemaError::Cancelled),
                result = self.try_candidate(candidate, &document) => result,
            };

            match attempt {
                Ok(()) => {
                    info!(label = %candidate.label, "document matched candidate schema");
                    return ValidationOutcome::Matched {
                        label: candidate.label.clone(),
                    };
                }
                Err(error) if error.is_fatal() => return error.into(),
                Err(error) if error.is_validation() => {
                    debug!(label = %candidate.label, %error, "document failed candidate schema");
                    last_validation_error = Some(error);
                }
                Err(error) => {
                    warn!(label = %candidate.label, %error, "candidate schema unavailable");
                    last_error = Some(error);
                }
            }
        }

        // A validation error says more about the document than a fetch failure.
        match last_validation_error.or(last_error) {
            Some(error) => error.into(),
            None => ValidationOutcome::Failed {
                message: "no candidate schema was tried".to_string(),
            },
        }
    }

    async fn try_candidate(&self, candidate: &SchemaCandidate, document: &Value) -> Result<()> {
        let schema = self.loaders.load_schema(&candidate.uri).await?;
        let prefetched = self.prefetch_refs(&schema, &candidate.uri).await?;
        let validator = engine::compile(schema, &candidate.uri, prefetched)?;
        engine::check(&validator, document, &candidate.uri)
    }

    /// Fetch every external document reachable from `root` through `$ref`s
    async fn prefetch_refs(&self, root: &Value, root_uri: &Url) -> Result<PrefetchedSchemas> {
        let mut prefetched = PrefetchedSchemas::default();
        prefetched.insert(root_uri, root.clone());

        let mut pending = engine::external_refs(root, root_uri);
        while let Some(uri) = pending.pop() {
            if prefetched.contains(&uri) {
                continue;
            }
            let document = self.loaders.load_schema(&uri).await?;
            pending.extend(engine::external_refs(&document, &uri));
            prefetched.insert(&uri, document);
        }

        Ok(prefetched)
    }
}
