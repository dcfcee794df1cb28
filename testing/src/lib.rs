//! # azd-mcp Testing
//!
//! Test doubles and fixtures for the azd-mcp crates.
//!
//! This crate provides:
//! - In-memory schema loaders (`mem://` URIs) that record every fetch
//! - A loader that records any call so tests can assert it was never used
//! - Fixture directories for YAML documents
//! - Sample stable/alpha schemas
//!
//! ## Example
//!
//! ```ignore
//! use azd_mcp_testing::{FixtureDir, StaticLoader, schemas};
//!
//! let loader = StaticLoader::new()
//!     .with_json("mem://stable.json", &schemas::stable())
//!     .with_json("mem://alpha.json", &schemas::alpha());
//! let validator = schemas::validator_for(loader.clone(), &["stable", "alpha"]);
//!
//! let fixtures = FixtureDir::new();
//! let path = fixtures.write("azure.yaml", "name: testapp\n");
//! assert!(validator.validate(&path).await.is_match());
//! ```

/// Mock implementations of `SchemaLoader`
pub mod mocks {
    use azd_mcp_tools::schema::{SchemaError, SchemaLoader};
    use futures::future::BoxFuture;
    use reqwest::Url;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, PoisonError};

    #[derive(Debug, Default)]
    struct CallLog {
        calls: Mutex<Vec<String>>,
    }

    impl CallLog {
        fn record(&self, uri: &Url) {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(uri.to_string());
        }

        fn snapshot(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    /// Serves fixed documents by URI and records every request
    ///
    /// Clones share the same documents and call log.
    #[derive(Debug, Clone, Default)]
    pub struct StaticLoader {
        documents: Arc<HashMap<String, Vec<u8>>>,
        log: Arc<CallLog>,
    }

    impl StaticLoader {
        /// Create a loader with no documents
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Builder: serve raw `bytes` at `uri`
        ///
        /// Must be called before the loader is cloned.
        #[must_use]
        pub fn with_bytes(mut self, uri: &str, bytes: impl Into<Vec<u8>>) -> Self {
            Arc::make_mut(&mut self.documents).insert(uri.to_string(), bytes.into());
            self
        }

        /// Builder: serve `document` serialized as JSON at `uri`
        #[must_use]
        pub fn with_json(self, uri: &str, document: &serde_json::Value) -> Self {
            self.with_bytes(uri, document.to_string())
        }

        /// URIs requested so far, in order
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.log.snapshot()
        }
    }

    impl SchemaLoader for StaticLoader {
        fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, SchemaError>> {
            self.log.record(uri);
            let document = self.documents.get(uri.as_str()).cloned();
            Box::pin(async move {
                document.ok_or_else(|| SchemaError::FetchStatus {
                    uri: uri.to_string(),
                    status: 404,
                })
            })
        }
    }

    /// Loader that must never be reached; every call is recorded and fails
    #[derive(Debug, Clone, Default)]
    pub struct ForbiddenLoader {
        log: Arc<CallLog>,
    }

    impl ForbiddenLoader {
        /// Create the loader
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of times the loader was invoked
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.log.snapshot().len()
        }
    }

    impl SchemaLoader for ForbiddenLoader {
        fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, SchemaError>> {
            self.log.record(uri);
            Box::pin(async move {
                Err(SchemaError::Fetch {
                    uri: uri.to_string(),
                    reason: "forbidden loader was invoked".to_string(),
                })
            })
        }
    }
}

/// YAML fixture files in a temporary directory
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Temporary directory removed on drop
    #[derive(Debug)]
    pub struct FixtureDir {
        dir: tempfile::TempDir,
    }

    impl FixtureDir {
        /// Create a fresh directory
        ///
        /// # Panics
        ///
        /// Panics if the temporary directory cannot be created
        #[must_use]
        #[allow(clippy::expect_used)]
        pub fn new() -> Self {
            Self {
                dir: tempfile::tempdir().expect("temporary directory should be creatable"),
            }
        }

        /// Directory root
        #[must_use]
        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Write `contents` to `name` and return the full path
        ///
        /// # Panics
        ///
        /// Panics if the file cannot be written
        #[allow(clippy::expect_used)]
        pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, contents).expect("fixture file should be writable");
            path
        }
    }

    impl Default for FixtureDir {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Sample schemas and validator wiring for `mem://` candidates
pub mod schemas {
    use crate::mocks::StaticLoader;
    use azd_mcp_tools::schema::{
        CandidateList, LoaderRegistry, SchemaCandidate, SchemaLoader, SchemaValidator,
    };
    use reqwest::Url;
    use serde_json::{Value, json};

    /// URI of a labelled in-memory schema: `mem://<label>.json`
    ///
    /// # Panics
    ///
    /// Panics if `label` does not form a valid URI host
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn mem_uri(label: &str) -> Url {
        Url::parse(&format!("mem://{label}.json")).expect("label should form a valid URI")
    }

    /// Candidate list `mem://<label>.json` for each label, in order
    ///
    /// # Panics
    ///
    /// Panics if `labels` is empty
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn mem_candidates(labels: &[&str]) -> CandidateList {
        CandidateList::new(
            labels
                .iter()
                .map(|label| SchemaCandidate::new(mem_uri(label), *label))
                .collect(),
        )
        .expect("at least one label")
    }

    /// Validator fetching `mem://` candidates through `loader`
    #[must_use]
    pub fn validator_for(loader: impl SchemaLoader + 'static, labels: &[&str]) -> SchemaValidator {
        let loaders = LoaderRegistry::builder().with_loader("mem", loader).build();
        SchemaValidator::new(loaders, mem_candidates(labels))
    }

    /// Loader serving [`stable`] and [`alpha`] at their `mem://` URIs
    #[must_use]
    pub fn stable_and_alpha_loader() -> StaticLoader {
        StaticLoader::new()
            .with_json(mem_uri("stable").as_str(), &stable())
            .with_json(mem_uri("alpha").as_str(), &alpha())
    }

    /// Stable tier: `name` is a required string, no unknown top-level keys
    #[must_use]
    pub fn stable() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "required": ["name"],
            "additionalProperties": false,
            "properties": {
                "name": {"type": "string", "minLength": 2},
                "services": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "required": ["project", "host"],
                        "properties": {
                            "project": {"type": "string"},
                            "language": {"type": "string"},
                            "host": {"enum": ["containerapp", "appservice", "function"]}
                        }
                    }
                }
            }
        })
    }

    /// Alpha tier: stable plus a `workflows` section
    #[must_use]
    pub fn alpha() -> Value {
        let mut schema = stable();
        schema["properties"]["workflows"] = json!({"type": "object"});
        schema
    }
}

/// Tracing output for tests
pub mod logging {
    /// Install a test-friendly subscriber; repeated calls are harmless
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use fixtures::FixtureDir;
pub use logging::init_test_tracing;
pub use mocks::{ForbiddenLoader, StaticLoader};
