//! Schema loaders keyed by URI scheme
//!
//! Provides two loaders:
//! - `FileLoader`: `file://` URIs, read from the local filesystem
//! - `HttpLoader`: `https://` (or `http://`) URIs, one GET with a fixed timeout
//!
//! A [`LoaderRegistry`] dispatches on the URI scheme. Adding a scheme (for
//! example an in-memory fixture loader in tests) is one more
//! `with_loader` call on the builder.

use super::error::{Result, SchemaError};
use futures::StreamExt;
use futures::future::BoxFuture;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Maximum schema document size (10MB)
const MAX_SCHEMA_SIZE: usize = 10 * 1024 * 1024;

/// Reference timeout for remote schema fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches raw schema bytes for one URI scheme
pub trait SchemaLoader: Send + Sync {
    /// Fetch the document at `uri`
    ///
    /// # Errors
    ///
    /// Returns `Fetch` or `FetchStatus` if the document cannot be retrieved
    fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// Loader for `file://` URIs
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl SchemaLoader for FileLoader {
    fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let path = uri
                .to_file_path()
                .map_err(|()| SchemaError::fetch(uri, "URI is not a local file path"))?;

            tokio::fs::read(&path)
                .await
                .map_err(|e| SchemaError::fetch(uri, e))
        })
    }
}

/// Loader for remote schemas over HTTP(S)
///
/// Issues exactly one GET per fetch. No retries and no caching: two
/// candidates on the same host are fetched independently.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpLoader {
    /// Create a loader whose requests are bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns the client build error if the TLS backend cannot be initialized
    pub fn new(timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn transport_error(&self, uri: &Url, error: &reqwest::Error) -> SchemaError {
        if error.is_timeout() {
            SchemaError::fetch(uri, format!("request timed out after {:?}", self.timeout))
        } else {
            SchemaError::fetch(uri, error)
        }
    }
}

impl SchemaLoader for HttpLoader {
    fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let response = self
                .client
                .get(uri.clone())
                .send()
                .await
                .map_err(|e| self.transport_error(uri, &e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SchemaError::FetchStatus {
                    uri: uri.to_string(),
                    status: status.as_u16(),
                });
            }

            // Stream response with size limit
            let mut body = Vec::new();
            let mut stream = response.bytes_stream();

            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| self.transport_error(uri, &e))?;

                if body.len() + chunk.len() > MAX_SCHEMA_SIZE {
                    return Err(SchemaError::fetch(
                        uri,
                        format!("schema too large (>{MAX_SCHEMA_SIZE} bytes)"),
                    ));
                }

                body.extend_from_slice(&chunk);
            }

            Ok(body)
        })
    }
}

/// Immutable scheme → loader table
#[derive(Clone)]
pub struct LoaderRegistry {
    loaders: Arc<HashMap<String, Arc<dyn SchemaLoader>>>,
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

impl LoaderRegistry {
    /// Start an empty registry
    #[must_use]
    pub fn builder() -> LoaderRegistryBuilder {
        LoaderRegistryBuilder::default()
    }

    /// `file` and `https` loaders, remote fetches bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns the client build error if the TLS backend cannot be initialized
    pub fn standard(timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self::builder()
            .with_loader("file", FileLoader)
            .with_loader("https", HttpLoader::new(timeout)?)
            .build())
    }

    /// Registered schemes, sorted
    #[must_use]
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Fetch raw bytes through the loader registered for the URI scheme
    ///
    /// # Errors
    ///
    /// - `UnsupportedScheme` if no loader handles the scheme
    /// - whatever the loader returns otherwise
    #[instrument(skip(self), fields(uri = %uri))]
    pub async fn fetch(&self, uri: &Url) -> Result<Vec<u8>> {
        let loader = self
            .loaders
            .get(uri.scheme())
            .ok_or_else(|| SchemaError::UnsupportedScheme {
                scheme: uri.scheme().to_string(),
                uri: uri.to_string(),
            })?;

        let bytes = loader.fetch(uri).await?;
        debug!(bytes = bytes.len(), "fetched schema document");
        Ok(bytes)
    }

    /// Fetch a schema and parse it as JSON
    ///
    /// # Errors
    ///
    /// - any error from [`LoaderRegistry::fetch`]
    /// - `SchemaParse` if the bytes are not JSON
    pub async fn load_schema(&self, uri: &Url) -> Result<serde_json::Value> {
        let bytes = self.fetch(uri).await?;
        serde_json::from_slice(&bytes).map_err(|e| SchemaError::SchemaParse {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Builder for [`LoaderRegistry`]
#[derive(Default)]
pub struct LoaderRegistryBuilder {
    loaders: HashMap<String, Arc<dyn SchemaLoader>>,
}

impl LoaderRegistryBuilder {
    /// Register `loader` for `scheme`, replacing any previous one
    #[must_use]
    pub fn with_loader(mut self, scheme: impl Into<String>, loader: impl SchemaLoader + 'static) -> Self {
        self.loaders.insert(scheme.into(), Arc::new(loader));
        self
    }

    /// Freeze the table
    #[must_use]
    pub fn build(self) -> LoaderRegistry {
        LoaderRegistry {
            loaders: Arc::new(self.loaders),
        }
    }
}
