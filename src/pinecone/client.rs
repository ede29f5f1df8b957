/// Pinecone HTTP client implementation.
///
/// `PineconeClient` talks to the control plane to resolve an index's
/// data-plane host; `PineconeIndex` is the resulting bound handle used for
/// queries. Binding happens once per process lifetime, not per query.
use std::time::Duration;

use thiserror::Error;

use super::types::{IndexDescription, QueryResults, ScoredMatch};

/// Default control-plane endpoint.
const DEFAULT_CONTROLLER_URL: &str = "https://api.pinecone.io";

/// Errors that can occur when interacting with the Pinecone API.
#[derive(Debug, Error)]
pub enum PineconeError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Pinecone API-specific errors (unexpected response shapes)
    #[error("Pinecone API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was provided via builder or environment
    #[error("Missing Pinecone API key")]
    MissingApiKey,
}

/// Classifies a reqwest transport failure.
fn transport_error(error: reqwest::Error) -> PineconeError {
    if error.is_timeout() {
        PineconeError::Timeout(error)
    } else {
        PineconeError::Network(error)
    }
}

/// Builder for constructing `PineconeClient` instances.
///
/// # Examples
///
/// ```
/// use docq::pinecone::PineconeClientBuilder;
///
/// let client = PineconeClientBuilder::new()
///     .api_key("pc-example-key")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct PineconeClientBuilder {
    api_key: Option<String>,
    controller_url: Option<String>,
}

impl PineconeClientBuilder {
    /// Creates a new `PineconeClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key used for both control-plane and data-plane calls.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the control-plane base URL.
    ///
    /// Mainly useful for pointing tests at a local stand-in.
    pub fn controller_url(mut self, url: impl Into<String>) -> Self {
        self.controller_url = Some(url.into());
        self
    }

    /// Builds the `PineconeClient` with the configured settings.
    ///
    /// Precedence for each setting: builder value, then environment
    /// variable, then default. The API key falls back to `PINECONE_API_KEY`;
    /// the controller URL falls back to `PINECONE_CONTROLLER_URL` and then
    /// the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns `PineconeError::MissingApiKey` if no key is available, or
    /// `PineconeError::InvalidUrl` if the controller URL does not parse.
    pub fn build(self) -> Result<PineconeClient, PineconeError> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var("PINECONE_API_KEY").map_err(|_| PineconeError::MissingApiKey)?,
        };

        let mut controller_url = if let Some(url) = self.controller_url {
            url
        } else {
            std::env::var("PINECONE_CONTROLLER_URL")
                .unwrap_or_else(|_| DEFAULT_CONTROLLER_URL.to_string())
        };
        while controller_url.ends_with('/') {
            controller_url.pop();
        }

        reqwest::Url::parse(&controller_url)
            .map_err(|e| PineconeError::InvalidUrl(format!("{}: {}", controller_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(PineconeError::Network)?;

        Ok(PineconeClient {
            client,
            api_key,
            controller_url,
        })
    }
}

/// Synchronous control-plane client for the Pinecone API.
///
/// Construct via `PineconeClientBuilder`, then call [`PineconeClient::connect`]
/// once to obtain a query handle for a named index.
pub struct PineconeClient {
    client: reqwest::blocking::Client,
    api_key: String,
    controller_url: String,
}

impl PineconeClient {
    /// Returns the control-plane base URL configured for this client.
    pub fn controller_url(&self) -> &str {
        &self.controller_url
    }

    /// Fetches the control-plane description of a named index.
    ///
    /// # Errors
    ///
    /// Returns `PineconeError::Http` for a failing status (404 for an
    /// unknown index, 401/403 for a bad key), or `PineconeError::Api` if the
    /// description lacks a data-plane host.
    pub fn describe_index(&self, name: &str) -> Result<IndexDescription, PineconeError> {
        let url = format!("{}/indexes/{}", self.controller_url, name);

        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PineconeError::Http {
                status: status.as_u16(),
            });
        }

        let description: IndexDescription = response.json().map_err(transport_error)?;
        if description.host.trim().is_empty() {
            return Err(PineconeError::Api {
                message: format!("Index description for '{}' has no host", name),
            });
        }

        Ok(description)
    }

    /// Resolves a named index and returns a bound query handle.
    ///
    /// The handle is scoped to `namespace` when one is given; queries then
    /// only see vectors upserted into that namespace.
    ///
    /// # Errors
    ///
    /// Propagates `describe_index` failures, or returns
    /// `PineconeError::InvalidUrl` if the reported host does not form a
    /// valid URL.
    pub fn connect(
        &self,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<PineconeIndex, PineconeError> {
        let description = self.describe_index(name)?;

        // The control plane reports a bare hostname.
        let host_url = if description.host.starts_with("http://")
            || description.host.starts_with("https://")
        {
            description.host.clone()
        } else {
            format!("https://{}", description.host)
        };
        reqwest::Url::parse(&host_url)
            .map_err(|e| PineconeError::InvalidUrl(format!("{}: {}", host_url, e)))?;

        Ok(PineconeIndex {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            name: description.name,
            host_url,
            namespace: namespace.map(String::from),
        })
    }
}

/// Trait for the query operation of a bound index.
///
/// This trait enables mocking in unit tests and keeps the query engine
/// independent of the concrete HTTP client.
pub trait PineconeIndexTrait: Send + Sync {
    /// Runs a nearest-neighbor search against the index.
    ///
    /// # Arguments
    ///
    /// * `vector` - The query embedding
    /// * `top_k` - Maximum number of matches to return
    ///
    /// # Returns
    ///
    /// Matches ranked by similarity (best first), with stored metadata.
    fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>, PineconeError>;
}

/// A bound handle to a remote index's data plane.
pub struct PineconeIndex {
    client: reqwest::blocking::Client,
    api_key: String,
    name: String,
    host_url: String,
    namespace: Option<String>,
}

impl PineconeIndex {
    /// Returns the index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data-plane URL this handle queries.
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Returns the namespace this handle is scoped to, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn query_internal(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>, PineconeError> {
        let url = format!("{}/query", self.host_url);

        let mut request_body = serde_json::json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if let Some(ref namespace) = self.namespace {
            request_body["namespace"] = serde_json::Value::String(namespace.clone());
        }

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PineconeError::Http {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = response.json().map_err(transport_error)?;
        let results: QueryResults =
            serde_json::from_value(json).map_err(PineconeError::Serialization)?;

        Ok(results.matches)
    }
}

impl PineconeIndexTrait for PineconeIndex {
    fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>, PineconeError> {
        self.query_internal(vector, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn http_error_variant_with_status_code() {
        let error = PineconeError::Http { status: 404 };
        let message = format!("{}", error);
        assert!(message.contains("HTTP error"));
        assert!(message.contains("404"));
    }

    #[test]
    fn api_error_variant_includes_message() {
        let error = PineconeError::Api {
            message: "Index description for 'ghost' has no host".to_string(),
        };
        assert!(format!("{}", error).contains("ghost"));
    }

    #[test]
    fn missing_api_key_error_display() {
        let error = PineconeError::MissingApiKey;
        assert_eq!(format!("{}", error), "Missing Pinecone API key");
    }

    #[test]
    fn serialization_error_chains_source() {
        use std::error::Error;

        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = PineconeError::Serialization(json_error);
        assert!(format!("{}", error).contains("Serialization error"));
        assert!(error.source().is_some());
    }

    #[test]
    #[serial]
    fn build_fails_without_api_key() {
        unsafe {
            std::env::remove_var("PINECONE_API_KEY");
        }

        let result = PineconeClientBuilder::new().build();
        assert!(matches!(result, Err(PineconeError::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn build_reads_api_key_from_environment() {
        unsafe {
            std::env::set_var("PINECONE_API_KEY", "pc-env-key");
            std::env::remove_var("PINECONE_CONTROLLER_URL");
        }

        let client = PineconeClientBuilder::new().build().unwrap();
        assert_eq!(client.controller_url(), DEFAULT_CONTROLLER_URL);

        unsafe {
            std::env::remove_var("PINECONE_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn builder_api_key_takes_precedence_over_environment() {
        unsafe {
            std::env::set_var("PINECONE_API_KEY", "pc-env-key");
        }

        let client = PineconeClientBuilder::new()
            .api_key("pc-builder-key")
            .controller_url("https://controller.example.com/")
            .build()
            .unwrap();
        // Trailing slash is trimmed.
        assert_eq!(client.controller_url(), "https://controller.example.com");

        unsafe {
            std::env::remove_var("PINECONE_API_KEY");
        }
    }

    #[test]
    fn build_rejects_invalid_controller_url() {
        let result = PineconeClientBuilder::new()
            .api_key("pc-key")
            .controller_url("not-a-valid-url")
            .build();
        assert!(matches!(result, Err(PineconeError::InvalidUrl(_))));
    }

    #[test]
    fn index_handle_exposes_binding_details() {
        let client = PineconeClientBuilder::new()
            .api_key("pc-key")
            .build()
            .unwrap();

        // Build the handle directly to avoid a network call.
        let index = PineconeIndex {
            client: client.client.clone(),
            api_key: client.api_key.clone(),
            name: "docs-index".to_string(),
            host_url: "https://docs-index-abc.svc.pinecone.io".to_string(),
            namespace: Some("articles".to_string()),
        };

        assert_eq!(index.name(), "docs-index");
        assert_eq!(index.host_url(), "https://docs-index-abc.svc.pinecone.io");
        assert_eq!(index.namespace(), Some("articles"));
    }

    #[test]
    fn query_request_body_includes_namespace_only_when_set() {
        let mut body = serde_json::json!({
            "vector": [0.1, 0.2],
            "topK": 3,
            "includeMetadata": true,
        });
        assert!(body.get("namespace").is_none());

        body["namespace"] = serde_json::Value::String("articles".to_string());
        assert_eq!(body["namespace"], "articles");
        assert_eq!(body["topK"], 3);
        assert_eq!(body["includeMetadata"], true);
    }

    #[test]
    fn trait_can_be_implemented_by_mock_struct() {
        struct MockIndex {
            matches: Vec<ScoredMatch>,
        }

        impl PineconeIndexTrait for MockIndex {
            fn query(
                &self,
                _vector: &[f32],
                _top_k: usize,
            ) -> Result<Vec<ScoredMatch>, PineconeError> {
                Ok(self.matches.clone())
            }
        }

        let mock = MockIndex { matches: vec![] };
        let result = mock.query(&[0.0; 8], 3);
        assert!(result.unwrap().is_empty());
    }
}
