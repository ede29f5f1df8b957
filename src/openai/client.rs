/// OpenAI HTTP client implementation.
///
/// This module provides `OpenAiClient` for making synchronous HTTP requests
/// to the OpenAI API, along with error types and a builder for configuration.
use std::time::Duration;

use thiserror::Error;

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model used for answer synthesis.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Default model used to embed queries. Must match the model the index's
/// vectors were embedded with.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Errors that can occur when interacting with the OpenAI API.
#[derive(Debug, Error)]
pub enum OpenAiError {
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

    /// OpenAI API-specific errors (unexpected response shapes)
    #[error("OpenAI API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was provided via builder or environment
    #[error("Missing OpenAI API key")]
    MissingApiKey,
}

/// Classifies a reqwest transport failure.
fn transport_error(error: reqwest::Error) -> OpenAiError {
    if error.is_timeout() {
        OpenAiError::Timeout(error)
    } else {
        OpenAiError::Network(error)
    }
}

/// Builder for constructing `OpenAiClient` instances.
///
/// # Examples
///
/// ```
/// use docq::openai::OpenAiClientBuilder;
///
/// let client = OpenAiClientBuilder::new()
///     .api_key("sk-example-key")
///     .model("gpt-4o-mini")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct OpenAiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    embedding_model: Option<String>,
}

impl OpenAiClientBuilder {
    /// Creates a new `OpenAiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL (e.g. an OpenAI-compatible gateway).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the chat model used for answer synthesis.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the embedding model used for queries.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Builds the `OpenAiClient` with the configured settings.
    ///
    /// Precedence for each setting: builder value, then environment
    /// variable, then default. The API key falls back to `OPENAI_API_KEY`;
    /// the base URL to `OPENAI_BASE_URL`; the models to `OPENAI_MODEL` and
    /// `OPENAI_EMBEDDING_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns `OpenAiError::MissingApiKey` if no key is available, or
    /// `OpenAiError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<OpenAiClient, OpenAiError> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var("OPENAI_API_KEY").map_err(|_| OpenAiError::MissingApiKey)?,
        };

        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        };
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        };

        let embedding_model = if let Some(m) = self.embedding_model {
            m
        } else {
            std::env::var("OPENAI_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string())
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| OpenAiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(OpenAiError::Network)?;

        Ok(OpenAiClient {
            client,
            api_key,
            base_url,
            model,
            embedding_model,
        })
    }
}

/// Trait for the OpenAI operations the query engine depends on.
///
/// This trait enables mocking in unit tests and provides a clean interface
/// for embedding and synthesis.
pub trait OpenAiClientTrait: Send + Sync {
    /// Embeds a single input string.
    ///
    /// # Returns
    ///
    /// The embedding vector, or an error if the request fails.
    fn embed(&self, input: &str) -> Result<Vec<f32>, OpenAiError>;

    /// Generates a completion for a prompt via the chat API.
    ///
    /// # Returns
    ///
    /// The assistant message text, or an error if the request fails.
    fn complete(&self, prompt: &str) -> Result<String, OpenAiError>;
}

/// Synchronous HTTP client for the OpenAI API.
///
/// Should be constructed using `OpenAiClientBuilder`.
pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl OpenAiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the chat model configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the embedding model configured for this client.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Lists model identifiers available to the configured API key.
    ///
    /// Used by the `doctor` command to verify connectivity and model
    /// availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub fn list_models(&self) -> Result<Vec<String>, OpenAiError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenAiError::Http {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = response.json().map_err(transport_error)?;

        let models = json
            .get("data")
            .and_then(|d| d.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("id").and_then(|id| id.as_str()))
                    .map(|id| id.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    fn embed_internal(&self, input: &str) -> Result<Vec<f32>, OpenAiError> {
        let url = format!("{}/embeddings", self.base_url);
        let request_body = serde_json::json!({
            "model": self.embedding_model,
            "input": input,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenAiError::Http {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = response.json().map_err(transport_error)?;

        extract_embedding(&json).ok_or_else(|| OpenAiError::Api {
            message: "Missing 'embedding' field in API response".to_string(),
        })
    }

    fn complete_internal(&self, prompt: &str) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.0,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenAiError::Http {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = response.json().map_err(transport_error)?;

        extract_completion(&json).ok_or_else(|| OpenAiError::Api {
            message: "Missing 'message.content' field in API response".to_string(),
        })
    }
}

impl OpenAiClientTrait for OpenAiClient {
    fn embed(&self, input: &str) -> Result<Vec<f32>, OpenAiError> {
        self.embed_internal(input)
    }

    fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        self.complete_internal(prompt)
    }
}

/// Extracts the first embedding vector from an embeddings API response.
fn extract_embedding(json: &serde_json::Value) -> Option<Vec<f32>> {
    let values = json
        .get("data")?
        .as_array()?
        .first()?
        .get("embedding")?
        .as_array()?;

    #[allow(clippy::cast_possible_truncation)]
    let embedding: Vec<f32> = values
        .iter()
        .filter_map(|v| v.as_f64())
        .map(|v| v as f32)
        .collect();

    if embedding.is_empty() {
        None
    } else {
        Some(embedding)
    }
}

/// Extracts the assistant message text from a chat completions API response.
fn extract_completion(json: &serde_json::Value) -> Option<String> {
    json.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.trim().to_string())
}
