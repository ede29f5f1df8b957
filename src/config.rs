//! Application configuration loaded from the process environment.
//!
//! Three secrets are required to start: the vector database API key, the
//! language model API key, and the name of the index to query. Optional
//! settings (namespace, model overrides) are read by the client builders.
//! A `.env` file in the working directory is honored via dotenvy.

use thiserror::Error;

/// Environment variable holding the Pinecone API key.
pub const ENV_PINECONE_API_KEY: &str = "PINECONE_API_KEY";
/// Environment variable holding the OpenAI API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the name of the index to query.
pub const ENV_PINECONE_INDEX: &str = "PINECONE_INDEX";
/// Environment variable holding the optional index namespace.
pub const ENV_PINECONE_NAMESPACE: &str = "PINECONE_NAMESPACE";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret is not set in the environment.
    #[error("Missing required secret: {0}")]
    MissingSecret(&'static str),

    /// A required secret is set but blank.
    #[error("Secret {0} is set but empty")]
    EmptySecret(&'static str),
}

/// Immutable application configuration.
///
/// Loaded once at startup and passed by reference for the process lifetime.
/// Credentials are handed to the client builders as explicit parameters;
/// loading never mutates the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pinecone_api_key: String,
    openai_api_key: String,
    index_name: String,
    namespace: Option<String>,
}

impl Config {
    /// Loads configuration from a `.env` file (if present) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any required secret is missing or empty.
    /// There is no partial or degraded startup mode.
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env file is fine; real environment variables win.
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Reads configuration from the process environment only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any required secret is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pinecone_api_key: require(ENV_PINECONE_API_KEY)?,
            openai_api_key: require(ENV_OPENAI_API_KEY)?,
            index_name: require(ENV_PINECONE_INDEX)?,
            namespace: optional(ENV_PINECONE_NAMESPACE),
        })
    }

    /// Returns the Pinecone API key.
    pub fn pinecone_api_key(&self) -> &str {
        &self.pinecone_api_key
    }

    /// Returns the OpenAI API key.
    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }

    /// Returns the name of the index to query.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Returns the index namespace, if one is configured.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

/// Reads a required environment variable.
fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptySecret(name)),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::MissingSecret(name)),
    }
}

/// Reads an optional environment variable, treating blank values as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        unsafe {
            std::env::set_var(ENV_PINECONE_API_KEY, "pc-test-key");
            std::env::set_var(ENV_OPENAI_API_KEY, "sk-test-key");
            std::env::set_var(ENV_PINECONE_INDEX, "docs-index");
        }
    }

    fn clear_all_vars() {
        unsafe {
            std::env::remove_var(ENV_PINECONE_API_KEY);
            std::env::remove_var(ENV_OPENAI_API_KEY);
            std::env::remove_var(ENV_PINECONE_INDEX);
            std::env::remove_var(ENV_PINECONE_NAMESPACE);
        }
    }

    #[test]
    #[serial]
    fn from_env_with_all_secrets_present() {
        clear_all_vars();
        set_required_vars();

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.pinecone_api_key(), "pc-test-key");
        assert_eq!(config.openai_api_key(), "sk-test-key");
        assert_eq!(config.index_name(), "docs-index");
        assert_eq!(config.namespace(), None);

        clear_all_vars();
    }

    #[test]
    #[serial]
    fn from_env_reads_optional_namespace() {
        clear_all_vars();
        set_required_vars();
        unsafe {
            std::env::set_var(ENV_PINECONE_NAMESPACE, "articles");
        }

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.namespace(), Some("articles"));

        clear_all_vars();
    }

    #[test]
    #[serial]
    fn from_env_fails_on_missing_pinecone_key() {
        clear_all_vars();
        set_required_vars();
        unsafe {
            std::env::remove_var(ENV_PINECONE_API_KEY);
        }

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(name) if name == ENV_PINECONE_API_KEY));

        clear_all_vars();
    }

    #[test]
    #[serial]
    fn from_env_fails_on_missing_openai_key() {
        clear_all_vars();
        set_required_vars();
        unsafe {
            std::env::remove_var(ENV_OPENAI_API_KEY);
        }

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(name) if name == ENV_OPENAI_API_KEY));

        clear_all_vars();
    }

    #[test]
    #[serial]
    fn from_env_fails_on_missing_index_name() {
        clear_all_vars();
        set_required_vars();
        unsafe {
            std::env::remove_var(ENV_PINECONE_INDEX);
        }

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(name) if name == ENV_PINECONE_INDEX));

        clear_all_vars();
    }

    #[test]
    #[serial]
    fn from_env_rejects_blank_secret() {
        clear_all_vars();
        set_required_vars();
        unsafe {
            std::env::set_var(ENV_OPENAI_API_KEY, "   ");
        }

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EmptySecret(name) if name == ENV_OPENAI_API_KEY));

        clear_all_vars();
    }

    #[test]
    #[serial]
    fn blank_namespace_is_treated_as_unset() {
        clear_all_vars();
        set_required_vars();
        unsafe {
            std::env::set_var(ENV_PINECONE_NAMESPACE, "");
        }

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.namespace(), None);

        clear_all_vars();
    }

    #[test]
    fn error_messages_name_the_variable() {
        let missing = ConfigError::MissingSecret(ENV_PINECONE_INDEX);
        assert_eq!(
            format!("{missing}"),
            "Missing required secret: PINECONE_INDEX"
        );

        let empty = ConfigError::EmptySecret(ENV_OPENAI_API_KEY);
        assert_eq!(format!("{empty}"), "Secret OPENAI_API_KEY is set but empty");
    }
}
