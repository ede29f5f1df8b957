//! Integration tests for configuration loading.
//!
//! These tests mutate the process environment, so each one is serialized.

use docq::config::{
    Config, ConfigError, ENV_OPENAI_API_KEY, ENV_PINECONE_API_KEY, ENV_PINECONE_INDEX,
    ENV_PINECONE_NAMESPACE,
};
use serial_test::serial;

fn clear_env() {
    unsafe {
        std::env::remove_var(ENV_PINECONE_API_KEY);
        std::env::remove_var(ENV_OPENAI_API_KEY);
        std::env::remove_var(ENV_PINECONE_INDEX);
        std::env::remove_var(ENV_PINECONE_NAMESPACE);
    }
}

#[test]
#[serial]
fn startup_fails_fast_when_any_secret_is_missing() {
    clear_env();
    unsafe {
        std::env::set_var(ENV_PINECONE_API_KEY, "pc-key");
        std::env::set_var(ENV_OPENAI_API_KEY, "sk-key");
        // PINECONE_INDEX intentionally absent.
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingSecret(_)));
    assert!(err.to_string().contains("PINECONE_INDEX"));

    clear_env();
}

#[test]
#[serial]
fn full_environment_loads_complete_config() {
    clear_env();
    unsafe {
        std::env::set_var(ENV_PINECONE_API_KEY, "pc-key");
        std::env::set_var(ENV_OPENAI_API_KEY, "sk-key");
        std::env::set_var(ENV_PINECONE_INDEX, "docs-index");
        std::env::set_var(ENV_PINECONE_NAMESPACE, "articles");
    }

    let config = Config::from_env().expect("config should load");
    assert_eq!(config.pinecone_api_key(), "pc-key");
    assert_eq!(config.openai_api_key(), "sk-key");
    assert_eq!(config.index_name(), "docs-index");
    assert_eq!(config.namespace(), Some("articles"));

    clear_env();
}

#[test]
#[serial]
fn dotenv_file_supplies_missing_variables() {
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        "PINECONE_API_KEY=pc-from-file\nOPENAI_API_KEY=sk-from-file\nPINECONE_INDEX=file-index\n",
    )
    .expect("write .env");

    let original_dir = std::env::current_dir().expect("cwd");
    std::env::set_current_dir(dir.path()).expect("chdir to temp dir");

    let result = Config::load();

    // Restore before asserting so a failure doesn't strand later tests.
    std::env::set_current_dir(original_dir).expect("restore cwd");

    let config = result.expect("config should load from .env");
    assert_eq!(config.pinecone_api_key(), "pc-from-file");
    assert_eq!(config.index_name(), "file-index");

    // dotenv loading writes into the process environment; clean up.
    clear_env();
}

#[test]
#[serial]
fn real_environment_wins_over_dotenv_file() {
    clear_env();
    unsafe {
        std::env::set_var(ENV_PINECONE_API_KEY, "pc-from-env");
        std::env::set_var(ENV_OPENAI_API_KEY, "sk-from-env");
        std::env::set_var(ENV_PINECONE_INDEX, "env-index");
    }

    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join(".env"),
        "PINECONE_API_KEY=pc-from-file\nOPENAI_API_KEY=sk-from-file\nPINECONE_INDEX=file-index\n",
    )
    .expect("write .env");

    let original_dir = std::env::current_dir().expect("cwd");
    std::env::set_current_dir(dir.path()).expect("chdir to temp dir");

    let result = Config::load();

    std::env::set_current_dir(original_dir).expect("restore cwd");

    let config = result.expect("config should load");
    assert_eq!(config.pinecone_api_key(), "pc-from-env");
    assert_eq!(config.index_name(), "env-index");

    clear_env();
}
