//! Health check utilities for docq.
//!
//! Provides the `doctor` command functionality:
//! - Configuration checks (which required secrets are present)
//! - Vector index binding health (control-plane reachability, resolved host)
//! - Language model connectivity (model listing)

use anyhow::Result;

use crate::config::{
    Config, ENV_OPENAI_API_KEY, ENV_PINECONE_API_KEY, ENV_PINECONE_INDEX, ENV_PINECONE_NAMESPACE,
};
use crate::openai::OpenAiClientBuilder;
use crate::pinecone::PineconeClientBuilder;

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Health status for a component.
#[derive(Debug, Clone)]
pub enum HealthStatus {
    /// Component is healthy
    Ok,
    /// Component has a warning but is functional
    Warning(String),
    /// Component is not functional
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HealthStatus::Error(_))
    }
}

/// Presence of a single required secret. The value itself is never stored
/// or printed.
#[derive(Debug)]
pub struct SecretHealth {
    pub name: &'static str,
    pub status: HealthStatus,
}

/// Index binding health information.
#[derive(Debug)]
pub struct IndexHealth {
    pub status: HealthStatus,
    pub index_name: String,
    pub namespace: Option<String>,
    pub host: Option<String>,
    pub dimension: Option<u32>,
}

/// Language model connectivity information.
#[derive(Debug)]
pub struct LlmHealth {
    pub status: HealthStatus,
    pub base_url: String,
    pub model: String,
    pub models: Vec<String>,
}

/// Runs all health checks and prints the report.
///
/// Unlike normal startup, a missing secret here is reported instead of
/// aborting, so `doctor` stays useful for diagnosing exactly the
/// configuration failures that prevent startup.
///
/// # Errors
///
/// Returns an error if any component reported `Error`, so the process
/// exits nonzero.
pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let secrets = check_secrets();

    let (index, llm) = match Config::from_env() {
        Ok(config) => (
            Some(check_index(&config)),
            Some(check_llm(&config)),
        ),
        Err(_) => (None, None),
    };

    print_health_report(&secrets, index.as_ref(), llm.as_ref());

    let secrets_failed = secrets.iter().any(|s| s.status.is_error());
    let index_failed = index.as_ref().is_some_and(|i| i.status.is_error());
    let llm_failed = llm.as_ref().is_some_and(|l| l.status.is_error());

    if secrets_failed || index_failed || llm_failed {
        anyhow::bail!("One or more health checks failed");
    }

    Ok(())
}

/// Checks which required secrets are present in the environment.
fn check_secrets() -> Vec<SecretHealth> {
    [ENV_PINECONE_API_KEY, ENV_OPENAI_API_KEY, ENV_PINECONE_INDEX]
        .into_iter()
        .map(|name| {
            let status = match std::env::var(name) {
                Ok(value) if value.trim().is_empty() => {
                    HealthStatus::Error("Set but empty".to_string())
                }
                Ok(_) => HealthStatus::Ok,
                Err(_) => HealthStatus::Error("Not set".to_string()),
            };
            SecretHealth { name, status }
        })
        .collect()
}

/// Checks that the configured index can be described and bound.
fn check_index(config: &Config) -> IndexHealth {
    let namespace = config.namespace().map(String::from);

    let client = match PineconeClientBuilder::new()
        .api_key(config.pinecone_api_key())
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return IndexHealth {
                status: HealthStatus::Error(format!("Failed to build client: {}", e)),
                index_name: config.index_name().to_string(),
                namespace,
                host: None,
                dimension: None,
            };
        }
    };

    match client.describe_index(config.index_name()) {
        Ok(description) => IndexHealth {
            status: HealthStatus::Ok,
            index_name: config.index_name().to_string(),
            namespace,
            host: Some(description.host),
            dimension: description.dimension,
        },
        Err(e) => IndexHealth {
            status: HealthStatus::Error(format!("Binding failed: {}", e)),
            index_name: config.index_name().to_string(),
            namespace,
            host: None,
            dimension: None,
        },
    }
}

/// Checks language model connectivity by listing available models.
fn check_llm(config: &Config) -> LlmHealth {
    let client = match OpenAiClientBuilder::new()
        .api_key(config.openai_api_key())
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return LlmHealth {
                status: HealthStatus::Error(format!("Failed to build client: {}", e)),
                base_url: String::new(),
                model: String::new(),
                models: Vec::new(),
            };
        }
    };

    let base_url = client.base_url().to_string();
    let model = client.model().to_string();

    match client.list_models() {
        Ok(models) => LlmHealth {
            status: if models.iter().any(|m| m == &model) {
                HealthStatus::Ok
            } else {
                // Gateways don't always enumerate every usable model.
                HealthStatus::Warning(format!("Model '{}' not in listing", model))
            },
            base_url,
            model,
            models,
        },
        Err(e) => LlmHealth {
            status: HealthStatus::Error(format!("Connection failed: {}", e)),
            base_url,
            model,
            models: Vec::new(),
        },
    }
}

// ============================================================================
// Pretty Printing
// ============================================================================

fn status_symbol(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => "\u{2713}",
        HealthStatus::Warning(_) => "!",
        HealthStatus::Error(_) => "\u{2717}",
    }
}

fn status_color(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => GREEN,
        HealthStatus::Warning(_) => YELLOW,
        HealthStatus::Error(_) => RED,
    }
}

fn print_health_report(
    secrets: &[SecretHealth],
    index: Option<&IndexHealth>,
    llm: Option<&LlmHealth>,
) {
    println!("{}docq doctor{}", BOLD, RESET);
    println!();

    // Configuration section
    println!("{}Configuration{}", BOLD, RESET);
    for secret in secrets {
        let status_text = match &secret.status {
            HealthStatus::Ok => "Present".to_string(),
            HealthStatus::Warning(w) => w.clone(),
            HealthStatus::Error(e) => e.clone(),
        };
        println!(
            "  {}{}{} {}: {}",
            status_color(&secret.status),
            status_symbol(&secret.status),
            RESET,
            secret.name,
            status_text
        );
    }
    if let Ok(namespace) = std::env::var(ENV_PINECONE_NAMESPACE)
        && !namespace.trim().is_empty()
    {
        println!("    {}Namespace: {}{}", DIM, namespace, RESET);
    }
    println!();

    // Index section
    println!("{}Vector index{}", BOLD, RESET);
    match index {
        Some(health) => {
            let status_text = match &health.status {
                HealthStatus::Ok => "Bound".to_string(),
                HealthStatus::Warning(w) => w.clone(),
                HealthStatus::Error(e) => e.clone(),
            };
            println!(
                "  {}{}{} {}: {}",
                status_color(&health.status),
                status_symbol(&health.status),
                RESET,
                health.index_name,
                status_text
            );
            if let Some(ref host) = health.host {
                println!("    {}Host: {}{}", DIM, host, RESET);
            }
            if let Some(dimension) = health.dimension {
                println!("    {}Dimension: {}{}", DIM, dimension, RESET);
            }
        }
        None => {
            println!("  {}Skipped (configuration incomplete){}", YELLOW, RESET);
        }
    }
    println!();

    // Language model section
    println!("{}Language model{}", BOLD, RESET);
    match llm {
        Some(health) => {
            let status_text = match &health.status {
                HealthStatus::Ok => "Connected".to_string(),
                HealthStatus::Warning(w) => w.clone(),
                HealthStatus::Error(e) => e.clone(),
            };
            println!(
                "  {}{}{} Status: {}",
                status_color(&health.status),
                status_symbol(&health.status),
                RESET,
                status_text
            );
            if !health.base_url.is_empty() {
                println!("    {}URL: {}{}", DIM, health.base_url, RESET);
            }
            if !health.models.is_empty() {
                let models_display = if health.models.len() > 3 {
                    format!(
                        "{}, ... ({} more)",
                        health.models[..3].join(", "),
                        health.models.len() - 3
                    )
                } else {
                    health.models.join(", ")
                };
                println!("    {}Models: {}{}", DIM, models_display, RESET);
            }
        }
        None => {
            println!("  {}Skipped (configuration incomplete){}", YELLOW, RESET);
        }
    }
}
