use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_STORE_PATH: &str = ".readysethire/store.json";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the table-style REST backend, e.g. `https://host/api`.
    pub rest_api_url: String,
    /// Bearer token sent with every REST call, if the backend requires one.
    pub rest_api_token: Option<String>,
    /// Row owner injected into every created row when set.
    pub rest_username: Option<String>,
    pub anthropic_api_key: String,
    /// JSON file holding settings and AI provenance tags.
    pub local_store_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rest_api_url: require_env("REST_API_URL")?,
            rest_api_token: optional_env("REST_API_TOKEN"),
            rest_username: optional_env("REST_USERNAME"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            local_store_path: optional_env("LOCAL_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
