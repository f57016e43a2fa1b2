use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Editor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the résumé REST API, e.g. `https://host/api`.
    pub api_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: require_env("RESUME_API_URL")?,
            api_token: std::env::var("RESUME_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            request_timeout_secs: parse_timeout(std::env::var("RESUME_API_TIMEOUT_SECS").ok())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_timeout(raw: Option<String>) -> Result<u64> {
    match raw {
        None => Ok(DEFAULT_TIMEOUT_SECS),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .context("RESUME_API_TIMEOUT_SECS must be a whole number of seconds"),
    }
}
