use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::auth::token_store::default_token_path;

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Client configuration loaded from environment variables.
/// Every variable has a default, so a bare checkout talks to a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = std::env::var("TAILOR_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        reqwest::Url::parse(&api_url)
            .with_context(|| format!("TAILOR_API_URL '{api_url}' is not a valid URL"))?;

        let token_path = match std::env::var("TAILOR_TOKEN_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_token_path(),
        };

        Ok(Config {
            api_url,
            token_path,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
