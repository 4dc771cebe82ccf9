use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub apollo_api_key: String,
    pub neverbounce_api_key: Option<String>,
    pub apollo_credit_cap: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            apollo_api_key: env::var("APOLLO_API_KEY")
                .context("APOLLO_API_KEY must be set")?,
            neverbounce_api_key: env::var("NEVERBOUNCE_API_KEY").ok(),
            apollo_credit_cap: env::var("APOLLO_CREDIT_CAP")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("APOLLO_CREDIT_CAP must be a valid number")?,
        })
    }
}
