//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Default TTL for cached results; comparison responses get half of it.
    pub cache_ttl_seconds: u64,
    /// Minimum similarity score for the product matcher.
    pub match_min_score: f64,
    pub kroger_client_id: Option<String>,
    pub kroger_client_secret: Option<String>,
    pub kroger_base_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Cache and Matcher Settings ---
        let cache_ttl_seconds = match std::env::var("CACHE_TTL_SECONDS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("CACHE_TTL_SECONDS".to_string(), raw.clone())
            })?,
            Err(_) => 3600,
        };

        let match_min_score = match std::env::var("MATCH_MIN_SCORE") {
            Ok(raw) => raw.parse::<f64>().map_err(|_| {
                ConfigError::InvalidValue("MATCH_MIN_SCORE".to_string(), raw.clone())
            })?,
            Err(_) => grocery_compare_core::DEFAULT_MIN_SCORE,
        };

        // --- Load Kroger API Settings (credentials to be provided later) ---
        let kroger_client_id = std::env::var("KROGER_CLIENT_ID").ok();
        let kroger_client_secret = std::env::var("KROGER_CLIENT_SECRET").ok();
        let kroger_base_url = std::env::var("KROGER_BASE_URL")
            .unwrap_or_else(|_| "https://api.kroger.com/v1".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cache_ttl_seconds,
            match_min_score,
            kroger_client_id,
            kroger_client_secret,
            kroger_base_url,
        })
    }
}
