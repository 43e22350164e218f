//! services/portal/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub session_dir: PathBuf,
    pub log_level: Level,
    /// How long a success notice stays visible before it dismisses itself.
    pub notice_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            session_dir: PathBuf::from("./.portal"),
            log_level: Level::INFO,
            notice_duration: Duration::from_secs(4),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        // --- Remote API ---
        let api_url = lookup("PORTAL_API_URL").unwrap_or(defaults.api_url);
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "PORTAL_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_url),
            ));
        }

        // --- Local State ---
        let session_dir = lookup("PORTAL_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_dir);

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let notice_duration = match lookup("PORTAL_NOTICE_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidValue("PORTAL_NOTICE_SECS".to_string(), e.to_string()))?,
            None => defaults.notice_duration,
        };

        Ok(Self {
            api_url,
            session_dir,
            log_level,
            notice_duration,
        })
    }
}
