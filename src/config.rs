//! Environment configuration

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings for the model-backed sugar estimator
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationConfig {
    /// `None` disables estimation
    pub api_key: Option<String>,
    pub api_url: String,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    /// Upper bound for a single backoff sleep
    pub max_backoff_ms: u64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_GEMINI_API_URL.to_string(),
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub estimation: EstimationConfig,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset and blank values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = EstimationConfig::default();

        let database_path = get("ROTULAGEM_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let estimation = EstimationConfig {
            api_key: get("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            api_url: get("GEMINI_API_URL").unwrap_or(defaults.api_url),
            max_retries: match get("ROTULAGEM_ESTIMATION_MAX_RETRIES") {
                Some(v) => parse_number("ROTULAGEM_ESTIMATION_MAX_RETRIES", &v)?,
                None => defaults.max_retries,
            },
            initial_backoff_ms: match get("ROTULAGEM_ESTIMATION_BACKOFF_MS") {
                Some(v) => parse_number("ROTULAGEM_ESTIMATION_BACKOFF_MS", &v)?,
                None => defaults.initial_backoff_ms,
            },
            max_backoff_ms: defaults.max_backoff_ms,
        };

        Ok(Self {
            database_path,
            estimation,
        })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

/// `<project>/data/rotulagem.db`, resolved from the executable location
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("rotulagem.db");
    path
}
