//! Application configuration management
//!
//! Configuration is loaded from environment variables (and an optional `.env`
//! file) once at startup and then passed explicitly to the stores, the
//! comparator and the checker.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_SUBDIR, DEFAULT_EPSILON, DEFAULT_HTTP_TIMEOUT_SECS,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub remote: RemoteConfig,
    pub cache: CacheConfig,
    pub compare: CompareConfig,
    pub execution: ExecutionConfig,
    pub logging: LoggingConfig,
}

/// Remote testcase service configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL the endpoint names are appended to
    pub base_url: String,
    /// Per-request timeout
    pub http_timeout: Duration,
}

/// On-disk cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Root of the cache tree
    pub root: PathBuf,
}

/// Output comparison configuration
#[derive(Debug, Clone, Copy)]
pub struct CompareConfig {
    /// Maximum absolute difference between two numeric tokens
    pub epsilon: f64,
}

/// Candidate execution configuration
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Wall-clock limit for one candidate run. `None` waits forever.
    pub run_timeout: Option<Duration>,
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub debug: bool,
    pub rust_log: Option<String>,
}

impl Config {
    /// Default configuration rooted at the given cache directory.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            remote: RemoteConfig::default(),
            cache: CacheConfig {
                root: cache_root.into(),
            },
            compare: CompareConfig::default(),
            execution: ExecutionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            remote: RemoteConfig::from_vars(&var)?,
            cache: CacheConfig::from_vars(&var)?,
            compare: CompareConfig::from_vars(&var)?,
            execution: ExecutionConfig::from_vars(&var)?,
            logging: LoggingConfig::from_vars(&var)?,
        })
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl RemoteConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(var: &F) -> Result<Self, ConfigError> {
        let base_url = var("AOJ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("AOJ_BASE_URL".to_string()));
        }

        Ok(Self {
            base_url,
            http_timeout: Duration::from_secs(
                parse_or(var, "AOJ_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            ),
        })
    }
}

impl CacheConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(var: &F) -> Result<Self, ConfigError> {
        if let Some(dir) = var("AOJ_CACHE_DIR").filter(|d| !d.is_empty()) {
            return Ok(Self {
                root: PathBuf::from(dir),
            });
        }

        let home = var("HOME")
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::Missing("HOME".to_string()))?;

        Ok(Self {
            root: PathBuf::from(home).join(DEFAULT_CACHE_SUBDIR),
        })
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl CompareConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(var: &F) -> Result<Self, ConfigError> {
        let epsilon: f64 = parse_or(var, "AOJ_EPSILON", DEFAULT_EPSILON)?;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ConfigError::InvalidValue("AOJ_EPSILON".to_string()));
        }
        Ok(Self { epsilon })
    }
}

impl ExecutionConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(var: &F) -> Result<Self, ConfigError> {
        let run_timeout = match var("AOJ_RUN_TIMEOUT_MS") {
            Some(ms) => Some(Duration::from_millis(
                ms.parse()
                    .map_err(|_| ConfigError::InvalidValue("AOJ_RUN_TIMEOUT_MS".to_string()))?,
            )),
            None => None,
        };
        Ok(Self { run_timeout })
    }
}

impl LoggingConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(var: &F) -> Result<Self, ConfigError> {
        let debug = match var("AOJ_DEBUG").as_deref() {
            None | Some("") | Some("0") | Some("false") | Some("no") | Some("off") => false,
            Some("1") | Some("true") | Some("yes") | Some("on") => true,
            Some(_) => return Err(ConfigError::InvalidValue("AOJ_DEBUG".to_string())),
        };

        Ok(Self {
            debug,
            rust_log: var("RUST_LOG").filter(|f| !f.is_empty()),
        })
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
