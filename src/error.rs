//! Error types
//!
//! Every failure of the cache manager and the checker is reported as an
//! [`AojError`] variant carrying structured fields, so callers can branch on
//! the kind instead of parsing messages.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::models::Direction;

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AojError {
    /// Non-200 response or connection failure
    #[error("Failed to fetch {url}: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The manifest could not be decoded
    #[error("Failed to decode testcase header for '{problem_id}' ({message}): '{raw}'")]
    Decode {
        problem_id: String,
        raw: String,
        message: String,
    },

    /// The manifest lists no usable cases
    #[error("Testcase is not available for '{problem_id}'")]
    Unavailable { problem_id: String },

    /// Fetched byte count differs from the declared size
    #[error(
        "Fetched file size mismatch: {}: expected={expected}, received={received}",
        path.display()
    )]
    Integrity {
        path: PathBuf,
        expected: i64,
        received: i64,
    },

    /// Case index out of bounds
    #[error("{direction} testcase {index} of '{problem_id}' is out of range (have {len})")]
    Range {
        problem_id: String,
        index: usize,
        direction: Direction,
        len: usize,
    },

    /// The manifest names a case file that is not a plain file name
    #[error("Invalid case file name for '{problem_id}': '{name}'")]
    InvalidCaseName { problem_id: String, name: String },

    /// The candidate failed to start or exited unsuccessfully
    #[error("Failed to run {}: {}", path.display(), describe_exit(*exit_code, stderr))]
    Execution {
        path: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The candidate ran past the configured limit
    #[error("{} did not finish within {limit_ms}ms", path.display())]
    Timeout { path: PathBuf, limit_ms: u128 },

    /// A case failed while pre-warming the cache
    #[error("Failed to fetch the {direction} testcase[{index}]: {source}")]
    FetchAll {
        direction: Direction,
        index: usize,
        #[source]
        source: Box<AojError>,
    },

    /// Local file system failure
    #[error("File error: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AojError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Unavailable { .. } => "UNAVAILABLE",
            Self::Integrity { .. } => "INTEGRITY_ERROR",
            Self::Range { .. } => "RANGE_ERROR",
            Self::InvalidCaseName { .. } => "INVALID_CASE_NAME",
            Self::Execution { .. } => "EXECUTION_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::FetchAll { source, .. } => source.error_code(),
            Self::Io { .. } => "FILE_ERROR",
            Self::Config(_) => "CONFIGURATION_ERROR",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn describe_exit(exit_code: Option<i32>, stderr: &str) -> String {
    let status = match exit_code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal or failed to start".to_string(),
    };
    if stderr.is_empty() {
        status
    } else {
        format!("{}: {}", status, stderr)
    }
}

/// Result type alias using AojError
pub type AojResult<T> = Result<T, AojError>;
