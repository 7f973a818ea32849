//! Application-wide constants
//!
//! Defaults for configuration and the fixed layout of the remote service and
//! the on-disk cache.

// =============================================================================
// REMOTE SERVICE
// =============================================================================

/// Default base URL of the testcase service
pub const DEFAULT_BASE_URL: &str = "http://analytic.u-aizu.ac.jp:8080/aoj";

/// Manifest endpoint, relative to the base URL
pub const TESTCASE_HEADER_ENDPOINT: &str = "testcase_header.jsp";

/// Case blob endpoint, relative to the base URL
pub const TESTCASE_ENDPOINT: &str = "testcase.jsp";

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// CACHE LAYOUT
// =============================================================================

/// Cache directory relative to `$HOME`
pub const DEFAULT_CACHE_SUBDIR: &str = ".cache/aoj";

/// Directory holding one manifest file per problem
pub const HEADER_CACHE_DIR: &str = "testcase_header";

/// Directory holding one sub-directory of case blobs per problem
pub const CASE_CACHE_DIR: &str = "testcase";

/// Permissions for cache directories created by this crate
#[cfg(unix)]
pub const CACHE_DIR_MODE: u32 = 0o700;

// =============================================================================
// COMPARISON
// =============================================================================

/// Acceptable absolute error between two numeric tokens
pub const DEFAULT_EPSILON: f64 = 0.0001;

// =============================================================================
// EXECUTION
// =============================================================================

/// Maximum number of stderr characters kept in an execution error
pub const MAX_STDERR_EXCERPT: usize = 500;

// =============================================================================
// LOGGING
// =============================================================================

/// Log filter used when debug output is requested
pub const DEBUG_LOG_FILTER: &str = "aoj=debug";

/// Log filter used otherwise
pub const DEFAULT_LOG_FILTER: &str = "aoj=warn";
