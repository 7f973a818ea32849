//! AOJ - test data cache and output checker for Aizu Online Judge problems
//!
//! This library fetches the reference test cases of a problem from the AOJ
//! testcase service, keeps them in a local cache, and checks a local solution
//! against them.
//!
//! # Architecture
//!
//! - **Store**: manifest and case blob caches backed by the remote service
//! - **Testcase**: per-problem handle over a resolved manifest
//! - **Checker**: runs a candidate executable on a case
//! - **Compare**: tolerance-aware output comparison
//!
//! ```no_run
//! # async fn demo() -> aoj::AojResult<()> {
//! let config = aoj::Config::from_env()?;
//! let manager = aoj::TestcaseManager::new(&config)?;
//! let testcase = manager.get_testcase("ALDS1_1_A").await?;
//!
//! let checker = aoj::Checker::new(&config);
//! let _passed = checker
//!     .check_case(&testcase, 0, std::path::Path::new("./a.out"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod compare;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod store;
pub mod testcase;
pub mod verdict;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use checker::Checker;
pub use compare::Comparator;
pub use config::Config;
pub use error::{AojError, AojResult};
pub use models::{CaseDescriptor, Direction, Manifest};
pub use testcase::{Testcase, TestcaseManager};
pub use verdict::{CaseResult, CheckSummary, Verdict};
