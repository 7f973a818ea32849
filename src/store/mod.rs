//! Durable cache of remote test data
//!
//! - `metadata`: per-problem manifests
//! - `cases`: per-case input/output blobs, validated by declared size
//! - `layout`: where both live on disk
//! - `remote`: the HTTP side

pub mod cases;
pub mod layout;
pub mod metadata;
pub mod remote;

pub use cases::CaseStore;
pub use layout::CacheLayout;
pub use metadata::MetadataStore;
pub use remote::Remote;
