//! Test case management - resolving manifests and serving case streams

use tokio::fs::File;

use crate::config::Config;
use crate::error::AojResult;
use crate::models::{Direction, Manifest};
use crate::store::{CacheLayout, CaseStore, MetadataStore, Remote};

/// Test case manager: the entry point that hands out [`Testcase`] handles
#[derive(Debug, Clone)]
pub struct TestcaseManager {
    metadata: MetadataStore,
    cases: CaseStore,
}

impl TestcaseManager {
    /// Create a new test case manager
    pub fn new(config: &Config) -> AojResult<Self> {
        let remote = Remote::new(&config.remote)?;
        let layout = CacheLayout::new(&config.cache);
        Ok(Self {
            metadata: MetadataStore::new(remote.clone(), layout.clone()),
            cases: CaseStore::new(remote, layout),
        })
    }

    /// Get the test cases of a problem, reusing a cached manifest if present
    pub async fn get_testcase(&self, problem_id: &str) -> AojResult<Testcase> {
        self.resolve(problem_id, true).await
    }

    /// Get the test cases of a problem, always fetching a fresh manifest
    pub async fn get_testcase_ignoring_cache(&self, problem_id: &str) -> AojResult<Testcase> {
        self.resolve(problem_id, false).await
    }

    async fn resolve(&self, problem_id: &str, use_cache: bool) -> AojResult<Testcase> {
        let manifest = self.metadata.resolve_manifest(problem_id, use_cache).await?;
        Ok(Testcase {
            manifest,
            cases: self.cases.clone(),
        })
    }
}

/// The test cases of one problem
#[derive(Debug, Clone)]
pub struct Testcase {
    manifest: Manifest,
    cases: CaseStore,
}

impl Testcase {
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Number of test cases
    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// Input of case `index` (0-based)
    pub async fn case_input(&self, index: usize) -> AojResult<File> {
        self.cases
            .case_reader(&self.manifest, index, Direction::Input, true)
            .await
    }

    /// Expected output of case `index` (0-based)
    pub async fn case_output(&self, index: usize) -> AojResult<File> {
        self.cases
            .case_reader(&self.manifest, index, Direction::Output, true)
            .await
    }

    /// Download every case, refreshing the cache
    pub async fn fetch_all_cases(&self) -> AojResult<()> {
        self.cases.fetch_all_cases(&self.manifest).await
    }
}
