//! Manifest (testcase header) cache

use std::io::ErrorKind;

use tokio::fs;

use crate::constants::TESTCASE_HEADER_ENDPOINT;
use crate::error::{AojError, AojResult};
use crate::models::Manifest;
use crate::store::layout::{ensure_dir, CacheLayout};
use crate::store::remote::Remote;

/// Fetches manifests and keeps a verbatim copy of each on disk
#[derive(Debug, Clone)]
pub struct MetadataStore {
    remote: Remote,
    layout: CacheLayout,
}

impl MetadataStore {
    pub fn new(remote: Remote, layout: CacheLayout) -> Self {
        Self { remote, layout }
    }

    /// Resolve the manifest of `problem_id`, fetching it unless a cached copy
    /// exists and `use_cache` is set.
    ///
    /// A manifest without usable cases is removed from the cache and reported
    /// as [`AojError::Unavailable`], so the next call fetches it again.
    pub async fn resolve_manifest(&self, problem_id: &str, use_cache: bool) -> AojResult<Manifest> {
        let path = self.layout.header_path(problem_id)?;

        if !use_cache || !self.is_cached(problem_id).await? {
            tracing::debug!("fetching testcase header for '{}'", problem_id);
            self.fetch(problem_id).await?;
        } else {
            tracing::debug!("testcase header for '{}' is cached", problem_id);
        }
        tracing::debug!(path = %path.display(), "reading testcase header");

        let raw = fs::read(&path).await.map_err(|e| AojError::io(&path, e))?;
        let manifest = Manifest::from_slice(&raw).map_err(|e| AojError::Decode {
            problem_id: problem_id.to_string(),
            raw: String::from_utf8_lossy(&raw).into_owned(),
            message: e.to_string(),
        })?;
        tracing::debug!(?manifest, "testcase header");

        if manifest.is_empty() {
            tracing::warn!("testcase header for '{}' lists no cases, discarding", problem_id);
            self.remove(problem_id).await?;
            return Err(AojError::Unavailable {
                problem_id: problem_id.to_string(),
            });
        }

        Ok(manifest)
    }

    /// Whether a manifest file exists for `problem_id`
    pub async fn is_cached(&self, problem_id: &str) -> AojResult<bool> {
        let path = self.layout.header_path(problem_id)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn fetch(&self, problem_id: &str) -> AojResult<()> {
        let dir = self.layout.header_dir();
        ensure_dir(&dir).await?;

        let response = self
            .remote
            .get(TESTCASE_HEADER_ENDPOINT, &[("id", problem_id)])
            .await?;
        let url = response.url().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| AojError::transport(&url, e))?;

        let path = self.layout.header_path(problem_id)?;
        fs::write(&path, &body)
            .await
            .map_err(|e| AojError::io(&path, e))?;

        tracing::info!("fetched testcase header for '{}' ({} bytes)", problem_id, body.len());
        Ok(())
    }

    /// Delete the cached manifest; a missing file is not an error
    pub async fn remove(&self, problem_id: &str) -> AojResult<()> {
        let path = self.layout.header_path(problem_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AojError::io(&path, e)),
        }
    }
}
