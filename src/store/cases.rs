//! Case blob cache
//!
//! A cached blob is valid only when its length equals the size declared by
//! the manifest. Anything else is treated as absent and fetched again, which
//! also repairs files left behind by interrupted or concurrent downloads.

use std::path::PathBuf;

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::constants::TESTCASE_ENDPOINT;
use crate::error::{AojError, AojResult};
use crate::models::{CaseDescriptor, Direction, Manifest};
use crate::store::layout::{ensure_dir, CacheLayout};
use crate::store::remote::Remote;

/// Fetches case blobs and serves readers over the cached copies
#[derive(Debug, Clone)]
pub struct CaseStore {
    remote: Remote,
    layout: CacheLayout,
}

impl CaseStore {
    pub fn new(remote: Remote, layout: CacheLayout) -> Self {
        Self { remote, layout }
    }

    /// Open case `index` of `direction`, fetching it first when the cached
    /// copy is missing or has the wrong size, or when `use_cache` is unset.
    pub async fn case_reader(
        &self,
        manifest: &Manifest,
        index: usize,
        direction: Direction,
        use_cache: bool,
    ) -> AojResult<File> {
        if !use_cache || !self.is_cached(manifest, index, direction).await? {
            tracing::debug!(
                "fetching {} testcase[{}] for '{}'",
                direction,
                index,
                manifest.id
            );
            self.fetch_case(manifest, index, direction).await?;
        } else {
            tracing::debug!(
                "{} testcase[{}] for '{}' is cached",
                direction,
                index,
                manifest.id
            );
        }

        let path = self.case_path(manifest, index, direction)?;
        tracing::debug!(path = %path.display(), "opening testcase");
        File::open(&path).await.map_err(|e| AojError::io(&path, e))
    }

    /// Whether a file of exactly the declared size exists for the case
    pub async fn is_cached(
        &self,
        manifest: &Manifest,
        index: usize,
        direction: Direction,
    ) -> AojResult<bool> {
        let descriptor = descriptor(manifest, index, direction)?;
        let path = self.case_path(manifest, index, direction)?;

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(path = %path.display(), "no cache file: {}", e);
                return Ok(false);
            }
        };

        if i64::try_from(metadata.len()).ok() != Some(descriptor.size) {
            tracing::warn!(
                path = %path.display(),
                expected = descriptor.size,
                actual = metadata.len(),
                "cache file for {} testcase[{}] has wrong size",
                direction,
                index
            );
            return Ok(false);
        }

        tracing::debug!(path = %path.display(), "found valid cache file");
        Ok(true)
    }

    /// Download the case into the cache, replacing whatever is there.
    ///
    /// On a size mismatch the written file is kept; it fails validation on the
    /// next read and is fetched again.
    pub async fn fetch_case(
        &self,
        manifest: &Manifest,
        index: usize,
        direction: Direction,
    ) -> AojResult<()> {
        let descriptor = descriptor(manifest, index, direction)?;
        let path = self.case_path(manifest, index, direction)?;

        let dir = self.layout.case_dir(&manifest.id)?;
        ensure_dir(&dir).await?;

        let case_number = (index + 1).to_string();
        let mut response = self
            .remote
            .get(
                TESTCASE_ENDPOINT,
                &[
                    ("id", manifest.id.as_str()),
                    ("case", case_number.as_str()),
                    ("type", direction.as_query()),
                ],
            )
            .await?;
        let url = response.url().to_string();

        let mut out = File::create(&path)
            .await
            .map_err(|e| AojError::io(&path, e))?;

        let mut received: i64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AojError::transport(&url, e))?
        {
            out.write_all(&chunk)
                .await
                .map_err(|e| AojError::io(&path, e))?;
            received += chunk.len() as i64;
        }
        out.flush().await.map_err(|e| AojError::io(&path, e))?;

        if received != descriptor.size {
            return Err(AojError::Integrity {
                path,
                expected: descriptor.size,
                received,
            });
        }

        tracing::info!(
            "fetched {} testcase[{}] for '{}' ({} bytes)",
            direction,
            index,
            manifest.id,
            received
        );
        Ok(())
    }

    /// Download every input/output pair in order, input before output,
    /// stopping at the first failure.
    pub async fn fetch_all_cases(&self, manifest: &Manifest) -> AojResult<()> {
        for index in 0..manifest.pair_count() {
            for direction in [Direction::Input, Direction::Output] {
                self.fetch_case(manifest, index, direction)
                    .await
                    .map_err(|e| AojError::FetchAll {
                        direction,
                        index,
                        source: Box::new(e),
                    })?;
            }
        }
        Ok(())
    }

    /// Cache path of the case
    pub fn case_path(
        &self,
        manifest: &Manifest,
        index: usize,
        direction: Direction,
    ) -> AojResult<PathBuf> {
        let descriptor = descriptor(manifest, index, direction)?;
        self.layout.case_path(&manifest.id, &descriptor.name)
    }
}

fn descriptor(manifest: &Manifest, index: usize, direction: Direction) -> AojResult<&CaseDescriptor> {
    manifest
        .descriptor(index, direction)
        .ok_or_else(|| AojError::Range {
            problem_id: manifest.id.clone(),
            index,
            direction,
            len: manifest.descriptors(direction).len(),
        })
}
