//! Deterministic on-disk cache layout
//!
//! ```text
//! <root>/testcase_header/<problem_id>
//! <root>/testcase/<problem_id>/<case file name>
//! ```

use std::path::{Component, Path, PathBuf};

use crate::config::CacheConfig;
use crate::constants::{CASE_CACHE_DIR, HEADER_CACHE_DIR};
use crate::error::{AojError, AojResult};

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn header_dir(&self) -> PathBuf {
        self.root.join(HEADER_CACHE_DIR)
    }

    pub fn header_path(&self, problem_id: &str) -> AojResult<PathBuf> {
        Ok(self.header_dir().join(checked_name(problem_id, problem_id)?))
    }

    pub fn case_dir(&self, problem_id: &str) -> AojResult<PathBuf> {
        Ok(self
            .root
            .join(CASE_CACHE_DIR)
            .join(checked_name(problem_id, problem_id)?))
    }

    pub fn case_path(&self, problem_id: &str, file_name: &str) -> AojResult<PathBuf> {
        Ok(self
            .case_dir(problem_id)?
            .join(checked_name(problem_id, file_name)?))
    }
}

/// Accept only names that stay a single entry inside their directory
fn checked_name<'a>(problem_id: &str, name: &'a str) -> AojResult<&'a str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(AojError::InvalidCaseName {
            problem_id: problem_id.to_string(),
            name: name.to_string(),
        }),
    }
}

/// Create `dir` and its parents, restricted to the current user on Unix
pub async fn ensure_dir(dir: &Path) -> AojResult<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(crate::constants::CACHE_DIR_MODE);

    builder
        .create(dir)
        .await
        .map_err(|e| AojError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CacheLayout {
        CacheLayout::new(&CacheConfig {
            root: PathBuf::from("/cache/aoj"),
        })
    }

    #[test]
    fn test_paths() {
        let layout = layout();
        assert_eq!(
            layout.header_path("ALDS1_1_A").unwrap(),
            PathBuf::from("/cache/aoj/testcase_header/ALDS1_1_A")
        );
        assert_eq!(
            layout.case_path("ALDS1_1_A", "in3.txt").unwrap(),
            PathBuf::from("/cache/aoj/testcase/ALDS1_1_A/in3.txt")
        );
    }

    #[test]
    fn test_rejects_escaping_names() {
        let layout = layout();
        for name in ["", ".", "..", "../x", "a/b", "/etc/passwd", "a\\b"] {
            assert!(
                matches!(
                    layout.case_path("P", name),
                    Err(AojError::InvalidCaseName { .. })
                ),
                "{name} accepted"
            );
        }
        assert!(layout.header_path("../P").is_err());
    }
}
