//! Runs a candidate executable against test cases

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::compare::Comparator;
use crate::config::Config;
use crate::constants::MAX_STDERR_EXCERPT;
use crate::error::{AojError, AojResult};
use crate::testcase::Testcase;
use crate::verdict::{CaseResult, CheckSummary, Verdict};

/// Feeds case input to a candidate and judges what it prints
#[derive(Debug, Clone)]
pub struct Checker {
    comparator: Comparator,
    run_timeout: Option<Duration>,
}

impl Checker {
    pub fn new(config: &Config) -> Self {
        Self {
            comparator: Comparator::new(config.compare),
            run_timeout: config.execution.run_timeout,
        }
    }

    pub fn with_comparator(comparator: Comparator) -> Self {
        Self {
            comparator,
            run_timeout: None,
        }
    }

    pub fn with_run_timeout(mut self, limit: Option<Duration>) -> Self {
        self.run_timeout = limit;
        self
    }

    /// Check case `index` of `testcase`.
    ///
    /// `Ok(false)` means wrong answer; a candidate that fails to run is an
    /// error instead.
    pub async fn check_case(
        &self,
        testcase: &Testcase,
        index: usize,
        executable: &Path,
    ) -> AojResult<bool> {
        let input = testcase.case_input(index).await?;
        let expected = testcase.case_output(index).await?;
        self.check(executable, input, expected).await
    }

    /// Check every case in order, stopping at the first wrong answer
    pub async fn check_all(&self, testcase: &Testcase, executable: &Path) -> AojResult<CheckSummary> {
        let mut results = Vec::with_capacity(testcase.len());

        for index in 0..testcase.len() {
            let verdict = Verdict::from_match(self.check_case(testcase, index, executable).await?);
            tracing::debug!("testcase {}: {}", index, verdict);
            results.push(CaseResult { index, verdict });

            if verdict.is_failure() {
                break;
            }
        }

        Ok(CheckSummary::from_results(results, testcase.len()))
    }

    /// Run `executable` with `input` as stdin and compare its stdout with
    /// `expected`
    pub async fn check<R>(&self, executable: &Path, input: File, mut expected: R) -> AojResult<bool>
    where
        R: AsyncRead + Unpin,
    {
        let mut expected_output = Vec::new();
        expected
            .read_to_end(&mut expected_output)
            .await
            .map_err(|e| AojError::io("<expected output>", e))?;

        let actual_output = self.run(executable, input).await?;

        tracing::debug!("checking testcase output");
        Ok(self
            .comparator
            .equal_outputs(&actual_output, &expected_output))
    }

    /// Run the candidate to completion and return everything it wrote to stdout
    async fn run(&self, executable: &Path, input: File) -> AojResult<Vec<u8>> {
        let child = Command::new(executable)
            .stdin(Stdio::from(input.into_std().await))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AojError::Execution {
                path: executable.to_path_buf(),
                exit_code: None,
                stderr: e.to_string(),
            })?;

        let waited = match self.run_timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| AojError::Timeout {
                    path: executable.to_path_buf(),
                    limit_ms: limit.as_millis(),
                })?,
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|e| AojError::Execution {
            path: executable.to_path_buf(),
            exit_code: None,
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AojError::Execution {
                path: executable.to_path_buf(),
                exit_code: output.status.code(),
                stderr: stderr.trim_end().chars().take(MAX_STDERR_EXCERPT).collect(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_utils::FakeAoj;
    use std::path::PathBuf;

    async fn setup(cases: &[(&str, &str)]) -> (Testcase, FakeAoj, tempfile::TempDir) {
        let fake = FakeAoj::start().await;
        fake.add_problem("P", cases);
        let (manager, dir) = fake.manager();
        let testcase = manager.get_testcase("P").await.unwrap();
        (testcase, fake, dir)
    }

    fn cat() -> PathBuf {
        PathBuf::from("/bin/cat")
    }

    #[tokio::test]
    async fn test_echo_candidate_passes() {
        let (testcase, _fake, _dir) = setup(&[("1 2 3\n", "1 2 3\n"), ("", "")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        assert!(checker.check_case(&testcase, 0, &cat()).await.unwrap());
        assert!(checker.check_case(&testcase, 1, &cat()).await.unwrap());
    }

    #[tokio::test]
    async fn test_fuzzy_and_wrong_answers() {
        let (testcase, _fake, _dir) =
            setup(&[("0.33333\n", "0.333333\n"), ("1.0\n", "1.1\n")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        assert!(checker.check_case(&testcase, 0, &cat()).await.unwrap());
        assert!(!checker.check_case(&testcase, 1, &cat()).await.unwrap());
    }

    #[tokio::test]
    async fn test_program_reads_stdin() {
        // /bin/sh without arguments executes its stdin
        let (testcase, _fake, _dir) = setup(&[("echo 2.00001\n", "2\n")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        assert!(checker
            .check_case(&testcase, 0, Path::new("/bin/sh"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let (testcase, _fake, _dir) = setup(&[("echo oops >&2; exit 3\n", "")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        match checker.check_case(&testcase, 0, Path::new("/bin/sh")).await {
            Err(AojError::Execution {
                exit_code, stderr, ..
            }) => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_error() {
        let (testcase, _fake, _dir) = setup(&[("a", "a")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        let err = checker
            .check_case(&testcase, 0, Path::new("/nonexistent/candidate"))
            .await
            .unwrap_err();
        assert!(matches!(err, AojError::Execution { exit_code: None, .. }));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let (testcase, _fake, _dir) = setup(&[("sleep 5\n", "")]).await;
        let checker = Checker::with_comparator(Comparator::default())
            .with_run_timeout(Some(Duration::from_millis(200)));

        let err = checker
            .check_case(&testcase, 0, Path::new("/bin/sh"))
            .await
            .unwrap_err();
        assert!(matches!(err, AojError::Timeout { limit_ms: 200, .. }));
    }

    #[tokio::test]
    async fn test_check_all_stops_at_first_failure() {
        let (testcase, _fake, _dir) = setup(&[("a\n", "a\n"), ("b\n", "c\n"), ("d\n", "d\n")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        let summary = checker.check_all(&testcase, &cat()).await.unwrap();
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.first_failure(), Some(1));
        assert_eq!(summary.verdict(), Verdict::WrongAnswer);
    }

    #[tokio::test]
    async fn test_check_all_accepts() {
        let (testcase, _fake, _dir) = setup(&[("a\n", "a\n"), ("1.5\n", "1.50001\n")]).await;
        let checker = Checker::with_comparator(Comparator::default());

        let summary = checker.check_all(&testcase, &cat()).await.unwrap();
        assert_eq!(summary.verdict(), Verdict::Accepted);
        assert_eq!(summary.passed_count(), 2);
    }
}
