//! Verdict types and summary of a full check run

use serde::{Deserialize, Serialize};

/// Verdict for a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Output matches the expected output
    Accepted,
    /// Output does not match expected
    WrongAnswer,
}

impl Verdict {
    /// Get short code for verdict
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer => "WA",
        }
    }

    pub fn from_match(matched: bool) -> Self {
        if matched {
            Verdict::Accepted
        } else {
            Verdict::WrongAnswer
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Verdict::Accepted)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of checking a single test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// Test case index (0-based)
    pub index: usize,
    pub verdict: Verdict,
}

/// Aggregated result of checking every case of a problem
#[derive(Debug, Clone)]
pub struct CheckSummary {
    /// Results in case order; ends at the first failure
    pub results: Vec<CaseResult>,
    /// Number of cases the problem has
    pub total_count: usize,
}

impl CheckSummary {
    pub fn from_results(results: Vec<CaseResult>, total_count: usize) -> Self {
        Self {
            results,
            total_count,
        }
    }

    /// Overall verdict: accepted only if every case was checked and passed
    pub fn verdict(&self) -> Verdict {
        match self.first_failure() {
            Some(_) => Verdict::WrongAnswer,
            None if self.results.len() == self.total_count => Verdict::Accepted,
            None => Verdict::WrongAnswer,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.verdict == Verdict::Accepted)
            .count()
    }

    /// Index of the first failing case, if any
    pub fn first_failure(&self) -> Option<usize> {
        self.results
            .iter()
            .find(|r| r.verdict.is_failure())
            .map(|r| r.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, verdict: Verdict) -> CaseResult {
        CaseResult { index, verdict }
    }

    #[test]
    fn test_all_accepted() {
        let summary = CheckSummary::from_results(
            vec![result(0, Verdict::Accepted), result(1, Verdict::Accepted)],
            2,
        );
        assert_eq!(summary.verdict(), Verdict::Accepted);
        assert_eq!(summary.passed_count(), 2);
        assert_eq!(summary.first_failure(), None);
    }

    #[test]
    fn test_first_failure() {
        let summary = CheckSummary::from_results(
            vec![result(0, Verdict::Accepted), result(1, Verdict::WrongAnswer)],
            5,
        );
        assert_eq!(summary.verdict(), Verdict::WrongAnswer);
        assert_eq!(summary.passed_count(), 1);
        assert_eq!(summary.first_failure(), Some(1));
        assert_eq!(summary.verdict().to_string(), "WA");
    }

    #[test]
    fn test_incomplete_run_is_not_accepted() {
        let summary = CheckSummary::from_results(vec![result(0, Verdict::Accepted)], 3);
        assert_eq!(summary.verdict(), Verdict::WrongAnswer);
    }
}
