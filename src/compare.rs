//! Tolerance-aware output comparison
//!
//! Outputs are equal when they are byte-identical, or when they have the same
//! lines, each line has the same space-separated tokens, and every differing
//! token pair is numeric and within `epsilon` of each other.

use crate::config::CompareConfig;

/// Decides whether a program's output matches the expected output
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    epsilon: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(CompareConfig::default())
    }
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self {
            epsilon: config.epsilon,
        }
    }

    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Compare `actual` against `expected`
    pub fn equal_outputs(&self, actual: &[u8], expected: &[u8]) -> bool {
        if actual == expected {
            return true;
        }
        tracing::debug!("outputs differ byte-wise, comparing tokens");

        let mut actual_lines = lines(actual);
        let mut expected_lines = lines(expected);

        loop {
            let (a, e) = match (actual_lines.next(), expected_lines.next()) {
                (None, None) => return true,
                (Some(a), Some(e)) => (a, e),
                _ => {
                    tracing::debug!("only one output reached its end");
                    return false;
                }
            };

            let a_tokens: Vec<&[u8]> = a.split(|&b| b == b' ').collect();
            let e_tokens: Vec<&[u8]> = e.split(|&b| b == b' ').collect();
            if a_tokens.len() != e_tokens.len() {
                return false;
            }

            for (a, e) in a_tokens.iter().zip(&e_tokens) {
                if a == e || self.numeric_tokens_match(a, e) {
                    continue;
                }
                tracing::debug!(
                    actual = %String::from_utf8_lossy(a),
                    expected = %String::from_utf8_lossy(e),
                    "token mismatch"
                );
                return false;
            }
        }
    }

    fn numeric_tokens_match(&self, a: &[u8], b: &[u8]) -> bool {
        match (parse_numeric(a), parse_numeric(b)) {
            (Some(a), Some(b)) => (a - b).abs() <= self.epsilon,
            _ => false,
        }
    }
}

/// Lines split on `\n` with a trailing `\r` removed. A final terminator does
/// not produce an extra empty line.
fn lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    let mut split = body.split(|&b| b == b'\n');
    if data.is_empty() {
        // no lines at all, not one empty line
        split.next();
    }
    split.map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Digits and decimal points only. Signs and exponents do not qualify.
pub fn is_numeric_token(token: &[u8]) -> bool {
    token.iter().all(|&b| b == b'.' || b.is_ascii_digit())
}

fn parse_numeric(token: &[u8]) -> Option<f64> {
    if !is_numeric_token(token) {
        return None;
    }
    std::str::from_utf8(token).ok()?.parse().ok()
}
