//! Determinism verification for generated subtrees.
//!
//! A build is deterministic when every run over a fresh scene produces the
//! same subtree manifest. Manifests are compared as pretty JSON so a failure
//! points at the first differing line.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// If non-deterministic, the first differing line.
    pub diff: Option<LineDiff>,
}

/// First line that differs between two runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    /// 1-based line number.
    pub line: usize,
    pub expected: String,
    pub actual: String,
    /// Which run (0-indexed) produced the differing output.
    pub run_index: usize,
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Difference at line {} (run {}):\n  expected: {}\n  actual:   {}",
            self.line, self.run_index, self.expected, self.actual
        )
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff {
            panic!(
                "Non-deterministic output detected!\nRuns: {}\nHash: {}\n{}",
                self.runs, self.hash, diff
            );
        }
    }
}

fn first_difference(expected: &str, actual: &str, run_index: usize) -> Option<LineDiff> {
    let mut a = expected.lines();
    let mut b = actual.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (a.next(), b.next()) {
            (None, None) => return None,
            (x, y) if x == y => continue,
            (x, y) => {
                return Some(LineDiff {
                    line,
                    expected: x.unwrap_or("<end of output>").to_string(),
                    actual: y.unwrap_or("<end of output>").to_string(),
                    run_index,
                })
            }
        }
    }
}

/// Runs `generate_fn` `runs` times and compares every output with the first.
///
/// # Panics
///
/// Panics if `runs` is less than 2.
pub fn verify_determinism<F>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> String,
{
    assert!(runs >= 2, "Determinism verification needs at least 2 runs");

    let reference = generate_fn();
    let hash = blake3::hash(reference.as_bytes()).to_hex().to_string();

    for run_index in 1..runs {
        let output = generate_fn();
        if let Some(diff) = first_difference(&reference, &output, run_index) {
            return DeterminismResult {
                is_deterministic: false,
                runs: run_index + 1,
                hash,
                diff: Some(diff),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        hash,
        diff: None,
    }
}
