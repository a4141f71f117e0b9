//! Determinism checks for written images.
//!
//! Runs an export closure several times and compares the BLAKE3 hashes of the
//! bytes it produces.

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
    /// Index of the first run whose hash differed.
    pub first_mismatch: Option<usize>,
}

impl fmt::Display for DeterminismResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_mismatch {
            None => write!(f, "{} run(s) identical ({})", self.runs, self.hash),
            Some(run) => write!(f, "run {} differs from run 0 ({})", run, self.hash),
        }
    }
}

/// Calls `produce` `runs` times and compares the outputs.
pub fn verify_determinism<F>(mut produce: F, runs: usize) -> DeterminismResult
where
    F: FnMut(usize) -> Vec<u8>,
{
    let runs = runs.max(1);
    let first = blake3::hash(&produce(0)).to_hex().to_string();
    let first_mismatch =
        (1..runs).find(|&run| blake3::hash(&produce(run)).to_hex().as_str() != first);

    DeterminismResult {
        is_deterministic: first_mismatch.is_none(),
        runs,
        hash: first,
        first_mismatch,
    }
}
