//! Approximate string similarity between comparison strings.
//!
//! Scores are integers in `0..=100`. The default [`Algorithm::Indel`] is the
//! classic "ratio": twice the longest common subsequence over the combined
//! length, so `"Hysteria"` vs `"Hysteria (live)"` scores 70 and a single
//! typo in a ten-letter title still scores 90.
//!
//! Comparison is by Unicode scalar value and case-sensitive. An empty
//! string scores 0 against anything, including another empty string.

use serde::{Deserialize, Serialize};

/// Default minimum score for a pair to count as a duplicate candidate.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Similarity algorithm used to score candidate pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// `2 * LCS / (len(a) + len(b))`
    #[default]
    Indel,
    /// Normalized Levenshtein distance
    Levenshtein,
    /// Jaro-Winkler similarity (favours shared prefixes)
    JaroWinkler,
}

impl Algorithm {
    /// Score two comparison strings.
    #[must_use]
    pub fn score(self, a: &str, b: &str) -> u8 {
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        match self {
            Self::Indel => indel_ratio(a, b),
            Self::Levenshtein => to_percent(strsim::normalized_levenshtein(a, b)),
            Self::JaroWinkler => to_percent(strsim::jaro_winkler(a, b)),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indel => write!(f, "indel"),
            Self::Levenshtein => write!(f, "levenshtein"),
            Self::JaroWinkler => write!(f, "jaro-winkler"),
        }
    }
}

/// Whether a score qualifies against the threshold. Ties qualify.
#[must_use]
pub fn meets_threshold(score: u8, threshold: u8) -> bool {
    score >= threshold
}

/// Indel similarity ratio scaled to `0..=100`.
#[must_use]
pub fn indel_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let matches = 2 * lcs_len(&a, &b);
    to_percent(matches as f64 / total as f64)
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Scale a `0.0..=1.0` similarity to a percentage, ties rounded to even.
fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}
