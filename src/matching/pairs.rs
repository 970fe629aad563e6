//! Cross-folder candidate pair generation.
//!
//! # Overview
//!
//! Every ordered pair `(a, b)` of files with `a` before `b` in the scan
//! order is considered, except pairs whose files share a parent directory
//! (alternate formats of one release live side by side and are never
//! duplicates of each other). Each surviving pair gets its [`PairId`]
//! immediately; pairs already in the [`DecisionLedger`] are dropped before
//! any scoring work happens.
//!
//! Scoring runs on the rayon pool. Rayon's ordered collect keeps the
//! output in enumeration order, so the candidate list is identical from one
//! run to the next.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::similarity::{meets_threshold, Algorithm, DEFAULT_THRESHOLD};
use crate::progress::ProgressCallback;
use crate::scanner::FileEntry;
use crate::store::DecisionLedger;

/// Identity of an ordered pair of file paths.
///
/// SHA-256 over the first path, a NUL separator and the second path, in
/// lowercase hex. Swapping the paths yields a different identifier; the
/// generator only ever forms a pair in scan order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    /// Compute the identifier for `first` followed by `second`.
    #[must_use]
    pub fn from_paths(first: &Path, second: &Path) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(first.as_os_str().as_encoded_bytes());
        hasher.update([0u8]);
        hasher.update(second.as_os_str().as_encoded_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hex representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two files from different folders whose names look alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCandidate {
    /// Earlier file in scan order
    pub first: FileEntry,
    /// Later file in scan order
    pub second: FileEntry,
    /// Identity used by the decision ledger
    pub pair_id: PairId,
    /// Similarity of the normalized names, `0..=100`
    pub score: u8,
}

/// Settings for candidate generation.
#[derive(Debug, Clone, Copy)]
pub struct FinderConfig {
    /// Minimum score (inclusive) for a pair to be reported.
    pub threshold: u8,
    /// Scoring algorithm.
    pub algorithm: Algorithm,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            algorithm: Algorithm::default(),
        }
    }
}

/// Counters from one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PairStats {
    /// Files that took part.
    pub files: usize,
    /// Cross-folder pairs enumerated.
    pub cross_folder_pairs: usize,
    /// Pairs dropped because the ledger already holds them.
    pub already_handled: usize,
    /// Pairs that were scored.
    pub scored: usize,
    /// Pairs at or above the threshold.
    pub candidates: usize,
}

/// Enumerates and scores candidate pairs.
pub struct CandidateFinder {
    config: FinderConfig,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl fmt::Debug for CandidateFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFinder")
            .field("config", &self.config)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl CandidateFinder {
    /// Create a finder with the given settings.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Report scoring progress to a callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Find candidate pairs.
    ///
    /// `names` holds the normalized comparison string of each entry and must
    /// be index-aligned with `entries`, whose order defines pair orientation.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if `entries` and `names` differ in length.
    #[must_use]
    pub fn find(
        &self,
        entries: &[FileEntry],
        names: &[String],
        ledger: &DecisionLedger,
    ) -> (Vec<PairCandidate>, PairStats) {
        debug_assert_eq!(entries.len(), names.len());
        let n = entries.len().min(names.len());

        let cross_folder = AtomicUsize::new(0);
        let handled = AtomicUsize::new(0);
        let scored = AtomicUsize::new(0);

        if let Some(cb) = &self.progress {
            cb.on_phase_start("scoring", n);
        }

        let candidates: Vec<PairCandidate> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let row: Vec<PairCandidate> = ((i + 1)..n)
                    .filter_map(|j| {
                        let (a, b) = (&entries[i], &entries[j]);
                        if a.parent_dir() == b.parent_dir() {
                            return None;
                        }
                        cross_folder.fetch_add(1, Ordering::Relaxed);

                        let pair_id = PairId::from_paths(&a.path, &b.path);
                        if ledger.contains(&pair_id) {
                            handled.fetch_add(1, Ordering::Relaxed);
                            return None;
                        }

                        scored.fetch_add(1, Ordering::Relaxed);
                        let score = self.config.algorithm.score(&names[i], &names[j]);
                        meets_threshold(score, self.config.threshold).then(|| PairCandidate {
                            first: a.clone(),
                            second: b.clone(),
                            pair_id,
                            score,
                        })
                    })
                    .collect();

                if let Some(cb) = &self.progress {
                    cb.on_item_completed();
                }
                row
            })
            .collect();

        if let Some(cb) = &self.progress {
            cb.on_phase_end("scoring");
        }

        let stats = PairStats {
            files: n,
            cross_folder_pairs: cross_folder.into_inner(),
            already_handled: handled.into_inner(),
            scored: scored.into_inner(),
            candidates: candidates.len(),
        };
        log::debug!("Pair generation: {:?}", stats);

        (candidates, stats)
    }
}
