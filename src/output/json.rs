//! JSON output for candidate listings.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "candidates": [
//!     {
//!       "first": "/music/Muse/Absolution/03 - Hysteria.mp3",
//!       "first_size": 8421337,
//!       "second": "/music/Muse/Live/Hysteria.flac",
//!       "second_size": 30112554,
//!       "score": 100,
//!       "pair_id": "5d41402abc4b2a76..."
//!     }
//!   ],
//!   "summary": {
//!     "folder": "/music",
//!     "threshold": 80,
//!     "algorithm": "indel",
//!     "files": 1200,
//!     "cross_folder_pairs": 700000,
//!     "already_handled": 12,
//!     "scored": 699988,
//!     "candidates": 1,
//!     "generated_at": "2024-05-01T10:00:00Z"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::Report;

/// One candidate pair in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCandidate {
    /// Earlier file in scan order
    pub first: String,
    /// Size of the first file in bytes
    pub first_size: u64,
    /// Later file in scan order
    pub second: String,
    /// Size of the second file in bytes
    pub second_size: u64,
    /// Similarity score, 0-100
    pub score: u8,
    /// Ledger identifier of the pair
    pub pair_id: String,
}

/// Summary of the listing run.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Scanned music folder
    pub folder: String,
    /// Threshold in effect
    pub threshold: u8,
    /// Similarity algorithm in effect
    pub algorithm: String,
    /// Files taking part in pairing
    pub files: usize,
    /// Cross-folder pairs enumerated
    pub cross_folder_pairs: usize,
    /// Pairs skipped because they were already resolved
    pub already_handled: usize,
    /// Pairs scored
    pub scored: usize,
    /// Pairs at or above the threshold
    pub candidates: usize,
    /// When the listing was produced (RFC 3339)
    pub generated_at: String,
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Candidate pairs in scan order
    pub candidates: Vec<JsonCandidate>,
    /// Run summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a report.
    #[must_use]
    pub fn new(report: &Report<'_>) -> Self {
        let candidates = report
            .candidates
            .iter()
            .map(|c| JsonCandidate {
                first: c.first.path.display().to_string(),
                first_size: c.first.size,
                second: c.second.path.display().to_string(),
                second_size: c.second.size,
                score: c.score,
                pair_id: c.pair_id.to_string(),
            })
            .collect();

        Self {
            candidates,
            summary: JsonSummary {
                folder: report.folder.display().to_string(),
                threshold: report.threshold,
                algorithm: report.algorithm.to_string(),
                files: report.stats.files,
                cross_folder_pairs: report.stats.cross_folder_pairs,
                already_handled: report.stats.already_handled,
                scored: report.stats.scored,
                candidates: report.stats.candidates,
                generated_at: report.generated_at.to_rfc3339(),
            },
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the writer fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)
    }
}
