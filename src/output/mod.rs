//! Non-interactive candidate listings.
//!
//! `trackdupe list` scans exactly like an interactive session but only
//! prints what it would ask about:
//! - plain text for reading
//! - JSON for automation ([`json`])
//! - CSV for spreadsheets ([`csv`])

pub mod csv;
pub mod json;

use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;
use chrono::{DateTime, Utc};

use crate::matching::{Algorithm, PairCandidate, PairStats};

pub use csv::{CsvOutput, CsvOutputError};
pub use json::JsonOutput;

/// Everything a listing prints.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    /// Scanned music folder
    pub folder: &'a Path,
    /// Threshold in effect
    pub threshold: u8,
    /// Algorithm in effect
    pub algorithm: Algorithm,
    /// Candidates in scan order
    pub candidates: &'a [PairCandidate],
    /// Pair generation counters
    pub stats: PairStats,
    /// When the listing was produced
    pub generated_at: DateTime<Utc>,
}

/// Write the human-readable listing.
///
/// # Errors
///
/// Fails if the writer does.
pub fn write_text<W: Write>(report: &Report<'_>, mut out: W) -> io::Result<()> {
    if report.candidates.is_empty() {
        writeln!(
            out,
            "No new similar track names found in {} (threshold {}%).",
            report.folder.display(),
            report.threshold
        )?;
    } else {
        writeln!(
            out,
            "Found {} potential duplicate track pair(s) in {} (threshold {}%):",
            report.candidates.len(),
            report.folder.display(),
            report.threshold
        )?;
    }

    for (i, c) in report.candidates.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "#{} similarity {}%", i + 1, c.score)?;
        writeln!(
            out,
            "  1: {} ({})",
            c.first.path.display(),
            ByteSize::b(c.first.size)
        )?;
        writeln!(
            out,
            "  2: {} ({})",
            c.second.path.display(),
            ByteSize::b(c.second.size)
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} files, {} cross-folder pairs, {} already resolved",
        report.stats.files, report.stats.cross_folder_pairs, report.stats.already_handled
    )
}
