//! CSV output for candidate listings.
//!
//! One row per candidate pair, in scan order.
//!
//! # Columns
//!
//! - `first`, `first_size`: earlier file and its size in bytes
//! - `second`, `second_size`: later file and its size in bytes
//! - `score`: similarity, 0-100
//! - `pair_id`: ledger identifier

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::matching::PairCandidate;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    first: String,
    first_size: u64,
    second: String,
    second_size: u64,
    score: u8,
    pair_id: &'a str,
}

/// CSV output formatter.
#[derive(Debug)]
pub struct CsvOutput<'a> {
    candidates: &'a [PairCandidate],
}

impl<'a> CsvOutput<'a> {
    /// Create a formatter over `candidates`.
    #[must_use]
    pub fn new(candidates: &'a [PairCandidate]) -> Self {
        Self { candidates }
    }

    /// Write a header row and one row per candidate.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the writer fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv = csv::Writer::from_writer(writer);
        if self.candidates.is_empty() {
            csv.write_record([
                "first",
                "first_size",
                "second",
                "second_size",
                "score",
                "pair_id",
            ])?;
        }
        for c in self.candidates {
            csv.serialize(CsvRow {
                first: c.first.path.display().to_string(),
                first_size: c.first.size,
                second: c.second.path.display().to_string(),
                second_size: c.second.size,
                score: c.score,
                pair_id: c.pair_id.as_str(),
            })?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Render to a string.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn render(&self) -> Result<String, CsvOutputError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
