//! Duplicate-candidate engine.
//!
//! This module provides functionality for:
//! - Normalizing file names into comparison strings ([`normalize`])
//! - Scoring two comparison strings ([`similarity`])
//! - Enumerating and filtering cross-folder pairs ([`pairs`])
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use trackdupe::matching::{CandidateFinder, FinderConfig, Normalizer};
//! use trackdupe::scanner::FileEntry;
//! use trackdupe::store::DecisionLedger;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/m/Muse/Absolution/03 - Hysteria.mp3"), 0),
//!     FileEntry::new(PathBuf::from("/m/Muse/Absolution (2003)/3.Hysteria.flac"), 0),
//! ];
//! let names = Normalizer::default().normalize_all(&files);
//! let (candidates, _stats) =
//!     CandidateFinder::new(FinderConfig::default()).find(&files, &names, &DecisionLedger::new());
//!
//! assert_eq!(candidates.len(), 1);
//! assert_eq!(candidates[0].score, 100);
//! ```

pub mod normalize;
pub mod pairs;
pub mod similarity;

pub use normalize::{ArtistSource, ArtistStrategy, GrandparentDir, NoArtist, Normalizer, ParentDir};
pub use pairs::{CandidateFinder, FinderConfig, PairCandidate, PairId, PairStats};
pub use similarity::{indel_ratio, meets_threshold, Algorithm, DEFAULT_THRESHOLD};
