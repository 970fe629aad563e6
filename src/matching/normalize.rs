//! File name normalization for comparison.
//!
//! A track's comparison string is its base name with the artist name, the
//! leading track number and the extension removed, so that
//! `Artist/Album (2009)/03 - Song.flac` and `Artist/Album/3.Song.mp3` both
//! compare as `Song`.
//!
//! Which part of the path names the artist is a library-layout convention,
//! so it is supplied by an [`ArtistStrategy`]. The default,
//! [`GrandparentDir`], follows the common `Artist/Album/Track` layout.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use trackdupe::matching::Normalizer;
//! use trackdupe::scanner::FileEntry;
//!
//! let normalizer = Normalizer::default();
//! let entry = FileEntry::new(PathBuf::from("/music/Air/Moon Safari/01 - Air - La femme d'argent.flac"), 0);
//! assert_eq!(normalizer.normalize(&entry), "- La femme d'argent");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scanner::path_utils::normalize_name;
use crate::scanner::FileEntry;

/// Leading track number: optional whitespace, digits, optional separator.
static TRACK_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*[-.]?\s*").expect("track number pattern is valid"));

/// Extracts the artist name for a track from its location in the library.
pub trait ArtistStrategy: Send + Sync + fmt::Debug {
    /// Artist name for `entry`, or `None` when the layout does not provide one.
    fn artist(&self, entry: &FileEntry) -> Option<String>;
}

/// Artist is the name of the directory two levels above the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrandparentDir;

impl ArtistStrategy for GrandparentDir {
    fn artist(&self, entry: &FileEntry) -> Option<String> {
        entry
            .grandparent_dir()
            .and_then(|p| p.file_name())
            .map(|n| normalize_name(&n.to_string_lossy()).into_owned())
    }
}

/// Artist is the name of the directory holding the file (flat
/// `Artist/Track` layouts).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentDir;

impl ArtistStrategy for ParentDir {
    fn artist(&self, entry: &FileEntry) -> Option<String> {
        entry
            .parent_dir()
            .and_then(|p| p.file_name())
            .map(|n| normalize_name(&n.to_string_lossy()).into_owned())
    }
}

/// No artist stripping at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtist;

impl ArtistStrategy for NoArtist {
    fn artist(&self, _entry: &FileEntry) -> Option<String> {
        None
    }
}

/// Configuration-level selector for the built-in artist strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistSource {
    /// `Artist/Album/Track` layout
    #[default]
    Grandparent,
    /// `Artist/Track` layout
    Parent,
    /// Do not strip artist names
    None,
}

impl ArtistSource {
    /// Build the strategy this source selects.
    #[must_use]
    pub fn strategy(self) -> Box<dyn ArtistStrategy> {
        match self {
            Self::Grandparent => Box::new(GrandparentDir),
            Self::Parent => Box::new(ParentDir),
            Self::None => Box::new(NoArtist),
        }
    }
}

/// Turns file entries into comparison strings.
#[derive(Debug)]
pub struct Normalizer {
    strategy: Box<dyn ArtistStrategy>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(GrandparentDir))
    }
}

impl Normalizer {
    /// Create a normalizer using the given artist strategy.
    #[must_use]
    pub fn new(strategy: Box<dyn ArtistStrategy>) -> Self {
        Self { strategy }
    }

    /// Normalize a single entry.
    #[must_use]
    pub fn normalize(&self, entry: &FileEntry) -> String {
        let artist = self.strategy.artist(entry);
        let pattern = artist.as_deref().and_then(artist_pattern);
        normalize_with(&entry.file_name(), pattern.as_ref())
    }

    /// Normalize every entry once, reusing the artist pattern across tracks
    /// that share an artist.
    ///
    /// The output is index-aligned with `entries`.
    #[must_use]
    pub fn normalize_all(&self, entries: &[FileEntry]) -> Vec<String> {
        let mut patterns: HashMap<String, Option<Regex>> = HashMap::new();

        entries
            .iter()
            .map(|entry| {
                let pattern = match self.strategy.artist(entry) {
                    Some(artist) => patterns
                        .entry(artist)
                        .or_insert_with_key(|a| artist_pattern(a))
                        .as_ref(),
                    None => None,
                };
                normalize_with(&entry.file_name(), pattern)
            })
            .collect()
    }
}

/// Case-insensitive whole-word matcher for an artist name.
fn artist_pattern(artist: &str) -> Option<Regex> {
    let artist = artist.trim();
    if artist.is_empty() {
        return None;
    }

    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(artist))) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Cannot build artist pattern for '{}': {}", artist, e);
            None
        }
    }
}

fn normalize_with(file_name: &str, artist: Option<&Regex>) -> String {
    let name = normalize_name(file_name);

    let without_artist = match artist {
        Some(re) => re.replace_all(&name, "").trim().to_string(),
        None => name.trim().to_string(),
    };

    let without_number = TRACK_NUMBER.replace(&without_artist, "");
    strip_extension(without_number.trim()).trim().to_string()
}

/// Drop the last `.suffix` of a name. Leading dots do not start an
/// extension, so `.flac` is kept whole.
fn strip_extension(name: &str) -> &str {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(idx) if idx > leading_dots => &name[..idx],
        _ => name,
    }
}
