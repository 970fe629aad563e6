//! Scanner module for directory traversal.
//!
//! This module provides functionality for:
//! - Deterministic directory walking using walkdir
//! - Cover-image exclusion by extension
//! - Unicode path normalization
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`path_utils`]: NFC normalization of file names
//!
//! # Example
//!
//! ```no_run
//! use trackdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/music"), WalkerConfig::default());
//! let (files, errors) = walker.collect_files().unwrap();
//! println!("{} tracks, {} unreadable entries", files.len(), errors.len());
//! ```

pub mod path_utils;
pub mod walker;

use std::path::{Path, PathBuf};

pub use walker::Walker;

/// Extensions excluded from scans unless configured otherwise (album covers).
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &["jpg"];

/// A discovered track file.
///
/// Only the path matters for duplicate detection; the size is kept so the
/// operator can see it next to each candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, as produced by the walk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }

    /// Immediate containing directory.
    #[must_use]
    pub fn parent_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Directory two levels up, conventionally the artist folder in
    /// `Artist/Album/Track.ext` layouts.
    #[must_use]
    pub fn grandparent_dir(&self) -> Option<&Path> {
        self.parent_dir().and_then(Path::parent)
    }

    /// Base name of the file as a (lossy) string.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Extensions (without the dot, compared case-insensitively) that are
    /// never reported.
    pub exclude_extensions: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            exclude_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool, exclude_extensions: Vec<String>) -> Self {
        Self {
            follow_symlinks,
            exclude_extensions,
        }
    }

    /// Whether the file name of `path` ends in one of the excluded
    /// extensions, ignoring case. A bare `.jpg` counts, as do names that
    /// are not valid UTF-8.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_ascii_lowercase();
        self.exclude_extensions.iter().any(|excluded| {
            let ext = excluded.trim_start_matches('.');
            !ext.is_empty() && name.ends_with(&format!(".{}", ext.to_ascii_lowercase()))
        })
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    pub(crate) fn from_io(path: &Path, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}
