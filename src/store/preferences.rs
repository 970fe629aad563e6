//! Operator preferences: similarity threshold and music folder.
//!
//! The preferences store is created with defaults on first run and only
//! changes when the operator edits a value from the menu. Every edit is
//! persisted immediately.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{StoreError, Stored};
use crate::matching::DEFAULT_THRESHOLD;

/// Current version of the preferences file format.
pub const PREFERENCES_VERSION: u32 = 1;

/// Persisted operator preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Minimum similarity score (inclusive) for a candidate, `0..=100`.
    pub similarity_threshold: u8,
    /// Root of the library to scan.
    pub music_folder: PathBuf,
}

impl Stored for Preferences {
    const KIND: &'static str = "preferences";
    const VERSION: u32 = PREFERENCES_VERSION;
}

impl Preferences {
    /// Defaults for a library rooted at `root`.
    #[must_use]
    pub fn defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            similarity_threshold: DEFAULT_THRESHOLD,
            music_folder: root.into(),
        }
    }

    /// Load preferences from `path`. `None` if the store does not exist.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] if the store does not verify or holds a
    /// threshold above 100.
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        match super::load::<Self>(path)? {
            Some(prefs) if prefs.similarity_threshold > 100 => Err(StoreError::Corrupt {
                kind: Self::KIND,
                path: path.to_path_buf(),
                reason: format!(
                    "similarity threshold {} is out of range 0-100",
                    prefs.similarity_threshold
                ),
            }),
            loaded => Ok(loaded),
        }
    }

    /// Load preferences from `path`, creating the store with defaults for
    /// `default_root` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load), plus [`StoreError::Io`] if the defaults
    /// cannot be written.
    pub fn load_or_init(path: &Path, default_root: &Path) -> Result<Self, StoreError> {
        if let Some(prefs) = Self::load(path)? {
            return Ok(prefs);
        }
        let prefs = Self::defaults(default_root);
        prefs.save(path)?;
        log::info!("Created preferences at {}", path.display());
        Ok(prefs)
    }

    /// Atomically write the preferences to `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        super::save(path, self)
    }
}
