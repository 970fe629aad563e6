//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a music library
//! and collecting every candidate track. The output order is part of the
//! contract: entries are sorted by path so that pair enumeration, and with
//! it every pair identifier, is reproducible between runs.
//!
//! # Features
//!
//! - Sorted, deterministic traversal
//! - Configurable symlink following
//! - Case-insensitive extension exclusion (cover images)
//! - Per-entry errors are collected instead of aborting the walk

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for track discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional progress callback
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            progress: None,
        }
    }

    /// Report discovered files to a progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists and is a directory.
    fn validate_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) => Err(ScanError::from_io(&self.root, e)),
        }
    }

    fn walkdir_to_scan_error(&self, e: walkdir::Error) -> ScanError {
        let path = e
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        match e.into_io_error() {
            Some(io_err) => ScanError::from_io(&path, io_err),
            None => ScanError::Io {
                path,
                source: io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
            },
        }
    }

    /// Walk the directory tree and collect every candidate track.
    ///
    /// Returns the files sorted by path together with the non-fatal errors
    /// met along the way (unreadable subdirectories and the like).
    ///
    /// # Errors
    ///
    /// Fails only when the root itself is missing, unreadable, or not a
    /// directory.
    pub fn collect_files(&self) -> Result<(Vec<FileEntry>, Vec<ScanError>), ScanError> {
        self.validate_root()?;

        if let Some(cb) = &self.progress {
            cb.on_phase_start("walking", 0);
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let walk = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let err = self.walkdir_to_scan_error(e);
                    log::warn!("Skipping unreadable entry: {}", err);
                    errors.push(err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.config.is_excluded(path) {
                log::trace!("Skipping excluded file: {}", path.display());
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    log::debug!("No metadata for {}: {}", path.display(), e);
                    0
                }
            };

            files.push(FileEntry::new(path.to_path_buf(), size));
            if let Some(cb) = &self.progress {
                cb.on_progress(files.len(), &path.to_string_lossy());
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(cb) = &self.progress {
            cb.on_phase_end("walking");
        }
        log::debug!(
            "Walk of {} found {} files ({} errors)",
            self.root.display(),
            files.len(),
            errors.len()
        );

        Ok((files, errors))
    }
}
