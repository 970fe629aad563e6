//! Empty-directory cleanup after resolution.
//!
//! # Overview
//!
//! Deleting tracks tends to leave album folders with nothing in them. The
//! prune pass walks the library bottom-up (children before parents) and
//! flags a directory when it is empty, or when every entry it holds is a
//! directory that was itself flagged. A chain like `Artist/Album/CD1` with
//! nothing in `CD1` is therefore flagged in a single run, deepest first.
//! The library root is never flagged.
//!
//! Flagged directories are removed with [`remove_dirs`] in the order
//! returned by [`find_empty_dirs`], so each parent is only removed after its
//! children. A failure on one directory does not stop the batch.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::delete::DeleteError;
use crate::scanner::ScanError;

/// Outcome of removing flagged directories.
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Directories that were removed, in removal order.
    pub removed: Vec<PathBuf>,
    /// Directories that could not be removed.
    pub failures: Vec<DeleteError>,
}

impl PruneReport {
    /// Whether every flagged directory was removed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Find directories under `root` that are empty or contain only empty
/// directories, deepest first.
///
/// Unreadable subdirectories are logged and treated as non-empty.
///
/// # Errors
///
/// Fails when `root` is missing, unreadable or not a directory.
pub fn find_empty_dirs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let meta = fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut flagged = Vec::new();
    let mut flagged_set = HashSet::new();

    let walk = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry during cleanup: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        match only_flagged_children(dir, &flagged_set) {
            Ok(true) => {
                log::debug!("Empty directory: {}", dir.display());
                flagged_set.insert(dir.to_path_buf());
                flagged.push(dir.to_path_buf());
            }
            Ok(false) => {}
            Err(e) => log::warn!("Cannot read {}: {}", dir.display(), e),
        }
    }

    Ok(flagged)
}

fn only_flagged_children(dir: &Path, flagged: &HashSet<PathBuf>) -> std::io::Result<bool> {
    for child in fs::read_dir(dir)? {
        let child = child?;
        if !child.file_type()?.is_dir() || !flagged.contains(&child.path()) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove the given directories in order.
///
/// Each directory must be empty by the time it is reached; non-empty
/// directories fail rather than being removed recursively.
#[must_use]
pub fn remove_dirs(dirs: &[PathBuf]) -> PruneReport {
    let mut report = PruneReport::default();
    for dir in dirs {
        match fs::remove_dir(dir) {
            Ok(()) => {
                log::info!("Removed empty directory: {}", dir.display());
                report.removed.push(dir.clone());
            }
            Err(source) => {
                log::error!("Could not remove {}: {}", dir.display(), source);
                report.failures.push(DeleteError::DirectoryRemoveFailed {
                    path: dir.clone(),
                    source,
                });
            }
        }
    }
    report
}
