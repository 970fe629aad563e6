//! Track file removal.
//!
//! # Overview
//!
//! Deleting one side of a candidate pair goes through the [`FileRemover`]
//! trait so that the resolution engine can be driven against a fake in
//! tests. [`SystemRemover`] is the real implementation:
//! - [`DeleteMode::Permanent`] (default) unlinks the file
//! - [`DeleteMode::Trash`] moves it to the system trash
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use trackdupe::actions::delete::{DeleteMode, FileRemover, SystemRemover};
//!
//! let remover = SystemRemover::new(DeleteMode::Trash);
//! match remover.remove(Path::new("/music/Muse/Old/03 - Hysteria.mp3")) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for file and directory removal.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The file is gone (deleted earlier in the run or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Moving to the trash failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// File that could not be trashed
        path: PathBuf,
        /// Message from the trash backend
        message: String,
    },

    /// Unlinking the file failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed {
        /// File that could not be removed
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// Removing an empty directory failed.
    #[error("could not remove directory {path}: {source}")]
    DirectoryRemoveFailed {
        /// Directory that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Other I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::TrashFailed { path, .. }
            | Self::PermanentDeleteFailed { path, .. }
            | Self::DirectoryRemoveFailed { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// How files are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink the file.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

/// A successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Removed file
    pub path: PathBuf,
    /// Size in bytes before removal
    pub size: u64,
    /// Whether the file was unlinked rather than trashed
    pub permanent: bool,
}

/// Something that can remove a track file.
pub trait FileRemover {
    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// A [`DeleteError`] describing why the file is still there.
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError>;
}

/// Removes files from the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRemover {
    mode: DeleteMode,
}

impl SystemRemover {
    /// Create a remover using `mode`.
    #[must_use]
    pub fn new(mode: DeleteMode) -> Self {
        Self { mode }
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> DeleteMode {
        self.mode
    }
}

impl FileRemover for SystemRemover {
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError> {
        match self.mode {
            DeleteMode::Permanent => permanent_delete(path),
            DeleteMode::Trash => delete_to_trash(path),
        }
    }
}

fn file_size(path: &Path) -> Result<u64, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    Ok(metadata.len())
}

/// Move a file to the system trash.
///
/// # Errors
///
/// [`DeleteError::NotFound`] if the file is already gone,
/// [`DeleteError::TrashFailed`] if the trash backend refuses it.
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: false,
    })
}

/// Permanently delete a file.
///
/// # Errors
///
/// [`DeleteError::NotFound`] if the file is already gone,
/// [`DeleteError::PermanentDeleteFailed`] if unlinking fails.
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: true,
    })
}
