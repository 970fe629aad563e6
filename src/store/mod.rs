//! Persistent stores for operator decisions and preferences.
//!
//! # Features
//!
//! * **Schema**: each store is a JSON envelope naming its kind and version.
//! * **Integrity**: the payload is covered by a SHA256 checksum.
//! * **Atomic writes**: data goes to a sibling temp file that is then renamed
//!   over the store, so a crash never leaves a half-written file behind.
//! * **Absent vs corrupt**: a missing store means "use defaults"; a store
//!   that exists but does not verify is a [`StoreError::Corrupt`] and is
//!   never silently replaced.
//!
//! # Architecture
//!
//! * [`ledger`]: the set of resolved pair identifiers.
//! * [`preferences`]: similarity threshold and music folder.
//!
//! Only one process should use a given store at a time; there is no locking.

pub mod ledger;
pub mod preferences;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use ledger::{DecisionLedger, LEDGER_VERSION};
pub use preferences::{Preferences, PREFERENCES_VERSION};

/// A value persisted in its own store file.
pub trait Stored: Serialize + DeserializeOwned {
    /// Identifies the store so that swapped files are detected.
    const KIND: &'static str;
    /// Current schema version.
    const VERSION: u32;
}

/// Errors raised by store I/O.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The store exists but cannot be trusted.
    #[error("corrupt {kind} store at {path}: {reason}")]
    Corrupt {
        /// Store kind
        kind: &'static str,
        /// Store file
        path: PathBuf,
        /// What failed
        reason: String,
    },

    /// Reading or writing the store failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Store file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serializing the payload failed.
    #[error("failed to serialize {kind} store: {source}")]
    Serialize {
        /// Store kind
        kind: &'static str,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Whether this error means the persisted state is unusable.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// On-disk wrapper around a store payload.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    kind: String,
    version: u32,
    saved_at: DateTime<Utc>,
    /// SHA256 of the compact JSON payload.
    checksum: String,
    payload: T,
}

fn checksum<T: Serialize>(kind: &'static str, payload: &T) -> Result<String, StoreError> {
    let compact = serde_json::to_string(payload)
        .map_err(|source| StoreError::Serialize { kind, source })?;
    let mut hasher = Sha256::new();
    hasher.update(compact.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Load a store.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// [`StoreError::Corrupt`] if the file cannot be parsed, is of another
/// kind, has an unsupported version or fails its checksum;
/// [`StoreError::Io`] if it cannot be read.
pub fn load<T: Stored>(path: &Path) -> Result<Option<T>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let corrupt = |reason: String| StoreError::Corrupt {
        kind: T::KIND,
        path: path.to_path_buf(),
        reason,
    };

    let envelope: Envelope<T> = serde_json::from_str(&content)
        .map_err(|e| corrupt(format!("failed to parse store envelope: {}", e)))?;

    if envelope.kind != T::KIND {
        return Err(corrupt(format!(
            "expected a '{}' store, found '{}'",
            T::KIND,
            envelope.kind
        )));
    }

    if envelope.version != T::VERSION {
        return Err(corrupt(format!(
            "unsupported version {} (current version is {})",
            envelope.version,
            T::VERSION
        )));
    }

    let calculated = checksum(T::KIND, &envelope.payload)?;
    if calculated != envelope.checksum {
        return Err(corrupt("integrity check failed: checksum mismatch".to_string()));
    }

    log::debug!(
        "Loaded {} store from {} (saved {})",
        T::KIND,
        path.display(),
        envelope.saved_at.to_rfc3339()
    );
    Ok(Some(envelope.payload))
}

/// Atomically replace a store with `value`.
///
/// # Errors
///
/// [`StoreError::Io`] if the directory cannot be created or the file cannot
/// be written or renamed.
pub fn save<T: Stored>(path: &Path, value: &T) -> Result<(), StoreError> {
    let envelope = Envelope {
        kind: T::KIND.to_string(),
        version: T::VERSION,
        saved_at: Utc::now(),
        checksum: checksum(T::KIND, value)?,
        payload: value,
    };
    let json = serde_json::to_string_pretty(&envelope).map_err(|source| StoreError::Serialize {
        kind: T::KIND,
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let tmp = temp_path(path);
    let mut file = File::create(&tmp).map_err(io_err(&tmp))?;
    file.write_all(json.as_bytes()).map_err(io_err(&tmp))?;
    file.sync_all().map_err(io_err(&tmp))?;
    drop(file);

    fs::rename(&tmp, path).map_err(io_err(path))?;
    log::debug!("Saved {} store to {}", T::KIND, path.display());
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
