//! Filesystem actions.
//!
//! This module provides functionality for:
//! - Removing one side of a candidate pair ([`delete`])
//! - Finding and removing directories left empty afterwards ([`prune`])
//!
//! ```no_run
//! use std::path::Path;
//! use trackdupe::actions::prune::{find_empty_dirs, remove_dirs};
//!
//! let flagged = find_empty_dirs(Path::new("/music")).unwrap();
//! let report = remove_dirs(&flagged);
//! println!("removed {} directories", report.removed.len());
//! ```

pub mod delete;
pub mod prune;

pub use delete::{
    delete_to_trash, permanent_delete, DeleteError, DeleteMode, DeleteResult, FileRemover,
    SystemRemover,
};
pub use prune::{find_empty_dirs, remove_dirs, PruneReport};
