//! Ledger of already-resolved candidate pairs.
//!
//! Every pair the operator resolved (a deletion or an explicit "keep both")
//! is recorded here by its [`PairId`]. Pairs in the ledger are dropped by the
//! candidate finder before they are scored, which is what makes repeated
//! scans of the same library idempotent.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{StoreError, Stored};
use crate::matching::PairId;

/// Current version of the ledger file format.
pub const LEDGER_VERSION: u32 = 1;

/// Set of resolved pair identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionLedger {
    handled: BTreeSet<PairId>,
}

impl Stored for DecisionLedger {
    const KIND: &'static str = "ledger";
    const VERSION: u32 = LEDGER_VERSION;
}

impl DecisionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger stored at `path`, or an empty one if there is none.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] if the file exists but does not verify.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let ledger = super::load::<Self>(path)?.unwrap_or_default();
        log::info!(
            "Decision ledger: {} resolved pair(s) from {}",
            ledger.len(),
            path.display()
        );
        Ok(ledger)
    }

    /// Atomically write the ledger to `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        super::save(path, self)
    }

    /// Whether `id` has already been resolved.
    #[must_use]
    pub fn contains(&self, id: &PairId) -> bool {
        self.handled.contains(id)
    }

    /// Record `id` as resolved. Returns `false` if it already was.
    pub fn mark_handled(&mut self, id: PairId) -> bool {
        self.handled.insert(id)
    }

    /// Number of resolved pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handled.len()
    }

    /// Whether no pair has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    /// Resolved identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &PairId> {
        self.handled.iter()
    }
}
