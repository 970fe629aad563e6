//! Resolution state machine.
//!
//! # Overview
//!
//! Candidates are walked in order. Each one goes through
//!
//! ```text
//! Presenting(i) -> AwaitingDecision(i) -> Applying(i, action) -> Presenting(i + 1)
//! ```
//!
//! until the list is exhausted ([`State::Done`]) or the operator stops
//! ([`State::Stopped`]). An unrecognized answer keeps the engine in
//! `AwaitingDecision`; end of input counts as a stop.
//!
//! A pair is marked in the [`DecisionLedger`] when the chosen file was
//! removed or both were kept. A failed removal is reported and the pair is
//! left unmarked, so it is offered again on the next scan. Stopping leaves
//! the current pair and every later one unmarked.
//!
//! The ledger is written once on reaching `Done` or `Stopped`, and also
//! after every marking with [`LedgerFlush::Each`]. If talking to the
//! operator fails, the markings made so far are still written before the
//! error is returned.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::actions::delete::{DeleteError, DeleteResult, FileRemover};
use crate::error::InputError;
use crate::matching::PairCandidate;
use crate::store::{DecisionLedger, StoreError};

/// Operator decision for one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Remove the first file (`1`).
    DeleteFirst,
    /// Remove the second file (`2`).
    DeleteSecond,
    /// Keep both files (`n` or an empty answer).
    KeepBoth,
    /// End the session (`s`).
    Stop,
}

impl Action {
    /// Accepted answers, for prompts and error messages.
    pub const CHOICES: &'static str = "1, 2, n or s";

    /// Parse an answer. Surrounding whitespace and case are ignored.
    ///
    /// # Errors
    ///
    /// [`InputError::InvalidChoice`] for anything else.
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let answer = input.trim();
        match answer.to_ascii_lowercase().as_str() {
            "1" => Ok(Self::DeleteFirst),
            "2" => Ok(Self::DeleteSecond),
            "" | "n" => Ok(Self::KeepBoth),
            "s" => Ok(Self::Stop),
            _ => Err(InputError::InvalidChoice {
                input: answer.to_string(),
                expected: Self::CHOICES,
            }),
        }
    }
}

/// Where the engine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// About to show candidate `i`.
    Presenting(usize),
    /// Waiting for the operator's answer on candidate `i`.
    AwaitingDecision(usize),
    /// Carrying out the decision on candidate `i`.
    Applying(usize, Action),
    /// The operator stopped the session.
    Stopped,
    /// Every candidate has been handled.
    Done,
}

impl State {
    /// Whether the engine has finished.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Done)
    }
}

/// When the ledger is written during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerFlush {
    /// Once, when the session ends.
    #[default]
    End,
    /// After every decision that marks a pair, and when the session ends.
    Each,
}

/// The interactive side of resolution.
pub trait Operator {
    /// Show candidate `position` (0-based) of `total`.
    fn present(&mut self, position: usize, total: usize, candidate: &PairCandidate)
        -> io::Result<()>;

    /// Read the next answer. `None` means input has ended.
    fn read_decision(&mut self) -> io::Result<Option<String>>;

    /// Tell the operator an answer was not understood.
    fn reject(&mut self, error: &InputError) -> io::Result<()>;

    /// Confirm that a file was removed.
    fn deleted(&mut self, result: &DeleteResult) -> io::Result<()>;

    /// Report that a file could not be removed.
    fn failed(&mut self, error: &DeleteError) -> io::Result<()>;
}

/// Errors that abort resolution.
#[derive(thiserror::Error, Debug)]
pub enum ResolutionError {
    /// Talking to the operator failed.
    #[error("operator I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The ledger could not be written.
    #[error("failed to persist decision ledger: {0}")]
    Store(#[from] StoreError),
}

/// What happened during a resolution session.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    /// Candidates shown to the operator.
    pub presented: usize,
    /// Pairs marked in the ledger.
    pub handled: usize,
    /// Files removed.
    pub deleted: Vec<DeleteResult>,
    /// Removals that failed; their pairs stay unmarked.
    pub failures: Vec<DeleteError>,
    /// Whether the operator stopped before the end.
    pub stopped: bool,
}

impl ResolutionReport {
    /// Total bytes freed by removals.
    #[must_use]
    pub fn bytes_freed(&self) -> u64 {
        self.deleted.iter().map(|d| d.size).sum()
    }

    /// Whether any removal failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Drives the operator through a list of candidates.
pub struct ResolutionEngine<'a, O: Operator, R: FileRemover> {
    candidates: &'a [PairCandidate],
    ledger: &'a mut DecisionLedger,
    operator: &'a mut O,
    remover: &'a R,
    ledger_path: Option<PathBuf>,
    flush: LedgerFlush,
    state: State,
    report: ResolutionReport,
}

impl<O: Operator, R: FileRemover> fmt::Debug for ResolutionEngine<'_, O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("candidates", &self.candidates.len())
            .field("ledger_path", &self.ledger_path)
            .field("flush", &self.flush)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, O: Operator, R: FileRemover> ResolutionEngine<'a, O, R> {
    /// Create an engine over `candidates`. Markings go into `ledger`.
    pub fn new(
        candidates: &'a [PairCandidate],
        ledger: &'a mut DecisionLedger,
        operator: &'a mut O,
        remover: &'a R,
    ) -> Self {
        Self {
            candidates,
            ledger,
            operator,
            remover,
            ledger_path: None,
            flush: LedgerFlush::default(),
            state: State::Presenting(0),
            report: ResolutionReport::default(),
        }
    }

    /// Persist the ledger to `path`. Without a path the ledger is only
    /// updated in memory.
    #[must_use]
    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = Some(path.into());
        self
    }

    /// Set when the ledger is written.
    #[must_use]
    pub fn with_flush(mut self, flush: LedgerFlush) -> Self {
        self.flush = flush;
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Report so far.
    #[must_use]
    pub fn report(&self) -> &ResolutionReport {
        &self.report
    }

    /// Advance by one transition and return the new state.
    ///
    /// Terminal states are sticky.
    ///
    /// # Errors
    ///
    /// Operator I/O failures and ledger write failures. The ledger is saved
    /// before an I/O failure is returned.
    pub fn step(&mut self) -> Result<State, ResolutionError> {
        match self.advance() {
            Err(ResolutionError::Io(e)) => {
                if let Err(save) = self.persist() {
                    log::error!("Could not save decision ledger: {}", save);
                }
                Err(ResolutionError::Io(e))
            }
            other => other,
        }
    }

    fn advance(&mut self) -> Result<State, ResolutionError> {
        let next = match self.state {
            State::Presenting(i) if i >= self.candidates.len() => self.finish(State::Done)?,
            State::Presenting(i) => {
                self.operator
                    .present(i, self.candidates.len(), &self.candidates[i])?;
                self.report.presented += 1;
                State::AwaitingDecision(i)
            }
            State::AwaitingDecision(i) => match self.operator.read_decision()? {
                None => {
                    log::debug!("Input ended, stopping");
                    State::Applying(i, Action::Stop)
                }
                Some(answer) => match Action::parse(&answer) {
                    Ok(action) => State::Applying(i, action),
                    Err(e) => {
                        self.operator.reject(&e)?;
                        State::AwaitingDecision(i)
                    }
                },
            },
            State::Applying(_, Action::Stop) => {
                self.report.stopped = true;
                self.finish(State::Stopped)?
            }
            State::Applying(i, action) => {
                self.apply(i, action)?;
                State::Presenting(i + 1)
            }
            terminal => terminal,
        };
        self.state = next;
        Ok(next)
    }

    /// Run until the session ends.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn run(mut self) -> Result<ResolutionReport, ResolutionError> {
        while !self.step()?.is_terminal() {}
        log::info!(
            "Resolution {}: {} of {} pair(s) resolved, {} file(s) deleted, {} failure(s)",
            if self.report.stopped { "stopped" } else { "finished" },
            self.report.handled,
            self.candidates.len(),
            self.report.deleted.len(),
            self.report.failures.len()
        );
        Ok(self.report)
    }

    fn apply(&mut self, i: usize, action: Action) -> Result<(), ResolutionError> {
        let candidates = self.candidates;
        let candidate = &candidates[i];
        let target = match action {
            Action::DeleteFirst => Some(&candidate.first.path),
            Action::DeleteSecond => Some(&candidate.second.path),
            Action::KeepBoth | Action::Stop => None,
        };

        if let Some(path) = target {
            match self.remover.remove(path) {
                Ok(result) => {
                    self.operator.deleted(&result)?;
                    self.report.deleted.push(result);
                }
                Err(e) => {
                    log::warn!("Pair {} left unresolved: {}", candidate.pair_id, e);
                    self.operator.failed(&e)?;
                    self.report.failures.push(e);
                    return Ok(());
                }
            }
        }

        self.ledger.mark_handled(candidate.pair_id.clone());
        self.report.handled += 1;
        if self.flush == LedgerFlush::Each {
            if let Err(e) = self.persist() {
                log::warn!("Could not save decision ledger, retrying at the end: {}", e);
            }
        }
        Ok(())
    }

    fn finish(&mut self, terminal: State) -> Result<State, ResolutionError> {
        self.persist()?;
        Ok(terminal)
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.ledger_path {
            Some(path) => self.ledger.save(path),
            None => Ok(()),
        }
    }

    /// Ledger file, if any.
    #[must_use]
    pub fn ledger_path(&self) -> Option<&Path> {
        self.ledger_path.as_deref()
    }
}
