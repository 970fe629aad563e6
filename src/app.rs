//! Session driver.
//!
//! # Overview
//!
//! An interactive session runs these phases once, in order:
//!
//! 1. Load preferences (created on first run) and the decision ledger.
//!    A corrupt store ends the run here.
//! 2. Menu: start, or change the threshold or music folder. A change is
//!    saved and the session continues straight to the scan.
//! 3. Walk the music folder, normalize names, find candidates.
//! 4. Resolve candidates with the operator.
//! 5. Offer to remove directories left empty.
//!
//! `list` runs phases 1 and 3 read-only and prints the candidates.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bytesize::ByteSize;
use chrono::Utc;

use crate::actions::delete::{DeleteMode, SystemRemover};
use crate::actions::prune::{find_empty_dirs, remove_dirs};
use crate::cli::{OutputFormat, RunOverrides};
use crate::config::{Config, StorePaths};
use crate::error::{ExitCode, InputError};
use crate::matching::{CandidateFinder, FinderConfig, Normalizer, PairCandidate, PairStats};
use crate::output::{self, CsvOutput, JsonOutput, Report};
use crate::progress::ProgressCallback;
use crate::resolve::{Console, MenuChoice, ResolutionEngine};
use crate::scanner::Walker;
use crate::store::{DecisionLedger, Preferences};

/// Options for an interactive session beyond the configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// One-run folder and threshold overrides
    pub overrides: RunOverrides,
    /// Trash deleted tracks regardless of `delete_mode`
    pub trash: bool,
    /// Skip empty-directory cleanup regardless of `prune`
    pub no_prune: bool,
}

/// Configured application, ready to run a session or a listing.
pub struct App {
    config: Config,
    paths: StorePaths,
    default_root: PathBuf,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("paths", &self.paths)
            .field("default_root", &self.default_root)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl App {
    /// Create an application. `default_root` seeds the music folder when
    /// no preferences exist yet.
    #[must_use]
    pub fn new(config: Config, paths: StorePaths, default_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            paths,
            default_root: default_root.into(),
            progress: None,
        }
    }

    /// Show walk and scoring progress through a callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run an interactive session.
    ///
    /// # Errors
    ///
    /// Corrupt or unwritable stores, an unusable music folder, and console
    /// I/O failures. Failed deletions are not errors; they make the result
    /// [`ExitCode::PartialSuccess`].
    pub fn run_scan<R: BufRead, W: Write>(
        &self,
        options: &ScanOptions,
        console: &mut Console<R, W>,
    ) -> Result<ExitCode> {
        let mut prefs = Preferences::load_or_init(&self.paths.preferences, &self.default_root)
            .context("failed to load preferences")?;
        let mut ledger =
            DecisionLedger::load(&self.paths.ledger).context("failed to load decision ledger")?;

        let mut folder = options
            .overrides
            .folder
            .clone()
            .unwrap_or_else(|| prefs.music_folder.clone());
        let mut threshold = options
            .overrides
            .threshold
            .unwrap_or(prefs.similarity_threshold);

        let shown = Preferences {
            similarity_threshold: threshold,
            music_folder: folder.clone(),
        };
        match console.menu(&shown)? {
            None => {
                log::info!("No input at the menu, nothing to do");
                return Ok(ExitCode::Success);
            }
            Some(MenuChoice::Scan) => {}
            Some(MenuChoice::ChangeThreshold) => {
                if let Some(new) = console.prompt_threshold()? {
                    prefs.similarity_threshold = new;
                    prefs
                        .save(&self.paths.preferences)
                        .context("failed to save preferences")?;
                    threshold = new;
                    console.line(format_args!("Similarity threshold updated to {}%.", new))?;
                }
            }
            Some(MenuChoice::ChangeFolder) => match console.prompt_folder()? {
                Some(new) if new.is_dir() => {
                    prefs.music_folder = new.clone();
                    prefs
                        .save(&self.paths.preferences)
                        .context("failed to save preferences")?;
                    console.line(format_args!("Music folder updated to {}.", new.display()))?;
                    folder = new;
                }
                Some(new) => {
                    console.warn(&InputError::InvalidPath(new))?;
                    console.line(format_args!("Keeping {}.", folder.display()))?;
                }
                None => {}
            },
        }

        let (candidates, _stats) = self.find_candidates(&folder, threshold, &ledger)?;
        if candidates.is_empty() {
            console.line(format_args!(
                "No new similar track names found (excluding {} files).",
                self.excluded_label()
            ))?;
        } else {
            console.line(format_args!(
                "Found {} potential duplicate track pair(s) (excluding {} files).\n",
                candidates.len(),
                self.excluded_label()
            ))?;
        }

        let mode = if options.trash {
            DeleteMode::Trash
        } else {
            self.config.delete_mode
        };
        let remover = SystemRemover::new(mode);
        let report = ResolutionEngine::new(&candidates, &mut ledger, console, &remover)
            .with_ledger_path(&self.paths.ledger)
            .with_flush(self.config.ledger_flush)
            .run()
            .context("resolution aborted")?;

        if !report.deleted.is_empty() {
            console.line(format_args!(
                "\nDeleted {} file(s), {} freed.",
                report.deleted.len(),
                ByteSize::b(report.bytes_freed())
            ))?;
        }
        if report.has_failures() {
            console.line(format_args!(
                "{} deletion(s) failed; those pairs will be offered again next scan.",
                report.failures.len()
            ))?;
        }

        let mut partial = report.has_failures();
        if self.config.prune && !options.no_prune {
            partial |= Self::prune(&folder, console)?;
        }

        Ok(if partial {
            ExitCode::PartialSuccess
        } else {
            ExitCode::Success
        })
    }

    /// Offer removal of empty directories. Returns whether any removal failed.
    fn prune<R: BufRead, W: Write>(folder: &Path, console: &mut Console<R, W>) -> Result<bool> {
        let flagged = find_empty_dirs(folder)
            .with_context(|| format!("failed to look for empty folders in {}", folder.display()))?;
        if flagged.is_empty() {
            console.line("\nNo empty folders found.")?;
            return Ok(false);
        }

        console.show_empty_dirs(&flagged)?;
        if !console.confirm("Do you want to remove these folders?")? {
            return Ok(false);
        }

        let report = remove_dirs(&flagged);
        for failure in &report.failures {
            console.line(format_args!("Could not remove: {}", failure))?;
        }
        console.line(format_args!(
            "Removed {} of {} empty folder(s).",
            report.removed.len(),
            flagged.len()
        ))?;
        Ok(!report.all_succeeded())
    }

    /// Print the current candidates without changing any store.
    ///
    /// # Errors
    ///
    /// Corrupt stores, an unusable music folder and output failures.
    pub fn run_list<W: Write>(
        &self,
        overrides: &RunOverrides,
        format: OutputFormat,
        mut out: W,
    ) -> Result<ExitCode> {
        let prefs = Preferences::load(&self.paths.preferences)
            .context("failed to load preferences")?
            .unwrap_or_else(|| Preferences::defaults(&self.default_root));
        let ledger =
            DecisionLedger::load(&self.paths.ledger).context("failed to load decision ledger")?;

        let folder = overrides.folder.clone().unwrap_or(prefs.music_folder);
        let threshold = overrides.threshold.unwrap_or(prefs.similarity_threshold);
        let (candidates, stats) = self.find_candidates(&folder, threshold, &ledger)?;

        let report = Report {
            folder: &folder,
            threshold,
            algorithm: self.config.algorithm,
            candidates: &candidates,
            stats,
            generated_at: Utc::now(),
        };
        match format {
            OutputFormat::Text => output::write_text(&report, &mut out)?,
            OutputFormat::Json => JsonOutput::new(&report).write_to(&mut out)?,
            OutputFormat::Csv => CsvOutput::new(&candidates).write_to(&mut out)?,
        }

        Ok(if candidates.is_empty() {
            ExitCode::NoCandidates
        } else {
            ExitCode::Success
        })
    }

    /// Walk `folder` and return the unresolved pairs at or above `threshold`.
    fn find_candidates(
        &self,
        folder: &Path,
        threshold: u8,
        ledger: &DecisionLedger,
    ) -> Result<(Vec<PairCandidate>, PairStats)> {
        let mut walker = Walker::new(folder, self.config.walker_config());
        if let Some(progress) = &self.progress {
            walker = walker.with_progress(Arc::clone(progress));
        }
        let (files, errors) = walker
            .collect_files()
            .with_context(|| format!("cannot scan music folder {}", folder.display()))?;
        if !errors.is_empty() {
            log::warn!("{} entries could not be read and were skipped", errors.len());
        }
        log::info!("Scanning {} track file(s) in {}", files.len(), folder.display());

        let names = Normalizer::new(self.config.artist_source.strategy()).normalize_all(&files);

        let mut finder = CandidateFinder::new(FinderConfig {
            threshold,
            algorithm: self.config.algorithm,
        });
        if let Some(progress) = &self.progress {
            finder = finder.with_progress(Arc::clone(progress));
        }
        Ok(finder.find(&files, &names, ledger))
    }

    fn excluded_label(&self) -> String {
        if self.config.exclude_extensions.is_empty() {
            return "no".to_string();
        }
        self.config
            .exclude_extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
