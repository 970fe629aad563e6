//! trackdupe - interactive near-duplicate track finder
//!
//! Finds track files that appear in more than one album folder of a music
//! library by comparing normalized file names, lets the operator decide
//! which copy to delete, and records every decision so that later scans
//! never ask about the same pair again.
//!
//! # Modules
//!
//! - [`scanner`]: deterministic walk of the music folder
//! - [`matching`]: name normalization, similarity scoring, candidate pairs
//! - [`store`]: decision ledger and preferences, checksummed on disk
//! - [`resolve`]: the per-pair decision state machine and its console
//! - [`actions`]: file deletion and empty-directory cleanup
//! - [`app`]: the session driver behind the CLI

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod matching;
pub mod output;
pub mod progress;
pub mod resolve;
pub mod scanner;
pub mod store;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::app::{App, ScanOptions};
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::ExitCode;
use crate::progress::Progress;
use crate::resolve::Console;

/// Run the command described by `cli`.
///
/// # Errors
///
/// Any error that ends the run; map it with [`ExitCode::from_error`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    log::debug!("Configuration: {:?}", config);

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml().context("failed to render configuration")?);
        return Ok(ExitCode::Success);
    }

    let paths = config.store_paths(cli.ledger.as_deref(), cli.preferences.as_deref())?;
    log::debug!(
        "Stores: ledger {}, preferences {}",
        paths.ledger.display(),
        paths.preferences.display()
    );

    let default_root = std::env::current_dir().context("cannot determine current directory")?;
    let app = App::new(config, paths, default_root).with_progress(Arc::new(Progress::new(cli.quiet)));

    match cli.command {
        Commands::Scan(args) => {
            let options = ScanOptions {
                overrides: args.overrides,
                trash: args.trash,
                no_prune: args.no_prune,
            };
            app.run_scan(&options, &mut Console::stdio())
        }
        Commands::List(args) => app.run_list(&args.overrides, args.output, io::stdout().lock()),
        Commands::Config => Ok(ExitCode::Success),
    }
}
