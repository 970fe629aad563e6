//! Command-line interface definitions for trackdupe.
//!
//! Global options (verbosity, color, store locations) apply to every
//! subcommand.
//!
//! # Example
//!
//! ```bash
//! # Interactive session on the stored music folder
//! trackdupe scan
//!
//! # One-off session on another folder with a stricter threshold
//! trackdupe scan --folder /mnt/usb/music --threshold 90
//!
//! # Machine-readable candidate list
//! trackdupe list --output json
//!
//! # Keep the stores next to the library
//! trackdupe --ledger /music/.trackdupe/ledger.json scan
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Interactive near-duplicate track finder.
///
/// trackdupe compares normalized track file names across album folders,
/// asks which copy to delete, and remembers every decision so a pair is
/// never asked about twice.
#[derive(Debug, Parser)]
#[command(name = "trackdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as a JSON object on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: config.toml in the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Decision ledger file (default: ledger.json in the platform data dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Preferences file (default: preferences.json in the platform data dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub preferences: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive session: menu, candidate resolution, empty-folder cleanup
    Scan(ScanArgs),
    /// Print the current candidates without changing anything
    List(ListArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Folder and threshold overrides shared by `scan` and `list`.
///
/// Overrides apply to this run only; stored preferences are not changed.
#[derive(Debug, Args, Clone, Default)]
pub struct RunOverrides {
    /// Music folder to scan instead of the stored one
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Similarity threshold (0-100) instead of the stored one
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub overrides: RunOverrides,

    /// Move deleted tracks to the system trash instead of unlinking them
    #[arg(long)]
    pub trash: bool,

    /// Skip the empty-folder cleanup at the end
    #[arg(long)]
    pub no_prune: bool,
}

/// Arguments for the list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub overrides: RunOverrides,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document with candidates and a summary
    Json,
    /// One CSV row per candidate
    Csv,
}
