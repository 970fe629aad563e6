//! Application configuration.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `config.toml` in the platform config dir)
//! 3. `TRACKDUPE_*` environment variables
//! 4. Command-line flags, applied by the caller
//!
//! ```toml
//! exclude_extensions = ["jpg", "png"]
//! artist_source = "parent"
//! algorithm = "jaro-winkler"
//! delete_mode = "trash"
//! ledger_flush = "each"
//! ```
//!
//! The similarity threshold and music folder are not configuration: they
//! live in the preferences store and change through the menu.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::delete::DeleteMode;
use crate::matching::{Algorithm, ArtistSource};
use crate::resolve::LedgerFlush;
use crate::scanner::{WalkerConfig, DEFAULT_EXCLUDED_EXTENSIONS};

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "TRACKDUPE_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer holds a value of the wrong type or an unknown variant.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// No home directory to derive default locations from.
    #[error("could not determine platform directories; pass --ledger and --preferences")]
    NoProjectDirs,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger store file. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<PathBuf>,
    /// Preferences store file. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<PathBuf>,
    /// Extensions never treated as tracks, compared case-insensitively.
    pub exclude_extensions: Vec<String>,
    /// Which directory names the artist.
    pub artist_source: ArtistSource,
    /// Name similarity algorithm.
    pub algorithm: Algorithm,
    /// How deleted tracks are removed.
    pub delete_mode: DeleteMode,
    /// When the ledger is written during resolution.
    pub ledger_flush: LedgerFlush,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Offer empty-directory cleanup after resolution.
    pub prune: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: None,
            preferences_path: None,
            exclude_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            artist_source: ArtistSource::default(),
            algorithm: Algorithm::default(),
            delete_mode: DeleteMode::default(),
            ledger_flush: LedgerFlush::default(),
            follow_symlinks: false,
            prune: true,
        }
    }
}

/// Resolved locations of the two stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Decision ledger file
    pub ledger: PathBuf,
    /// Preferences file
    pub preferences: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "trackdupe", "trackdupe")
}

impl Config {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// `explicit` is a file given with `--config`; it must exist. Without it
    /// the platform config file is used if present.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] for a missing explicit file,
    /// [`ConfigError::Invalid`] when a layer cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_file(),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = &file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when a value cannot be deserialized.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Platform config file, if a home directory is known.
    #[must_use]
    pub fn default_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolve store locations: command-line override, then configuration,
    /// then the platform data dir.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoProjectDirs`] if a default location is needed and
    /// none can be determined.
    pub fn store_paths(
        &self,
        ledger: Option<&Path>,
        preferences: Option<&Path>,
    ) -> Result<StorePaths, ConfigError> {
        let ledger = ledger.map(Path::to_path_buf).or_else(|| self.ledger_path.clone());
        let preferences = preferences
            .map(Path::to_path_buf)
            .or_else(|| self.preferences_path.clone());

        let data_file = |name: &str| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join(name))
                .ok_or(ConfigError::NoProjectDirs)
        };

        Ok(StorePaths {
            ledger: match ledger {
                Some(path) => path,
                None => data_file("ledger.json")?,
            },
            preferences: match preferences {
                Some(path) => path,
                None => data_file("preferences.json")?,
            },
        })
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Fails only if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.exclude_extensions.clone())
    }
}
