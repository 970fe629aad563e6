use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trackdupe::app::App;
use trackdupe::config::{Config, StorePaths};
use trackdupe::matching::{CandidateFinder, FinderConfig, Normalizer, PairCandidate};
use trackdupe::resolve::Console;
use trackdupe::scanner::{Walker, WalkerConfig};
use trackdupe::store::DecisionLedger;

/// A music library and a separate state directory for the stores.
pub struct Library {
    pub dir: TempDir,
    pub state: TempDir,
}

impl Library {
    pub fn new() -> Self {
        yansi::disable();
        Self {
            dir: TempDir::new().unwrap(),
            state: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn paths(&self) -> StorePaths {
        StorePaths {
            ledger: self.state.path().join("ledger.json"),
            preferences: self.state.path().join("preferences.json"),
        }
    }

    pub fn app(&self) -> App {
        self.app_with(Config::default())
    }

    pub fn app_with(&self, config: Config) -> App {
        App::new(config, self.paths(), self.root())
    }

    /// Walk, normalize and pair the library with default settings.
    pub fn candidates(&self, ledger: &DecisionLedger) -> Vec<PairCandidate> {
        let (files, _) = Walker::new(self.root(), WalkerConfig::default())
            .collect_files()
            .unwrap();
        let names = Normalizer::default().normalize_all(&files);
        CandidateFinder::new(FinderConfig::default())
            .find(&files, &names, ledger)
            .0
    }
}

pub fn console(input: &str) -> Console<&[u8], Vec<u8>> {
    Console::new(input.as_bytes(), Vec::new())
}

pub fn output(console: Console<&[u8], Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}
