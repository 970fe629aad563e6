use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use trackdupe::actions::delete::DeleteMode;
use trackdupe::config::{Config, ConfigError};
use trackdupe::matching::{Algorithm, ArtistSource};
use trackdupe::resolve::LedgerFlush;

#[test]
fn test_config_load_defaults() {
    // Figment directly, without Env, so other tests cannot interfere
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config = Config::from_figment(figment).unwrap();
    assert_eq!(config, Config::default());
    assert!(config.prune);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
ledger_path = "/var/lib/trackdupe/ledger.json"
exclude_extensions = ["jpg", "png", "cue"]
artist_source = "parent"
algorithm = "jaro-winkler"
delete_mode = "trash"
ledger_flush = "each"
follow_symlinks = true
prune = false
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config = Config::from_figment(figment).unwrap();

    assert_eq!(
        config.ledger_path,
        Some(PathBuf::from("/var/lib/trackdupe/ledger.json"))
    );
    assert_eq!(config.preferences_path, None);
    assert_eq!(config.exclude_extensions, vec!["jpg", "png", "cue"]);
    assert_eq!(config.artist_source, ArtistSource::Parent);
    assert_eq!(config.algorithm, Algorithm::JaroWinkler);
    assert_eq!(config.delete_mode, DeleteMode::Trash);
    assert_eq!(config.ledger_flush, LedgerFlush::Each);
    assert!(config.follow_symlinks);
    assert!(!config.prune);

    let walker = config.walker_config();
    assert!(walker.follow_symlinks);
    assert!(walker.is_excluded(Path::new("/m/a/folder.PNG")));
}

#[test]
fn test_config_env_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "algorithm = \"levenshtein\"\nprune = true\n")?;
        jail.set_env("TRACKDUPE_PRUNE", "false");

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("TRACKDUPE_"));
        let config = Config::from_figment(figment).unwrap();

        assert_eq!(config.algorithm, Algorithm::Levenshtein);
        assert!(!config.prune);
        Ok(())
    });
}

#[test]
fn test_config_invalid_value() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"soundex\"\n").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    assert!(matches!(
        Config::from_figment(figment),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_explicit_config_must_exist() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    assert!(matches!(
        Config::load(Some(&missing)),
        Err(ConfigError::NotFound(path)) if path == missing
    ));
}

#[test]
fn test_store_paths_precedence() {
    let config = Config {
        ledger_path: Some(PathBuf::from("/cfg/ledger.json")),
        preferences_path: Some(PathBuf::from("/cfg/prefs.json")),
        ..Config::default()
    };

    let paths = config
        .store_paths(Some(Path::new("/cli/ledger.json")), None)
        .unwrap();
    assert_eq!(paths.ledger, PathBuf::from("/cli/ledger.json"));
    assert_eq!(paths.preferences, PathBuf::from("/cfg/prefs.json"));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = Config {
        delete_mode: DeleteMode::Trash,
        ..Config::default()
    };
    let rendered = config.to_toml().unwrap();
    assert!(rendered.contains("delete_mode = \"trash\""));

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::string(&rendered));
    assert_eq!(Config::from_figment(figment).unwrap(), config);
}
