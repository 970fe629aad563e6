use std::fs;
use std::path::Path;

use serde_json::Value;
use sha2::{Digest, Sha256};
use trackdupe::matching::PairId;
use trackdupe::store::{DecisionLedger, Preferences, StoreError};

use super::common::Library;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn saved_ledger(lib: &Library) -> std::path::PathBuf {
    let path = lib.paths().ledger;
    let mut ledger = DecisionLedger::new();
    ledger.mark_handled(PairId::from_paths(Path::new("/m/a/x.mp3"), Path::new("/m/b/x.mp3")));
    ledger.save(&path).unwrap();
    path
}

fn assert_corrupt(result: Result<DecisionLedger, StoreError>, needle: &str) {
    match result {
        Err(e @ StoreError::Corrupt { .. }) => {
            assert!(e.to_string().contains(needle), "unexpected message: {}", e);
        }
        other => panic!("expected a corrupt store, got {:?}", other),
    }
}

#[test]
fn test_edited_payload_fails_checksum() {
    let lib = Library::new();
    let path = saved_ledger(&lib);

    let mut doc = read_json(&path);
    doc["payload"]["handled"]
        .as_array_mut()
        .unwrap()
        .push(Value::String("forged".to_string()));
    write_json(&path, &doc);

    assert_corrupt(DecisionLedger::load(&path), "checksum mismatch");
}

#[test]
fn test_future_version_rejected() {
    let lib = Library::new();
    let path = saved_ledger(&lib);

    let mut doc = read_json(&path);
    doc["version"] = Value::from(99);
    write_json(&path, &doc);

    assert_corrupt(DecisionLedger::load(&path), "unsupported version 99");
}

#[test]
fn test_swapped_store_files_rejected() {
    let lib = Library::new();
    let paths = lib.paths();
    Preferences::defaults(lib.root())
        .save(&paths.preferences)
        .unwrap();
    fs::copy(&paths.preferences, &paths.ledger).unwrap();

    assert_corrupt(DecisionLedger::load(&paths.ledger), "expected a 'ledger' store");
}

#[test]
fn test_truncated_store_rejected() {
    let lib = Library::new();
    let path = saved_ledger(&lib);
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, &content[..content.len() / 2]).unwrap();

    assert_corrupt(DecisionLedger::load(&path), "failed to parse");
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let lib = Library::new();
    let path = lib.paths().preferences;
    Preferences::defaults(lib.root()).save(&path).unwrap();

    let payload = format!(
        r#"{{"similarity_threshold":150,"music_folder":{}}}"#,
        serde_json::to_string(lib.root()).unwrap()
    );
    let mut doc = read_json(&path);
    doc["payload"]["similarity_threshold"] = Value::from(150);
    doc["checksum"] = Value::String(format!("{:x}", Sha256::digest(payload.as_bytes())));
    write_json(&path, &doc);

    let err = Preferences::load(&path).unwrap_err();
    assert!(err.is_corrupt());
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_corrupt_store_not_overwritten_by_init() {
    let lib = Library::new();
    let path = lib.paths().preferences;
    fs::write(&path, "garbage").unwrap();

    assert!(Preferences::load_or_init(&path, lib.root())
        .unwrap_err()
        .is_corrupt());
    assert_eq!(fs::read_to_string(&path).unwrap(), "garbage");
}

#[test]
fn test_no_temp_file_left_after_save() {
    let lib = Library::new();
    saved_ledger(&lib);

    let names: Vec<String> = fs::read_dir(lib.state.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ledger.json".to_string()]);
}
