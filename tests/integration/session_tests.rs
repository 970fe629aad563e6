use std::fs;

use trackdupe::app::ScanOptions;
use trackdupe::cli::{OutputFormat, RunOverrides};
use trackdupe::config::Config;
use trackdupe::error::ExitCode;
use trackdupe::resolve::Console;
use trackdupe::store::{DecisionLedger, Preferences};

use super::common::{console, output, Library};

fn muse_library() -> Library {
    let lib = Library::new();
    lib.add("Muse/Absolution/03 - Hysteria.mp3", b"mp3 data");
    lib.add("Muse/Absolution (Remaster)/03 - Hysteria.flac", b"flac data");
    lib.add("Muse/Absolution/cover.jpg", b"jpeg");
    lib.add("Other/Album/01 - Something Else.mp3", b"other");
    lib
}

#[test]
fn test_delete_then_prune_then_nothing_left() {
    let lib = muse_library();
    let app = lib.app();

    let mut c = console("\n2\ny\n");
    let code = app.run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);

    let text = output(c);
    assert!(text.contains("Found 1 potential duplicate track pair(s)"));
    assert!(text.contains("Pair 1 of 1"));
    assert!(text.contains("Deleted:"));
    assert!(text.contains("Absolution (Remaster)"));
    assert!(text.contains("Removed 1 of 1 empty folder(s)."));

    assert!(lib.root().join("Muse/Absolution/03 - Hysteria.mp3").exists());
    assert!(!lib.root().join("Muse/Absolution (Remaster)").exists());

    let ledger = DecisionLedger::load(&lib.paths().ledger).unwrap();
    assert_eq!(ledger.len(), 1);

    let mut again = console("\n");
    let code = app.run_scan(&ScanOptions::default(), &mut again).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(output(again).contains("No new similar track names found (excluding .jpg files)."));
}

#[test]
fn test_prune_disabled_in_config() {
    let lib = muse_library();
    let app = lib.app_with(Config {
        prune: false,
        ..Config::default()
    });

    let mut c = console("\n2\n");
    let code = app.run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);

    assert!(!output(c).contains("empty folders"));
    assert!(lib.root().join("Muse/Absolution (Remaster)").is_dir());
}

#[test]
fn test_first_run_creates_preferences() {
    let lib = Library::new();
    let app = lib.app();

    let mut c = console("\n");
    app.run_scan(&ScanOptions::default(), &mut c).unwrap();

    let prefs = Preferences::load(&lib.paths().preferences).unwrap().unwrap();
    assert_eq!(prefs, Preferences::defaults(lib.root()));
    assert!(output(c).contains("Current similarity threshold: 80%"));
}

#[test]
fn test_threshold_change_is_saved() {
    let lib = Library::new();
    let app = lib.app();

    let mut c = console("st\nabc\n95\n");
    let code = app.run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);

    let text = output(c);
    assert!(text.contains("invalid threshold 'abc'"));
    assert!(text.contains("Similarity threshold updated to 95%."));

    let prefs = Preferences::load(&lib.paths().preferences).unwrap().unwrap();
    assert_eq!(prefs.similarity_threshold, 95);
}

#[test]
fn test_folder_change_is_saved() {
    let lib = Library::new();
    let other = tempfile::TempDir::new().unwrap();
    let app = lib.app();

    let input = format!("mf\n{}\n", other.path().display());
    let mut c = console(&input);
    app.run_scan(&ScanOptions::default(), &mut c).unwrap();

    let prefs = Preferences::load(&lib.paths().preferences).unwrap().unwrap();
    assert_eq!(prefs.music_folder, other.path());
}

#[test]
fn test_missing_folder_keeps_previous() {
    let lib = Library::new();
    let app = lib.app();

    let mut c = console("mf\n/definitely/missing/music\n");
    let code = app.run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);

    let text = output(c);
    assert!(text.contains("folder does not exist: /definitely/missing/music"));
    let prefs = Preferences::load(&lib.paths().preferences).unwrap().unwrap();
    assert_eq!(prefs.music_folder, lib.root());
}

#[test]
fn test_overrides_are_not_saved() {
    let lib = muse_library();
    let app = lib.app();
    let options = ScanOptions {
        overrides: RunOverrides {
            folder: None,
            threshold: Some(100),
        },
        ..ScanOptions::default()
    };

    let mut c = console("\ns\n");
    app.run_scan(&options, &mut c).unwrap();
    assert!(output(c).contains("Current similarity threshold: 100%"));

    let prefs = Preferences::load(&lib.paths().preferences).unwrap().unwrap();
    assert_eq!(prefs.similarity_threshold, 80);
}

#[test]
fn test_stop_leaves_everything_in_place() {
    let lib = muse_library();
    let app = lib.app();

    let mut c = console("\ns\n");
    let code = app.run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);

    assert!(DecisionLedger::load(&lib.paths().ledger).unwrap().is_empty());
    assert!(lib
        .root()
        .join("Muse/Absolution (Remaster)/03 - Hysteria.flac")
        .exists());
}

#[test]
fn test_end_of_input_at_menu() {
    let lib = muse_library();
    let mut c = console("");
    let code = lib.app().run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(!lib.paths().ledger.exists());
}

#[test]
fn test_failed_delete_is_partial_success() {
    let lib = Library::new();
    lib.add("Band/A/01 - Song.mp3", b"a");
    lib.add("Band/B/01 - Song.mp3", b"b");
    lib.add("Band/C/01 - Song.mp3", b"c");

    // Pairs come as (A,B), (A,C), (B,C); the second delete targets a file
    // that is already gone.
    let mut c = console("\n1\n1\nn\nn\n");
    let code = lib.app().run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::PartialSuccess);

    let text = output(c);
    assert!(text.contains("Could not delete:"));
    assert!(text.contains("1 deletion(s) failed"));

    let ledger = DecisionLedger::load(&lib.paths().ledger).unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(lib.root().join("Band/A").exists());
}

#[test]
fn test_unreadable_answer_is_rejected_and_decisions_kept() {
    let lib = Library::new();
    lib.add("Band/A/01 - Song.mp3", b"a");
    lib.add("Band/B/01 - Song.mp3", b"b");
    lib.add("Band/C/01 - Song.mp3", b"c");

    let mut c = Console::new(&b"\nn\n\xff\xfe\ns\n"[..], Vec::new());
    let code = lib.app().run_scan(&ScanOptions::default(), &mut c).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(output(c).contains("Invalid input:"));

    let ledger = DecisionLedger::load(&lib.paths().ledger).unwrap();
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_corrupt_ledger_stops_the_run() {
    let lib = muse_library();
    let ledger_path = lib.paths().ledger;
    fs::write(&ledger_path, b"\x80\x04\x95not json").unwrap();

    let mut c = console("\n1\n");
    let err = lib
        .app()
        .run_scan(&ScanOptions::default(), &mut c)
        .unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::CorruptState);

    assert_eq!(fs::read(&ledger_path).unwrap(), b"\x80\x04\x95not json");
    assert!(lib.root().join("Muse/Absolution/03 - Hysteria.mp3").exists());
}

#[test]
fn test_list_json() {
    let lib = muse_library();
    let mut out = Vec::new();
    let code = lib
        .app()
        .run_list(&RunOverrides::default(), OutputFormat::Json, &mut out)
        .unwrap();
    assert_eq!(code, ExitCode::Success);

    let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(doc["summary"]["candidates"], 1);
    assert_eq!(doc["summary"]["threshold"], 80);
    assert_eq!(doc["candidates"][0]["score"], 100);
    assert!(!lib.paths().ledger.exists());
    assert!(!lib.paths().preferences.exists());
}

#[test]
fn test_list_empty_library() {
    let lib = Library::new();
    let mut out = Vec::new();
    let code = lib
        .app()
        .run_list(&RunOverrides::default(), OutputFormat::Text, &mut out)
        .unwrap();
    assert_eq!(code, ExitCode::NoCandidates);
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("No new similar track names found"));
}
