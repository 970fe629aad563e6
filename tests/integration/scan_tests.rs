use std::path::PathBuf;

use trackdupe::matching::{
    ArtistSource, CandidateFinder, FinderConfig, Normalizer, PairId,
};
use trackdupe::scanner::{Walker, WalkerConfig};
use trackdupe::store::DecisionLedger;

use super::common::Library;

#[test]
fn test_empty_library_has_no_candidates() {
    let lib = Library::new();
    assert!(lib.candidates(&DecisionLedger::new()).is_empty());
}

#[test]
fn test_same_track_in_two_albums() {
    let lib = Library::new();
    let a = lib.add("Muse/Absolution/03 - Hysteria.mp3", b"a");
    let b = lib.add("Muse/Absolution (Remaster)/3.Hysteria.flac", b"bb");
    lib.add("Muse/Absolution/04 - Blackout.mp3", b"c");

    let candidates = lib.candidates(&DecisionLedger::new());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].first.path, a);
    assert_eq!(candidates[0].second.path, b);
    assert_eq!(candidates[0].second.size, 2);
    assert_eq!(candidates[0].score, 100);
    assert_eq!(candidates[0].pair_id, PairId::from_paths(&a, &b));
}

#[test]
fn test_formats_in_one_folder_are_not_paired() {
    let lib = Library::new();
    lib.add("Air/Moon Safari/01 - La femme d'argent.flac", b"");
    lib.add("Air/Moon Safari/01 - La femme d'argent.mp3", b"");

    assert!(lib.candidates(&DecisionLedger::new()).is_empty());
}

#[test]
fn test_cover_images_never_listed() {
    let lib = Library::new();
    lib.add("X/A/cover.jpg", b"");
    lib.add("X/B/cover.JPG", b"");
    lib.add("X/C/Cover.Jpg", b"");
    lib.add("X/D/.jpg", b"");
    lib.add("X/E/.JPG", b"");

    let (files, _) = Walker::new(lib.root(), WalkerConfig::default())
        .collect_files()
        .unwrap();
    assert!(files.is_empty());
    assert!(lib.candidates(&DecisionLedger::new()).is_empty());
}

#[test]
fn test_artist_name_removed_from_titles() {
    let lib = Library::new();
    lib.add("Daft Punk/Discovery/Daft Punk - One More Time.mp3", b"");
    lib.add("Daft Punk/Singles/One More Time.mp3", b"");

    let candidates = lib.candidates(&DecisionLedger::new());
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].score >= 90);
}

#[test]
fn test_repeated_scans_are_identical() {
    let lib = Library::new();
    for album in ["A", "B", "C", "D"] {
        lib.add(&format!("Band/{}/01 - Intro.mp3", album), b"");
        lib.add(&format!("Band/{}/02 - Outro.mp3", album), b"");
    }

    let ledger = DecisionLedger::new();
    let first = lib.candidates(&ledger);
    let second = lib.candidates(&ledger);
    assert_eq!(first, second);
    assert_eq!(first.len(), 12);
}

#[test]
fn test_parent_artist_source() {
    let lib = Library::new();
    lib.add("Various/Moby/Moby - Porcelain.mp3", b"");
    lib.add("Various/Singles/Porcelain.mp3", b"");

    let (files, _) = Walker::new(lib.root(), WalkerConfig::default())
        .collect_files()
        .unwrap();
    let names = Normalizer::new(ArtistSource::Parent.strategy()).normalize_all(&files);
    assert_eq!(names, vec!["- Porcelain".to_string(), "Porcelain".to_string()]);

    let (candidates, _) = CandidateFinder::new(FinderConfig::default()).find(
        &files,
        &names,
        &DecisionLedger::new(),
    );
    assert_eq!(candidates.len(), 1);
}

#[test]
fn test_custom_exclusions() {
    let lib = Library::new();
    lib.add("A/x/Song.mp3", b"");
    lib.add("A/y/Song.log", b"");

    let config = WalkerConfig::new(false, vec!["log".to_string()]);
    let (files, _) = Walker::new(lib.root(), config).collect_files().unwrap();
    let paths: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();
    assert_eq!(paths, vec![lib.root().join("A/x/Song.mp3")]);
}
