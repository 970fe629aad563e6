use std::fs;

use trackdupe::actions::delete::{permanent_delete, DeleteMode, FileRemover, SystemRemover};
use trackdupe::actions::prune::{find_empty_dirs, remove_dirs};

use super::common::Library;

#[test]
fn test_both_folders_flagged_after_delete() {
    let lib = Library::new();
    let track = lib.add("A/song.mp3", b"x");
    fs::create_dir_all(lib.root().join("B")).unwrap();

    assert_eq!(find_empty_dirs(lib.root()).unwrap(), vec![lib.root().join("B")]);

    permanent_delete(&track).unwrap();
    assert_eq!(
        find_empty_dirs(lib.root()).unwrap(),
        vec![lib.root().join("A"), lib.root().join("B")]
    );
}

#[test]
fn test_album_chain_removed_in_one_pass() {
    let lib = Library::new();
    let track = lib.add("Artist/Album/CD1/01 - Song.flac", b"x");
    lib.add("Other/Album/01 - Song.flac", b"x");

    SystemRemover::new(DeleteMode::Permanent)
        .remove(&track)
        .unwrap();

    let flagged = find_empty_dirs(lib.root()).unwrap();
    assert_eq!(flagged.len(), 3);
    let report = remove_dirs(&flagged);
    assert!(report.all_succeeded());

    assert!(!lib.root().join("Artist").exists());
    assert!(lib.root().join("Other/Album/01 - Song.flac").exists());
    assert!(find_empty_dirs(lib.root()).unwrap().is_empty());
}

#[test]
fn test_cover_only_folder_is_kept() {
    let lib = Library::new();
    lib.add("Artist/Album/cover.jpg", b"x");

    assert!(find_empty_dirs(lib.root()).unwrap().is_empty());
}
