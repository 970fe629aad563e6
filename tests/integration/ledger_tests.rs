use trackdupe::matching::PairId;
use trackdupe::store::DecisionLedger;

use super::common::Library;

#[test]
fn test_kept_pair_never_reappears() {
    let lib = Library::new();
    lib.add("Band/A/01 - Song.mp3", b"");
    lib.add("Band/B/01 - Song.flac", b"");
    let path = lib.paths().ledger;

    let mut ledger = DecisionLedger::load(&path).unwrap();
    let candidates = lib.candidates(&ledger);
    assert_eq!(candidates.len(), 1);

    ledger.mark_handled(candidates[0].pair_id.clone());
    ledger.save(&path).unwrap();

    let reloaded = DecisionLedger::load(&path).unwrap();
    assert!(lib.candidates(&reloaded).is_empty());
}

#[test]
fn test_unrelated_pairs_still_offered() {
    let lib = Library::new();
    lib.add("Band/A/01 - Song.mp3", b"");
    lib.add("Band/B/01 - Song.mp3", b"");
    lib.add("Band/C/01 - Song.mp3", b"");

    let mut ledger = DecisionLedger::new();
    let all = lib.candidates(&ledger);
    assert_eq!(all.len(), 3);

    ledger.mark_handled(all[1].pair_id.clone());
    let remaining = lib.candidates(&ledger);
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0], all[0]);
    assert_eq!(remaining[1], all[2]);
}

#[test]
fn test_ledger_reload_in_fresh_store() {
    let lib = Library::new();
    let path = lib.state.path().join("nested/ledger.json");
    let id = PairId::from_paths(
        &lib.root().join("a/x.mp3"),
        &lib.root().join("b/x.mp3"),
    );

    let mut ledger = DecisionLedger::new();
    assert!(ledger.mark_handled(id.clone()));
    ledger.save(&path).unwrap();
    drop(ledger);

    let fresh = DecisionLedger::load(&path).unwrap();
    assert!(fresh.contains(&id));
    assert_eq!(fresh.iter().count(), 1);
}
