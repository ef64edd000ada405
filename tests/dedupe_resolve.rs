//! Applying delete / move-to / report to duplicate groups.

use assert_fs::prelude::*;
use std::fs;

use file_organizer::dedupe::FileOutcome;
use file_organizer::{
    DuplicateAction, OrganizerError, ScanOptions, SilentReporter, find_duplicates,
    resolve_duplicates,
};

#[test]
fn delete_keeps_exactly_the_first() {
    let td = assert_fs::TempDir::new().unwrap();
    for name in ["k1", "k2", "k3", "k4"] {
        td.child(name).write_str("duplicate content").unwrap();
    }
    let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let keeper = report.groups[0].keeper().path.clone();

    let summary = resolve_duplicates(&report, &DuplicateAction::Delete, true, &SilentReporter).unwrap();
    assert_eq!(summary.deleted, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.bytes_reclaimed, 3 * "duplicate content".len() as u64);

    let left: Vec<_> = fs::read_dir(td.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(left, vec![keeper.clone()]);
    assert_eq!(keeper, td.child("k1").path());
}

#[test]
fn move_to_collects_duplicates_without_overwriting() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("src/a/photo.jpg").write_str("img").unwrap();
    td.child("src/b/photo.jpg").write_str("img").unwrap();
    td.child("src/c/photo.jpg").write_str("img").unwrap();
    // Something unrelated already sits at the plain name in the destination.
    td.child("dupes/photo.jpg").write_str("other").unwrap();

    let report =
        find_duplicates(td.child("src").path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let dest = td.child("dupes").path().to_path_buf();
    let summary =
        resolve_duplicates(&report, &DuplicateAction::MoveTo(dest.clone()), false, &SilentReporter)
            .unwrap();

    assert_eq!(summary.moved, 2);
    assert_eq!(fs::read_to_string(dest.join("photo.jpg")).unwrap(), "other");
    assert_eq!(fs::read_to_string(dest.join("photo_1.jpg")).unwrap(), "img");
    assert_eq!(fs::read_to_string(dest.join("photo_2.jpg")).unwrap(), "img");
    assert!(td.child("src/a/photo.jpg").path().exists());
    assert!(!td.child("src/b/photo.jpg").path().exists());

    let moved_to: Vec<_> = summary.groups[0]
        .files
        .iter()
        .filter_map(|f| match &f.outcome {
            FileOutcome::Moved { to } => Some(to.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(moved_to, vec![dest.join("photo_1.jpg"), dest.join("photo_2.jpg")]);
}

#[test]
fn move_to_creates_missing_destination_with_parents() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("x").unwrap();
    td.child("b.txt").write_str("x").unwrap();
    let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();

    let dest = td.path().join("out").join("deep");
    let summary =
        resolve_duplicates(&report, &DuplicateAction::MoveTo(dest.clone()), false, &SilentReporter)
            .unwrap();
    assert_eq!(summary.moved, 1);
    assert!(dest.join("b.txt").exists());
}

#[test]
fn delete_and_move_together_is_rejected_up_front() {
    let err = DuplicateAction::from_flags(true, Some("elsewhere".into())).unwrap_err();
    assert!(matches!(err, OrganizerError::Usage(_)));
}

#[test]
fn unconfirmed_delete_changes_nothing() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a").write_str("x").unwrap();
    td.child("b").write_str("x").unwrap();
    let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    let err = resolve_duplicates(&report, &DuplicateAction::Delete, false, &SilentReporter).unwrap_err();
    assert_eq!(err.downcast_ref::<OrganizerError>().map(|e| e.code()), Some(4));
    assert!(td.child("a").path().exists());
    assert!(td.child("b").path().exists());
}

#[test]
fn vanished_duplicate_is_a_failure_not_an_abort() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("g1a").write_str("one").unwrap();
    td.child("g1b").write_str("one").unwrap();
    td.child("g2a").write_str("twotwo").unwrap();
    td.child("g2b").write_str("twotwo").unwrap();
    let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();
    fs::remove_file(td.child("g1b").path()).unwrap();

    let summary = resolve_duplicates(&report, &DuplicateAction::Delete, true, &SilentReporter).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.deleted, 1);
    assert!(!td.child("g2b").path().exists());
    assert!(td.child("g2a").path().exists());
}
