//! Sorting files into date directories.

use assert_fs::prelude::*;
use chrono::{DateTime, Local};
use filetime::{FileTime, set_file_mtime};
use std::time::{Duration, SystemTime};

use file_organizer::{OrganizerError, SilentReporter, SortOptions, sort_by_date};

const T1: i64 = 1_700_000_000; // Nov 2023
const T2: i64 = 1_600_000_000; // Sep 2020

fn expected(secs: i64, fmt: &str) -> String {
    let t: DateTime<Local> = (SystemTime::UNIX_EPOCH + Duration::from_secs(secs as u64)).into();
    t.format(fmt).to_string()
}

#[test]
fn year_month_buckets() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("new.txt").write_str("n").unwrap();
    td.child("old.txt").write_str("o").unwrap();
    set_file_mtime(td.child("new.txt").path(), FileTime::from_unix_time(T1, 0)).unwrap();
    set_file_mtime(td.child("old.txt").path(), FileTime::from_unix_time(T2, 0)).unwrap();

    let s = sort_by_date(td.path(), "%Y-%m", &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 2);
    assert_eq!(s.dirs_created, 2);
    assert!(td.path().join(expected(T1, "%Y-%m")).join("new.txt").is_file());
    assert!(td.path().join(expected(T2, "%Y-%m")).join("old.txt").is_file());
}

#[test]
fn nested_format_creates_intermediate_dirs() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("photo.jpg").write_str("p").unwrap();
    set_file_mtime(td.child("photo.jpg").path(), FileTime::from_unix_time(T1, 0)).unwrap();

    let s = sort_by_date(td.path(), "%Y/%m/%d", &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 1);
    let key = expected(T1, "%Y/%m/%d");
    let dest = key.split('/').fold(td.path().to_path_buf(), |p, c| p.join(c));
    assert!(dest.join("photo.jpg").is_file());
}

#[test]
fn moved_files_keep_their_mtime() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.log").write_str("x").unwrap();
    set_file_mtime(td.child("a.log").path(), FileTime::from_unix_time(T2, 0)).unwrap();

    sort_by_date(td.path(), "%Y", &SortOptions::default(), &SilentReporter).unwrap();
    let moved = td.path().join(expected(T2, "%Y")).join("a.log");
    let meta = std::fs::metadata(moved).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), T2);
}

#[test]
fn invalid_format_is_rejected_before_any_move() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    let err = sort_by_date(td.path(), "%Y-%", &SortOptions::default(), &SilentReporter).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OrganizerError>(),
        Some(OrganizerError::InvalidDateFormat(_))
    ));
    assert!(td.child("a.txt").path().is_file());
}

#[test]
fn escaping_format_skips_files_with_warning() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    let s = sort_by_date(td.path(), "../%Y", &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 0);
    assert_eq!(s.warnings.len(), 1);
    assert!(td.child("a.txt").path().is_file());
}

#[test]
fn empty_directory_is_nothing_to_sort() {
    let td = assert_fs::TempDir::new().unwrap();
    let s = sort_by_date(td.path(), "%Y-%m", &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s, Default::default());
}

#[cfg(unix)]
#[test]
fn trailing_dot_survives_the_move() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("draft.").write_str("d").unwrap();
    set_file_mtime(td.child("draft.").path(), FileTime::from_unix_time(T1, 0)).unwrap();

    sort_by_date(td.path(), "%Y", &SortOptions::default(), &SilentReporter).unwrap();
    assert!(td.path().join(expected(T1, "%Y")).join("draft.").is_file());
}
