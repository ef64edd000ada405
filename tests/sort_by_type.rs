//! Sorting files into extension directories.

use assert_fs::prelude::*;
use std::fs;

use file_organizer::report::{MemoryReporter, MessageLevel};
use file_organizer::{OrganizerError, SilentReporter, SortOptions, sort_by_type};

#[test]
fn files_land_in_lowercase_extension_dirs() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    td.child("B.TXT").write_str("b").unwrap();
    td.child("pic.jpg").write_str("p").unwrap();

    let s = sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 3);
    assert_eq!(s.dirs_created, 2);
    assert!(td.child("txt/a.txt").path().is_file());
    assert!(td.child("txt/B.TXT").path().is_file());
    assert!(td.child("jpg/pic.jpg").path().is_file());
}

#[test]
fn second_run_moves_nothing() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    td.child("b.md").write_str("b").unwrap();

    sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    let reporter = MemoryReporter::new();
    let again = sort_by_type(td.path(), &SortOptions::default(), &reporter).unwrap();
    assert_eq!(again.files_moved, 0);
    assert_eq!(again.dirs_created, 0);
    assert!(
        reporter
            .texts(MessageLevel::Info)
            .iter()
            .any(|t| t.contains("Nothing to sort"))
    );
}

#[test]
fn existing_name_in_target_gets_numeric_suffix() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("txt/report.txt").write_str("old").unwrap();
    td.child("report.txt").write_str("new").unwrap();

    let s = sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 1);
    assert_eq!(s.dirs_created, 0);
    assert_eq!(fs::read_to_string(td.child("txt/report.txt").path()).unwrap(), "old");
    assert_eq!(fs::read_to_string(td.child("txt/report_1.txt").path()).unwrap(), "new");
}

#[test]
fn extensionless_files_use_their_own_name() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("Makefile").write_str("all:").unwrap();
    td.child("README").write_str("read me").unwrap();

    let s = sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 2);
    assert_eq!(s.dirs_created, 2);
    assert_eq!(fs::read_to_string(td.child("Makefile/Makefile").path()).unwrap(), "all:");
    assert_eq!(fs::read_to_string(td.child("README/README").path()).unwrap(), "read me");
}

#[test]
fn extensionless_file_named_like_an_extension_is_claimed_first() {
    let td = assert_fs::TempDir::new().unwrap();
    // "a.txt" sorts before "txt" by name, but needs the directory "txt" that file occupies.
    td.child("a.txt").write_str("a").unwrap();
    td.child("txt").write_str("plain").unwrap();

    let s = sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 2, "warnings: {:?}", s.warnings);
    assert!(td.child("txt").path().is_dir());
    assert_eq!(fs::read_to_string(td.child("txt/txt").path()).unwrap(), "plain");
    assert_eq!(fs::read_to_string(td.child("txt/a.txt").path()).unwrap(), "a");
}

#[test]
fn hidden_files_and_subdirectories_stay() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child(".env").write_str("secret").unwrap();
    td.child("docs/guide.md").write_str("g").unwrap();

    let s = sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.files_moved, 0);
    assert!(td.child(".env").path().is_file());
    assert!(td.child("docs/guide.md").path().is_file());
}

#[test]
fn dry_run_plans_without_touching_disk() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("a").unwrap();
    td.child("b.txt").write_str("b").unwrap();

    let reporter = MemoryReporter::new();
    let s = sort_by_type(td.path(), &SortOptions { dry_run: true }, &reporter).unwrap();
    assert_eq!(s.planned, 2);
    assert_eq!(s.files_moved, 0);
    assert_eq!(s.dirs_created, 1);
    assert!(!td.child("txt").path().exists());
    assert!(td.child("a.txt").path().is_file());
    assert!(
        reporter
            .texts(MessageLevel::Info)
            .iter()
            .any(|t| t.starts_with("Would move"))
    );
}

#[test]
fn missing_directory_is_an_error_result() {
    let td = assert_fs::TempDir::new().unwrap();
    let reporter = MemoryReporter::new();
    let err = sort_by_type(&td.path().join("absent"), &SortOptions::default(), &reporter).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OrganizerError>(),
        Some(OrganizerError::NotFound(_))
    ));
    assert_eq!(reporter.texts(MessageLevel::Error).len(), 1);
}

#[test]
fn hello_world_scenario_after_dedupe() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a.txt").write_str("hello").unwrap();
    td.child("c.txt").write_str("world").unwrap();

    let s = sort_by_type(td.path(), &SortOptions::default(), &SilentReporter).unwrap();
    assert_eq!(s.dirs_created, 1);
    assert!(td.child("txt/c.txt").path().is_file());
}
