//! Applying an action to duplicate groups.
//!
//! The keeper (index 0 of each group) is never touched. Before a duplicate is removed
//! the keeper is checked to still exist and the duplicate to still have the scanned
//! size, so a run can never take away the last copy of some content.
//! Per-file failures are recorded and the run continues.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::OrganizerError;
use crate::fs_ops::{FileRecord, Placement, format_bytes, io_error_with_help, place_file};
use crate::report::{Phase, Reporter};
use crate::shutdown;

use super::finder::DuplicateReport;

/// What to do with every non-kept member of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateAction {
    /// List only; nothing changes on disk.
    Report,
    Delete,
    /// Move into this directory (created if missing).
    MoveTo(PathBuf),
}

impl DuplicateAction {
    /// Build the action from the two mutually exclusive CLI choices.
    pub fn from_flags(delete: bool, move_to: Option<PathBuf>) -> Result<Self, OrganizerError> {
        match (delete, move_to) {
            (true, Some(_)) => Err(OrganizerError::Usage(
                "--delete and --move-to cannot be used together".into(),
            )),
            (true, None) => Ok(DuplicateAction::Delete),
            (false, Some(dir)) => Ok(DuplicateAction::MoveTo(dir)),
            (false, None) => Ok(DuplicateAction::Report),
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, DuplicateAction::Delete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Kept,
    Reported,
    Deleted,
    Moved { to: PathBuf },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResolution {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResolution {
    pub hash: String,
    pub size: u64,
    /// Keeper first, then one entry per duplicate.
    pub files: Vec<FileResolution>,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveSummary {
    pub groups: Vec<GroupResolution>,
    pub deleted: usize,
    pub moved: usize,
    pub reported: usize,
    pub failed: usize,
    /// Bytes freed by deletions.
    pub bytes_reclaimed: u64,
}

impl ResolveSummary {
    fn record(&mut self, outcome: &FileOutcome, size: u64) {
        match outcome {
            FileOutcome::Kept => {}
            FileOutcome::Reported => self.reported += 1,
            FileOutcome::Deleted => {
                self.deleted += 1;
                self.bytes_reclaimed += size;
            }
            FileOutcome::Moved { .. } => self.moved += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Every per-file failure, as (path, reason).
    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.groups
            .iter()
            .flat_map(|g| g.files.iter())
            .filter_map(|f| match &f.outcome {
                FileOutcome::Failed { reason } => Some((f.path.as_path(), reason.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Apply `action` to every duplicate in `report`.
///
/// `Delete` requires `confirmed`; without it nothing is touched and
/// [`OrganizerError::ConfirmationRequired`] is returned.
pub fn resolve_duplicates(
    report: &DuplicateReport,
    action: &DuplicateAction,
    confirmed: bool,
    reporter: &dyn Reporter,
) -> Result<ResolveSummary> {
    if action.is_destructive() && !confirmed {
        return Err(OrganizerError::ConfirmationRequired.into());
    }

    let total = report.total_duplicates();
    let mut done = 0usize;
    let mut summary = ResolveSummary::default();

    for group in &report.groups {
        let keeper = group.keeper();
        let mut files = vec![FileResolution {
            path: keeper.path.clone(),
            outcome: FileOutcome::Kept,
        }];

        let keeper_present = *action == DuplicateAction::Report || keeper.path.is_file();
        if !keeper_present {
            warn!(keeper = %keeper.path.display(), "kept file is gone; leaving its duplicates untouched");
            reporter.warn(&format!(
                "Skipping group {}: kept file {} no longer exists",
                short_hash(&group.hash),
                keeper.path.display()
            ));
        }

        for dup in group.duplicates() {
            done += 1;
            reporter.progress(Phase::Resolve, done, total);

            let outcome = if keeper_present {
                apply(dup, action, reporter)?
            } else {
                FileOutcome::Failed {
                    reason: format!("kept copy {} is missing", keeper.path.display()),
                }
            };
            summary.record(&outcome, group.size);
            files.push(FileResolution {
                path: dup.path.clone(),
                outcome,
            });
        }

        summary.groups.push(GroupResolution {
            hash: group.hash.clone(),
            size: group.size,
            files,
        });
    }

    info!(
        deleted = summary.deleted,
        moved = summary.moved,
        reported = summary.reported,
        failed = summary.failed,
        reclaimed = summary.bytes_reclaimed,
        "duplicates resolved"
    );
    if summary.bytes_reclaimed > 0 {
        reporter.success(&format!(
            "Reclaimed {} by deleting {} file(s)",
            format_bytes(summary.bytes_reclaimed),
            summary.deleted
        ));
    }
    Ok(summary)
}

/// Handle one duplicate. Only an interruption is returned as an error.
fn apply(dup: &FileRecord, action: &DuplicateAction, reporter: &dyn Reporter) -> Result<FileOutcome> {
    if *action == DuplicateAction::Report {
        return Ok(FileOutcome::Reported);
    }
    shutdown::check()?;

    match fs::symlink_metadata(&dup.path) {
        Ok(m) if m.is_file() && m.len() == dup.size => {}
        Ok(_) => return Ok(fail(dup, "changed since the scan; skipped", reporter)),
        Err(e) => {
            let msg = io_error_with_help("inspect", &dup.path)(e).to_string();
            return Ok(fail(dup, &msg, reporter));
        }
    }

    match action {
        DuplicateAction::Report => Ok(FileOutcome::Reported),
        DuplicateAction::Delete => match fs::remove_file(&dup.path) {
            Ok(()) => {
                debug!(path = %dup.path.display(), "deleted duplicate");
                reporter.info(&format!("Deleted {}", dup.path.display()));
                Ok(FileOutcome::Deleted)
            }
            Err(e) => {
                let msg = io_error_with_help("delete", &dup.path)(e).to_string();
                Ok(fail(dup, &msg, reporter))
            }
        },
        DuplicateAction::MoveTo(dest_dir) => match place_file(&dup.path, dest_dir, false) {
            Ok(placement) => {
                let to = placement.path().to_path_buf();
                if let Placement::Moved(_) = placement {
                    reporter.info(&format!("Moved {} -> {}", dup.path.display(), to.display()));
                }
                Ok(FileOutcome::Moved { to })
            }
            Err(e) => match e.downcast_ref::<OrganizerError>() {
                Some(OrganizerError::Interrupted) => Err(e),
                _ => Ok(fail(dup, &format!("{e:#}"), reporter)),
            },
        },
    }
}

fn fail(dup: &FileRecord, reason: &str, reporter: &dyn Reporter) -> FileOutcome {
    warn!(path = %dup.path.display(), reason, "duplicate not resolved");
    reporter.warn(&format!("{}: {}", dup.path.display(), reason));
    FileOutcome::Failed {
        reason: reason.to_string(),
    }
}

/// First 12 hex digits, enough to tell groups apart in listings.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::{ScanOptions, find_duplicates};
    use crate::report::{MemoryReporter, SilentReporter};
    use assert_fs::prelude::*;

    #[test]
    fn both_flags_is_a_usage_error() {
        let err = DuplicateAction::from_flags(true, Some(PathBuf::from("x"))).unwrap_err();
        assert_eq!(err.code(), 2);
        assert_eq!(DuplicateAction::from_flags(false, None).unwrap(), DuplicateAction::Report);
    }

    #[test]
    fn delete_needs_confirmation_and_changes_nothing_without_it() {
        let td = assert_fs::TempDir::new().unwrap();
        td.child("a").write_str("dup").unwrap();
        td.child("b").write_str("dup").unwrap();
        let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();

        let err = resolve_duplicates(&report, &DuplicateAction::Delete, false, &SilentReporter)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OrganizerError>(),
            Some(OrganizerError::ConfirmationRequired)
        ));
        assert!(td.child("b").path().exists());
    }

    #[test]
    fn report_touches_nothing() {
        let td = assert_fs::TempDir::new().unwrap();
        td.child("a").write_str("dup").unwrap();
        td.child("b").write_str("dup").unwrap();
        let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();
        let s = resolve_duplicates(&report, &DuplicateAction::Report, false, &SilentReporter).unwrap();
        assert_eq!(s.reported, 1);
        assert_eq!(s.deleted, 0);
        assert!(td.child("a").path().exists() && td.child("b").path().exists());
    }

    #[test]
    fn missing_keeper_skips_group() {
        let td = assert_fs::TempDir::new().unwrap();
        td.child("a").write_str("dup").unwrap();
        td.child("b").write_str("dup").unwrap();
        let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();
        fs::remove_file(td.child("a").path()).unwrap();

        let reporter = MemoryReporter::new();
        let s = resolve_duplicates(&report, &DuplicateAction::Delete, true, &reporter).unwrap();
        assert_eq!(s.deleted, 0);
        assert_eq!(s.failed, 1);
        assert!(td.child("b").path().exists());
    }

    #[test]
    fn changed_duplicate_is_skipped() {
        let td = assert_fs::TempDir::new().unwrap();
        td.child("a").write_str("dup").unwrap();
        td.child("b").write_str("dup").unwrap();
        let report = find_duplicates(td.path(), &ScanOptions::default(), &SilentReporter).unwrap();
        td.child("b").write_str("grown since").unwrap();

        let s = resolve_duplicates(&report, &DuplicateAction::Delete, true, &SilentReporter).unwrap();
        assert_eq!(s.failed, 1);
        assert_eq!(s.failures().len(), 1);
        assert!(td.child("b").path().exists());
    }

    #[test]
    fn short_hash_handles_short_input() {
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
    }
}
