//! Moving the top-level files of a directory into per-key subdirectories.

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{FileWarning, OrganizerError};
use crate::fs_ops::{FileRecord, Placement, ensure_dir, ensure_directory, place_file, scan_files};
use crate::report::{Phase, Reporter};
use crate::shutdown;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Compute every destination without touching the disk.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub files_moved: usize,
    /// Key directories that did not exist before this run (would be created, in a dry run).
    pub dirs_created: usize,
    /// Files whose destination already was the file itself.
    pub already_placed: usize,
    /// Dry run: files that would be moved.
    pub planned: usize,
    pub warnings: Vec<FileWarning>,
}

/// Destination directory per key, resolved at most once per run.
#[derive(Default)]
struct DirMemo {
    dirs: HashMap<String, PathBuf>,
}

/// Shared driver for both sorters. `key_of` maps a file to its subdirectory name.
pub(super) fn relocate<F>(
    dir: &Path,
    opts: &SortOptions,
    reporter: &dyn Reporter,
    key_of: F,
) -> Result<SortSummary>
where
    F: Fn(&FileRecord) -> Result<String>,
{
    if let Err(e) = ensure_directory(dir) {
        reporter.error(&e.to_string());
        return Err(e);
    }

    let scan = scan_files(dir, false, reporter)?;
    let mut summary = SortSummary::default();
    for w in scan.warnings {
        reporter.warn(&w.to_string());
        summary.warnings.push(w);
    }

    if scan.files.is_empty() {
        reporter.info("Nothing to sort: no files found");
        return Ok(summary);
    }

    let mut plan: Vec<(FileRecord, String)> = Vec::with_capacity(scan.files.len());
    for file in scan.files {
        match key_of(&file) {
            Ok(key) => plan.push((file, key)),
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "no destination for file; skipping");
                let w = FileWarning::new(&file.path, format!("{e:#}"));
                reporter.warn(&w.to_string());
                summary.warnings.push(w);
            }
        }
    }

    // A file named like its own key must become that directory before anything else
    // is moved into it. Stable, so scan order is kept within each half.
    plan.sort_by_key(|(file, key)| !is_own_key(file, key));

    let total = plan.len();
    let mut memo = DirMemo::default();
    for (i, (file, key)) in plan.into_iter().enumerate() {
        shutdown::check()?;
        reporter.progress(Phase::Sort, i + 1, total);

        let dest_dir = match memo.dirs.get(&key) {
            Some(d) => d.clone(),
            None => {
                let d = dir.join(&key);
                let claims_itself = is_own_key(&file, &key);
                match prepare_dir(&d, opts.dry_run, claims_itself) {
                    Ok(created) => {
                        if created {
                            summary.dirs_created += 1;
                        }
                        memo.dirs.insert(key.clone(), d.clone());
                        d
                    }
                    Err(e) => {
                        let w = FileWarning::new(&file.path, format!("{e:#}"));
                        reporter.warn(&w.to_string());
                        summary.warnings.push(w);
                        continue;
                    }
                }
            }
        };

        let placement = if opts.dry_run && !dest_dir.is_dir() && !is_own_key(&file, &key) {
            // Not created yet in a dry run, so nothing can collide there.
            Ok(Placement::Planned(
                dest_dir.join(file.path.file_name().unwrap_or_default()),
            ))
        } else {
            place_file(&file.path, &dest_dir, opts.dry_run)
        };

        match placement {
            Ok(Placement::Moved(to)) => {
                debug!(src = %file.path.display(), dest = %to.display(), "sorted");
                summary.files_moved += 1;
            }
            Ok(Placement::AlreadyInPlace(_)) => summary.already_placed += 1,
            Ok(Placement::Planned(to)) => {
                reporter.info(&format!("Would move {} -> {}", file.path.display(), to.display()));
                summary.planned += 1;
            }
            Err(e) => {
                if let Some(OrganizerError::Interrupted) = e.downcast_ref::<OrganizerError>() {
                    return Err(e);
                }
                warn!(path = %file.path.display(), error = %e, "could not sort file");
                let w = FileWarning::new(&file.path, format!("{e:#}"));
                reporter.warn(&w.to_string());
                summary.warnings.push(w);
            }
        }
    }

    let used = memo.dirs.len();
    if opts.dry_run {
        reporter.info(&format!(
            "Dry run: would sort {} files into {} directories",
            summary.planned, used
        ));
    } else {
        reporter.success(&format!(
            "Sorted {} files into {} directories",
            summary.files_moved, used
        ));
    }
    info!(
        dir = %dir.display(),
        moved = summary.files_moved,
        dirs_created = summary.dirs_created,
        already_placed = summary.already_placed,
        planned = summary.planned,
        skipped = summary.warnings.len(),
        "sort finished"
    );
    Ok(summary)
}

/// True for an extension-less file whose key is its own name (`Makefile` -> `Makefile/`).
fn is_own_key(file: &FileRecord, key: &str) -> bool {
    file.path.file_name().is_some_and(|n| n == key)
}

/// Make sure the key directory exists. Returns whether it did not exist before.
/// When the directory's name is taken by the file being sorted, creation is left
/// to the move, which nests the file into a directory of its own name.
fn prepare_dir(dest: &Path, dry_run: bool, claims_itself: bool) -> Result<bool> {
    let existed = dest.is_dir();
    if existed {
        return Ok(false);
    }
    if dry_run || claims_itself {
        return Ok(true);
    }
    ensure_dir(dest)
}
