//! Duplicate detection: scan, group by size, hash candidates, group by hash.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{HASH_BLOCK_SIZE_DEFAULT, KeepPolicy};
use crate::errors::FileWarning;
use crate::fs_ops::{ensure_directory, scan_files};
use crate::report::Reporter;

use super::groups::{DuplicateGroup, group_by_hash, group_by_size};

/// How a duplicate scan walks and orders its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub recursive: bool,
    pub keep: KeepPolicy,
    pub block_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            keep: KeepPolicy::First,
            block_size: HASH_BLOCK_SIZE_DEFAULT,
        }
    }
}

/// Result of [`find_duplicates`].
#[derive(Debug, Clone, Default)]
pub struct DuplicateReport {
    /// Groups of two or more identical files, ordered by their first path.
    pub groups: Vec<DuplicateGroup>,
    pub files_scanned: usize,
    /// Files left out because they could not be read.
    pub warnings: Vec<FileWarning>,
}

impl DuplicateReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of files that would be removed (every member except each keeper).
    pub fn total_duplicates(&self) -> usize {
        self.groups.iter().map(|g| g.duplicates().len()).sum()
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_bytes).sum()
    }

    /// hash -> paths, keeper first.
    pub fn to_map(&self) -> BTreeMap<String, Vec<PathBuf>> {
        self.groups
            .iter()
            .map(|g| (g.hash.clone(), g.paths()))
            .collect()
    }
}

/// Find files with identical content under `dir`.
///
/// A missing or non-directory `dir` is reported and returned as an error; unreadable
/// files are skipped with a warning and never reported as duplicates.
pub fn find_duplicates(
    dir: &Path,
    opts: &ScanOptions,
    reporter: &dyn Reporter,
) -> Result<DuplicateReport> {
    if let Err(e) = ensure_directory(dir) {
        reporter.error(&e.to_string());
        return Err(e);
    }

    reporter.info(&format!("Scanning {} for duplicates...", dir.display()));
    let scan = scan_files(dir, opts.recursive, reporter)?;
    for w in &scan.warnings {
        reporter.warn(&w.to_string());
    }
    let files_scanned = scan.files.len();

    let size_groups = group_by_size(scan.files);
    let (mut groups, hash_warnings) = group_by_hash(&size_groups, opts.block_size, reporter)?;

    for g in &mut groups {
        g.apply_keep_policy(opts.keep);
    }
    groups.sort_by(|a, b| a.files[0].path.cmp(&b.files[0].path));

    let mut warnings = scan.warnings;
    warnings.extend(hash_warnings);

    let report = DuplicateReport {
        groups,
        files_scanned,
        warnings,
    };
    info!(
        dir = %dir.display(),
        files = files_scanned,
        groups = report.groups.len(),
        duplicates = report.total_duplicates(),
        reclaimable = report.reclaimable_bytes(),
        "duplicate scan finished"
    );
    Ok(report)
}
