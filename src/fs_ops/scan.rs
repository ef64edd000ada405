//! Directory scanning shared by the deduplicator and the sorters.
//!
//! Eligible entries are regular files whose name does not start with `.`. Symlinks are
//! neither followed nor returned. Entries are visited in file-name order, so the scan
//! order (and with it "first" in a duplicate group) is deterministic.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{FileWarning, OrganizerError};
use crate::report::{Phase, Reporter};

/// A regular file seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

impl FileRecord {
    pub fn is_hidden(&self) -> bool {
        is_hidden_name(&self.path)
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<FileRecord>,
    /// Entries that could not be read; they are excluded from `files`.
    pub warnings: Vec<FileWarning>,
}

fn is_hidden_name(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Fail with `NotFound` / `NotADirectory` unless `dir` is an existing directory.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(m) if m.is_dir() => Ok(()),
        Ok(_) => Err(OrganizerError::NotADirectory(dir.to_path_buf()).into()),
        Err(_) => Err(OrganizerError::NotFound(dir.to_path_buf()).into()),
    }
}

/// Collect the eligible files under `root`: its direct children, or every descendant
/// when `recursive` is set.
///
/// Emits one `Phase::Scan` tick per accepted file as the walk finds it. The total is
/// not known while walking, so it is reported as 0.
pub fn scan_files(root: &Path, recursive: bool, reporter: &dyn Reporter) -> Result<ScanResult> {
    ensure_directory(root)?;

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut out = ScanResult::default();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                out.warnings.push(FileWarning::new(path, e));
                continue;
            }
        };
        if !entry.file_type().is_file() || is_hidden_name(entry.path()) {
            continue;
        }
        match entry.metadata() {
            Ok(m) => {
                out.files.push(FileRecord {
                    path: entry.into_path(),
                    size: m.len(),
                    modified: m.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                });
                reporter.progress(Phase::Scan, out.files.len(), 0);
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "cannot read file size; skipping");
                out.warnings.push(FileWarning::new(entry.path(), e));
            }
        }
    }

    debug!(
        root = %root.display(),
        recursive,
        files = out.files.len(),
        warnings = out.warnings.len(),
        "scan complete"
    );
    Ok(out)
}
