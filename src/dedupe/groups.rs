//! Size and hash grouping.
//!
//! Phase 1 buckets files by exact size; only buckets with two or more members can hold
//! duplicates. Phase 2 hashes those candidates and keeps hashes shared by two or more
//! files. Hash buckets are built per size bucket, so files of different sizes can never
//! end up in the same group.

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::KeepPolicy;
use crate::errors::FileWarning;
use crate::fs_ops::FileRecord;
use crate::report::{Phase, Reporter};
use crate::shutdown;

use super::hasher::hash_file;

/// Files with identical content. `files[0]` is the one that is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub hash: String,
    pub size: u64,
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    pub fn keeper(&self) -> &FileRecord {
        &self.files[0]
    }

    /// Every member except the keeper.
    pub fn duplicates(&self) -> &[FileRecord] {
        &self.files[1..]
    }

    /// Bytes freed if all duplicates were removed.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * self.duplicates().len() as u64
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Reorder so the keeper chosen by `policy` is at index 0.
    /// `Oldest` is a stable sort, so equal times keep scan order.
    pub fn apply_keep_policy(&mut self, policy: KeepPolicy) {
        if policy == KeepPolicy::Oldest {
            self.files.sort_by_key(|f| f.modified);
        }
    }
}

/// Bucket files by exact byte size, preserving scan order within a bucket.
pub fn group_by_size(files: Vec<FileRecord>) -> BTreeMap<u64, Vec<FileRecord>> {
    let mut groups: BTreeMap<u64, Vec<FileRecord>> = BTreeMap::new();
    for file in files {
        groups.entry(file.size).or_default().push(file);
    }
    groups
}

/// Hash every member of the multi-member size buckets and return the groups whose hash
/// is shared by two or more files. Unreadable files are left out with a warning.
pub fn group_by_hash(
    size_groups: &BTreeMap<u64, Vec<FileRecord>>,
    block_size: usize,
    reporter: &dyn Reporter,
) -> Result<(Vec<DuplicateGroup>, Vec<FileWarning>)> {
    let total: usize = size_groups
        .values()
        .filter(|g| g.len() > 1)
        .map(Vec::len)
        .sum();
    debug!(candidates = total, "hashing files that share a size");

    let mut groups = Vec::new();
    let mut warnings = Vec::new();
    let mut done = 0usize;

    for (&size, files) in size_groups.iter().filter(|(_, g)| g.len() > 1) {
        // Insertion order of hashes follows scan order of their first member.
        let mut order: Vec<String> = Vec::new();
        let mut by_hash: HashMap<String, Vec<FileRecord>> = HashMap::new();

        for file in files {
            shutdown::check()?;
            done += 1;
            reporter.progress(Phase::Hash, done, total);
            match hash_file(&file.path, block_size) {
                Ok(hash) => {
                    let bucket = by_hash.entry(hash.clone()).or_default();
                    if bucket.is_empty() {
                        order.push(hash);
                    }
                    bucket.push(file.clone());
                }
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "could not hash file; treating as unique");
                    let w = FileWarning::new(&file.path, format!("could not read: {e}"));
                    reporter.warn(&w.to_string());
                    warnings.push(w);
                }
            }
        }

        for hash in order {
            if let Some(files) = by_hash.remove(&hash)
                && files.len() > 1
            {
                groups.push(DuplicateGroup { hash, size, files });
            }
        }
    }

    Ok((groups, warnings))
}
