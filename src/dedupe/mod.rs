//! Content-hash deduplication.
//!
//! Two phases: files are bucketed by size, then only same-size files are hashed
//! (SHA-256) and grouped by digest. The resulting report is then resolved with one
//! [`DuplicateAction`].

mod finder;
mod groups;
mod hasher;
mod resolve;

pub use finder::{DuplicateReport, ScanOptions, find_duplicates};
pub use groups::{DuplicateGroup, group_by_hash, group_by_size};
pub use hasher::hash_file;
pub use resolve::{
    DuplicateAction, FileOutcome, FileResolution, GroupResolution, ResolveSummary,
    resolve_duplicates, short_hash,
};
