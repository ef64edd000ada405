//! Sorting the files of a directory into subdirectories by type or by date.
//!
//! Only the top level is sorted; hidden files and subdirectories are left alone.
//! Name collisions inside a key directory get `_N` suffixes, never overwrite.

mod key;
mod relocate;

use anyhow::Result;
use std::path::Path;

use crate::config::validate_date_format;
use crate::report::Reporter;

pub use key::{date_key, type_key};
pub use relocate::{SortOptions, SortSummary};

/// Move every top-level file into `<dir>/<extension>/`.
pub fn sort_by_type(dir: &Path, opts: &SortOptions, reporter: &dyn Reporter) -> Result<SortSummary> {
    relocate::relocate(dir, opts, reporter, |file| {
        type_key(&file.path)
            .ok_or_else(|| anyhow::anyhow!("hidden or unnamed file has no type"))
    })
}

/// Move every top-level file into `<dir>/<mtime formatted with date_format>/`.
pub fn sort_by_date(
    dir: &Path,
    date_format: &str,
    opts: &SortOptions,
    reporter: &dyn Reporter,
) -> Result<SortSummary> {
    if let Err(e) = validate_date_format(date_format) {
        reporter.error(&e.to_string());
        return Err(e.into());
    }
    relocate::relocate(dir, opts, reporter, |file| date_key(file.modified, date_format))
}
