//! Core library for `file_organizer`.
//!
//! Two pipelines over one directory:
//! - `sorter`: move top-level files into subdirectories by extension or by date.
//! - `dedupe`: find files with identical content (size, then SHA-256) and report,
//!   delete or move the extra copies.
//!
//! Both move files through `fs_ops::safe_move`, which never overwrites and never
//! leaves a file half-moved. User-facing output goes through an injected
//! [`report::Reporter`].

pub mod cli;
pub mod config;
pub mod dedupe;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod report;
pub mod shutdown;
pub mod sorter;

pub use config::types::{Config, KeepPolicy, LogLevel};
pub use config::{default_config_path, load_config, path_has_symlink_ancestor};
pub use dedupe::{
    DuplicateAction, DuplicateGroup, DuplicateReport, ResolveSummary, ScanOptions,
    find_duplicates, resolve_duplicates,
};
pub use errors::{FileWarning, OrganizerError};
pub use fs_ops::{FileRecord, Placement, place_file, safe_move, scan_files};
pub use report::{ConsoleReporter, MemoryReporter, Reporter, SilentReporter};
pub use sorter::{SortOptions, SortSummary, sort_by_date, sort_by_type};

impl From<&Config> for ScanOptions {
    fn from(cfg: &Config) -> Self {
        ScanOptions {
            recursive: cfg.recursive,
            keep: cfg.keep,
            block_size: cfg.hash_block_size,
        }
    }
}

impl From<&Config> for SortOptions {
    fn from(cfg: &Config) -> Self {
        SortOptions {
            dry_run: cfg.dry_run,
        }
    }
}
