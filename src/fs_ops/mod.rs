//! Filesystem operations: scanning and the safe-move primitive, modularized.

mod atomic;
mod claim;
mod copy;
mod duplicate;
mod helpers;
mod identity;
mod io_copy;
mod meta;
mod safe_move;
mod scan;
mod space;
mod util;

pub use duplicate::{Resolution, resolve_destination};
pub use helpers::io_error_with_help;
pub use identity::same_file;
pub use safe_move::{Placement, ensure_dir, place_file, safe_move};
pub use scan::{FileRecord, ScanResult, ensure_directory, scan_files};
pub use space::format_bytes;
