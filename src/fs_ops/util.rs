use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique hidden name next to `original` (or inside `dir` when no original is given).
/// Pattern: `.<original>.file_organizer.<tag>.<pid>.<nanos>.<seq>`
///
/// Hidden names are never picked up by a scan, so an interrupted run cannot turn its
/// own temporaries into sort or dedupe candidates.
pub(super) fn hidden_sibling(dir: &Path, original: Option<&OsStr>, tag: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let stem = original
        .map(|o| o.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!(".{stem}.file_organizer.{tag}.{pid}.{nanos}.{seq}"))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            if code == libc::EXDEV {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(windows)]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
