//! Claim a file in place by renaming it to a hidden sibling name.
//!
//! Used when a file has to become a directory of the same name (an extension-less
//! file `notes` sorted into `notes/notes`): the name is freed first, the directory
//! created, then the claimed file moved inside. Any failure restores the original name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::atomic::rename_no_clobber;
use super::util::hidden_sibling;

const MAX_TRIES: u32 = 5;

/// Rename `src` to a unique hidden name in its own directory. Returns the claimed path.
/// Returns NotFound if `src` vanished meanwhile.
pub(super) fn claim_aside(src: &Path) -> io::Result<PathBuf> {
    let parent = src.parent().unwrap_or_else(|| Path::new("."));
    let mut last_err = None;
    for _ in 0..MAX_TRIES {
        let claimed = hidden_sibling(parent, src.file_name(), "claim");
        match rename_no_clobber(src, &claimed) {
            Ok(()) => {
                debug!(src = %src.display(), claimed = %claimed.display(), "claimed file in place");
                return Ok(claimed);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists)))
}

/// Put a claimed file back under its original name.
pub(super) fn restore(claimed: &Path, original: &Path) -> io::Result<()> {
    rename_no_clobber(claimed, original).inspect_err(|e| {
        warn!(
            claimed = %claimed.display(),
            original = %original.display(),
            error = %e,
            "could not restore claimed file to its original name"
        );
    })
}

/// Turn the file `src` into a directory of the same name containing it.
/// Returns the file's new path, `<src>/<name>`.
pub(super) fn nest_in_own_directory(src: &Path) -> io::Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let claimed = claim_aside(src)?;

    if let Err(e) = fs::create_dir(src) {
        let _ = restore(&claimed, src);
        return Err(e);
    }

    let dest = src.join(name);
    if let Err(e) = rename_no_clobber(&claimed, &dest) {
        let _ = fs::remove_dir(src);
        let _ = restore(&claimed, src);
        return Err(e);
    }
    Ok(dest)
}
