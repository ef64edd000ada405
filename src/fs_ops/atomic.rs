//! No-clobber commit of a file to its final name.
//! - Hard-link + unlink: the link fails with AlreadyExists instead of replacing a file.
//! - Filesystems without hard links fall back to an existence-checked rename.
//! - On Unix, best-effort fsync of the destination directory afterwards.

use std::fs;
use std::io;
use std::path::Path;

use super::util::{fsync_dir, is_cross_device};

/// Move `src` to `dst` within one filesystem without ever replacing an existing `dst`.
///
/// Errors keep their original kind: `AlreadyExists` means the name was taken (pick
/// another), a cross-device error means the caller has to copy instead.
pub(super) fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::hard_link(src, dst) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(src) {
                // Undo the link so the file exists in exactly one place.
                let _ = fs::remove_file(dst);
                return Err(e);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists || is_cross_device(&e) => {
            return Err(e);
        }
        Err(_) => {
            // No hard-link support here (FAT, some network shares): checked rename.
            if fs::symlink_metadata(dst).is_ok() {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            fs::rename(src, dst)?;
        }
    }

    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful move into a failure.
        let _ = fsync_dir(parent);
    }
    Ok(())
}
