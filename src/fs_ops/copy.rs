//! Cross-filesystem staging:
//! - Checks free space at the destination first
//! - Copies into a hidden temp file inside the destination directory (create_new, fsynced)
//! - Verifies the byte count against the size seen before copying
//! - Carries timestamps and permissions over
//!
//! The caller commits the staged file with a no-clobber rename and only then removes the source.

use anyhow::{Result, bail};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::helpers::io_error_with_help;
use super::space::ensure_space_for_copy;
use super::{io_copy, meta, util};

/// A fully written copy waiting to be committed. Removed on drop unless committed.
#[derive(Debug)]
pub(super) struct StagedCopy {
    path: PathBuf,
    committed: bool,
}

impl StagedCopy {
    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    /// The temp name is gone (renamed into place); do not remove it on drop.
    pub(super) fn mark_committed(&mut self) {
        self.committed = true;
    }
}

impl Drop for StagedCopy {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Copy `src` into a hidden temp file in `dest_dir`.
pub(super) fn stage_copy(src: &Path, src_meta: &Metadata, dest_dir: &Path) -> Result<StagedCopy> {
    ensure_space_for_copy(dest_dir, src_meta.len())?;

    let staged = StagedCopy {
        path: util::hidden_sibling(dest_dir, src.file_name(), "copy"),
        committed: false,
    };

    let written = io_copy::copy_streaming(src, staged.path())
        .map_err(io_error_with_help("copy to temporary file", staged.path()))?;
    if written != src_meta.len() {
        bail!(
            "source '{}' changed while copying ({} bytes expected, {} copied)",
            src.display(),
            src_meta.len(),
            written
        );
    }

    meta::preserve_metadata(src_meta, staged.path())
        .map_err(io_error_with_help("preserve metadata", staged.path()))?;

    debug!(src = %src.display(), tmp = %staged.path().display(), bytes = written, "staged cross-device copy");
    Ok(staged)
}
