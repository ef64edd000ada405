//! Safe move of a single file into a directory.
//! Tries a no-clobber rename first; on a cross-filesystem error it stages a copy in the
//! destination, commits it without clobbering and only then removes the source.
//! Either the file ends up at exactly one of source or destination, never both or neither.

use anyhow::{Context, Result, anyhow, bail};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::shutdown;

use super::atomic::rename_no_clobber;
use super::claim::nest_in_own_directory;
use super::copy::stage_copy;
use super::duplicate::{Resolution, resolve_destination};
use super::helpers::io_error_with_help;
use super::identity::same_file;
use super::util::is_cross_device;

/// Rounds of "pick a name, commit" before giving up when names keep getting taken.
const MAX_COMMIT_ATTEMPTS: u32 = 16;

/// Where a file ended up (or would end up, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Moved(PathBuf),
    /// The destination already holds this very file; nothing was done.
    AlreadyInPlace(PathBuf),
    /// Dry run: the path the file would be moved to.
    Planned(PathBuf),
}

impl Placement {
    pub fn path(&self) -> &Path {
        match self {
            Placement::Moved(p) | Placement::AlreadyInPlace(p) | Placement::Planned(p) => p,
        }
    }
}

/// Create `dir` and its parents. Returns true if it did not exist before.
/// Idempotent: an existing directory is not an error, an existing non-directory is.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    match fs::metadata(dir) {
        Ok(m) if m.is_dir() => return Ok(false),
        Ok(_) => bail!("'{}' exists and is not a directory", dir.display()),
        Err(_) => {}
    }
    fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;
    debug!(dir = %dir.display(), "created directory");
    Ok(true)
}

/// Move `src` into `dest_dir`, creating the directory as needed. Returns the final path.
pub fn safe_move(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    place_file(src, dest_dir, false).map(|p| p.path().to_path_buf())
}

/// Move `src` into `dest_dir` resolving name collisions with `_N` suffixes.
///
/// - A destination entry that is `src` itself yields `AlreadyInPlace`.
/// - If `dest_dir` is `src` itself (an extension-less file sorted under its own name),
///   the file is nested into a new directory of that name.
/// - With `dry_run`, nothing is touched and the chosen path is returned as `Planned`.
pub fn place_file(src: &Path, dest_dir: &Path, dry_run: bool) -> Result<Placement> {
    shutdown::check()?;

    let src_meta = fs::symlink_metadata(src).map_err(io_error_with_help("inspect source", src))?;
    if !src_meta.is_file() {
        bail!("'{}' is not a regular file", src.display());
    }
    let name = src
        .file_name()
        .ok_or_else(|| anyhow!("source has no file name: {}", src.display()))?;

    match fs::metadata(dest_dir) {
        Ok(m) if m.is_dir() => {}
        Ok(_) if same_file(dest_dir, src).unwrap_or(false) => {
            let nested = dest_dir.join(name);
            if dry_run {
                return Ok(Placement::Planned(nested));
            }
            let dest = nest_in_own_directory(src)
                .map_err(io_error_with_help("nest file into directory of the same name", src))?;
            info!(src = %src.display(), dest = %dest.display(), "moved file into directory of its own name");
            return Ok(Placement::Moved(dest));
        }
        Ok(_) => bail!(
            "cannot move '{}': destination '{}' exists and is not a directory",
            src.display(),
            dest_dir.display()
        ),
        Err(_) if dry_run => return Ok(Placement::Planned(dest_dir.join(name))),
        Err(_) => {
            fs::create_dir_all(dest_dir)
                .map_err(io_error_with_help("create destination directory", dest_dir))?;
        }
    }

    if dry_run {
        return match resolve(dest_dir, name, src)? {
            Resolution::Free(p) => Ok(Placement::Planned(p)),
            Resolution::SameFile(p) => Ok(Placement::AlreadyInPlace(p)),
        };
    }

    for _ in 0..MAX_COMMIT_ATTEMPTS {
        let dest = match resolve(dest_dir, name, src)? {
            Resolution::SameFile(p) => {
                debug!(path = %p.display(), "already in place");
                return Ok(Placement::AlreadyInPlace(p));
            }
            Resolution::Free(p) => p,
        };
        match rename_no_clobber(src, &dest) {
            Ok(()) => {
                info!(src = %src.display(), dest = %dest.display(), "moved file");
                return Ok(Placement::Moved(dest));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(dest = %dest.display(), "destination name taken meanwhile; retrying");
            }
            Err(e) if is_cross_device(&e) => {
                warn!(src = %src.display(), dest_dir = %dest_dir.display(), "cross-filesystem move; copying instead");
                return move_across_devices(src, &src_meta, dest_dir, name).map(Placement::Moved);
            }
            Err(e) => return Err(io_error_with_help("move file", src)(e)),
        }
    }
    bail!(
        "could not find a free name for '{}' in '{}'",
        src.display(),
        dest_dir.display()
    )
}

fn resolve(dest_dir: &Path, name: &OsStr, src: &Path) -> Result<Resolution> {
    resolve_destination(dest_dir, name, src).ok_or_else(|| {
        anyhow!(
            "no free name for '{}' in '{}'",
            Path::new(name).display(),
            dest_dir.display()
        )
    })
}

/// Copy, commit without clobbering, then remove the source.
fn move_across_devices(
    src: &Path,
    src_meta: &fs::Metadata,
    dest_dir: &Path,
    name: &OsStr,
) -> Result<PathBuf> {
    let mut staged = stage_copy(src, src_meta, dest_dir)?;

    let mut committed = None;
    for _ in 0..MAX_COMMIT_ATTEMPTS {
        let dest = match resolve(dest_dir, name, src)? {
            Resolution::Free(p) => p,
            // Cannot happen across filesystems; treat as taken.
            Resolution::SameFile(_) => continue,
        };
        match rename_no_clobber(staged.path(), &dest) {
            Ok(()) => {
                staged.mark_committed();
                committed = Some(dest);
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(io_error_with_help("commit copied file", &dest)(e));
            }
        }
    }
    let dest = committed.ok_or_else(|| {
        anyhow!(
            "could not find a free name for '{}' in '{}'",
            src.display(),
            dest_dir.display()
        )
    })?;

    if let Err(e) = fs::remove_file(src) {
        let _ = fs::remove_file(&dest);
        return Err(io_error_with_help("remove original after copy", src)(e))
            .with_context(|| format!("copy at '{}' was removed again", dest.display()));
    }

    info!(src = %src.display(), dest = %dest.display(), "moved file across filesystems");
    Ok(dest)
}
