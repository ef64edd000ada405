//! Destination-name resolution (the collision policy).
//!
//! Policy, shared by the sorters and the dedupe `move` action:
//! - the plain name is used when nothing exists there;
//! - an existing entry that *is* the source file means "already in place";
//! - otherwise `stem_1.ext`, `stem_2.ext`, ... until a free name is found.
//!
//! Notes:
//! - This only decides the path based on current filesystem state. The commit that
//!   follows is no-clobber, so a name taken in between is detected there and the
//!   caller simply resolves again.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::identity::same_file;

/// Upper bound on numeric suffixes tried before giving up.
const MAX_SUFFIX: u64 = 100_000;

/// Outcome of resolving a destination name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing exists at this path.
    Free(PathBuf),
    /// The source file already lives at this path.
    SameFile(PathBuf),
}

/// Resolve where `src` (named `name`) should land inside `dst_dir`.
///
/// Returns `None` only if every suffix up to an absurd bound is taken.
pub fn resolve_destination(dst_dir: &Path, name: &OsStr, src: &Path) -> Option<Resolution> {
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    // `notes.` has an empty extension; keeping it puts the suffix before the dot.
    let ext: Option<OsString> = base.extension().map(|e| e.to_os_string());

    let mut n: u64 = 0;
    loop {
        let file_name = if n == 0 {
            name.to_os_string()
        } else {
            build_name_with_suffix(&stem, ext.as_deref(), &format!("_{n}"))
        };
        let candidate = dst_dir.join(&file_name);
        if fs::symlink_metadata(&candidate).is_err() {
            return Some(Resolution::Free(candidate));
        }
        if same_file(&candidate, src).unwrap_or(false) {
            return Some(Resolution::SameFile(candidate));
        }
        n += 1;
        if n == 3 {
            trace!(name = ?name, dir = %dst_dir.display(), "multiple name collisions; still searching for a free suffix");
        }
        if n > MAX_SUFFIX {
            return None;
        }
    }
}

// Conservative filename limits (bytes/characters, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240; // leave headroom for legacy MAX_PATH
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255; // typical POSIX/EXT limits

/// Measure the approximate length of an OsStr for filename budgeting.
#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// `stem + suffix + ["." + ext]`, shrinking the stem so the result fits MAX_FILENAME_LEN.
fn build_name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let mut overhead = suffix.len();
    let mut ext_part = OsString::new();
    if let Some(e) = ext {
        overhead = overhead.saturating_add(1 + name_len_units(e));
        ext_part.push(".");
        ext_part.push(e);
    }

    let mut stem_os = stem.to_os_string();
    if name_len_units(&stem_os) + overhead > MAX_FILENAME_LEN {
        let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
        stem_os = truncate_stem(stem, budget);
    }

    let mut new_name = stem_os;
    new_name.push(suffix);
    new_name.push(&ext_part);
    new_name
}

/// Cut a stem down to at most `budget` units, on a char boundary when it is UTF-8.
fn truncate_stem(stem: &OsStr, budget: usize) -> OsString {
    if let Some(s) = stem.to_str() {
        let mut acc = String::new();
        for ch in s.chars() {
            if acc.len() + ch.len_utf8() > budget {
                break;
            }
            acc.push(ch);
        }
        if acc.is_empty() {
            acc.push('f');
        }
        return OsString::from(acc);
    }
    #[cfg(unix)]
    {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        let bytes = stem.as_bytes();
        OsString::from_vec(bytes[..bytes.len().min(budget)].to_vec())
    }
    #[cfg(not(unix))]
    {
        let lossy: String = stem.to_string_lossy().chars().take(budget).collect();
        OsString::from(lossy)
    }
}
