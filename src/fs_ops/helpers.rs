//! I/O helper utilities.
//!
//! Provides an adapter that enriches io::Error with actionable context/hints.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

use super::util::is_cross_device;

/// Short hint for the most common failure modes of moving/deleting/hashing files.
fn hint_for(e: &io::Error) -> Option<&'static str> {
    if is_cross_device(e) {
        return Some("cross-filesystem; rename not possible, a copy is needed");
    }
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        match code {
            libc::EBUSY => return Some("resource busy; another process may be using it"),
            libc::ENOSPC => return Some("insufficient space on device"),
            libc::EROFS => return Some("read-only filesystem"),
            libc::ENAMETOOLONG => return Some("file name or path too long"),
            libc::ENOTDIR => return Some("a path component is a file, not a directory"),
            libc::EMFILE | libc::ENFILE => return Some("too many open files"),
            _ => {}
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and permissions"),
        io::ErrorKind::NotFound => Some("not found; it may have been moved or deleted meanwhile"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Some("busy/timed out; retry later"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_hint_added() {
        let e = io::Error::from(io::ErrorKind::PermissionDenied);
        let msg = io_error_with_help("delete", Path::new("/x/y"))(e).to_string();
        assert!(msg.starts_with("delete '/x/y'"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn unknown_errors_get_no_hint() {
        let e = io::Error::from(io::ErrorKind::Other);
        let msg = io_error_with_help("copy", Path::new("a"))(e).to_string();
        assert!(!msg.contains('('), "no hint expected: {msg}");
    }
}
