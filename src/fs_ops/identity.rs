//! Same-file identity check used by the collision policy.

use std::io;
use std::path::Path;

/// True when `a` and `b` name the same file (not merely equal content).
///
/// Unix compares (device, inode); elsewhere the canonical paths are compared.
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let ma = std::fs::metadata(a)?;
        let mb = std::fs::metadata(b)?;
        Ok(ma.dev() == mb.dev() && ma.ino() == mb.ino())
    }
    #[cfg(not(unix))]
    {
        Ok(dunce::canonicalize(a)? == dunce::canonicalize(b)?)
    }
}
