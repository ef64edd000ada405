//! Metadata preservation for copied files.
//! A rename keeps timestamps and permissions by itself; a cross-filesystem copy does
//! not, and sort-by-date depends on the modification time surviving the move.

use filetime::{FileTime, set_file_times};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Copy access/modification times and permission bits from `src_meta` onto `dest`.
pub(super) fn preserve_metadata(src_meta: &Metadata, dest: &Path) -> io::Result<()> {
    let atime = FileTime::from_last_access_time(src_meta);
    let mtime = FileTime::from_last_modification_time(src_meta);
    set_file_times(dest, atime, mtime)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o7777;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    {
        let mut perms = fs::metadata(dest)?.permissions();
        perms.set_readonly(src_meta.permissions().readonly());
        fs::set_permissions(dest, perms)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mtime_copied() {
        let td = tempdir().unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let old = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&a, old).unwrap();

        preserve_metadata(&fs::metadata(&a).unwrap(), &b).unwrap();
        let got = FileTime::from_last_modification_time(&fs::metadata(&b).unwrap());
        assert_eq!(got.unix_seconds(), 1_600_000_000);
    }
}
