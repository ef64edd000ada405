use anyhow::anyhow;
use std::path::Path;

use crate::platform::free_space_bytes;

/// Human-readable binary size ("1.5 MiB").
pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Refuse a cross-filesystem copy that would not fit (with a small cushion).
/// If free space cannot be determined the copy is attempted anyway.
pub(super) fn ensure_space_for_copy(dst_dir: &Path, required: u64) -> anyhow::Result<()> {
    let Ok(free) = free_space_bytes(dst_dir) else {
        return Ok(());
    };
    let cushion: u64 = 4 * 1024 * 1024;
    if free < required.saturating_add(cushion) {
        return Err(anyhow!(
            "not enough free space in '{}': need ~{}, free {}",
            dst_dir.display(),
            format_bytes(required),
            format_bytes(free)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn tiny_copy_fits() {
        let td = tempfile::tempdir().unwrap();
        ensure_space_for_copy(td.path(), 1).unwrap();
    }
}
