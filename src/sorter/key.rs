//! Classification keys: the name of the subdirectory a file is sorted into.

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::{Component, Path};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::validate_date_format;
use crate::errors::OrganizerError;

/// Lowercase extension without the dot. Files without an extension (or ending in a
/// bare dot) use their full name. Hidden files have no key.
pub fn type_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    if name.is_empty() || name.starts_with('.') {
        return None;
    }
    match path.extension() {
        Some(ext) if !ext.is_empty() => Some(ext.to_string_lossy().to_lowercase()),
        _ => Some(name.into_owned()),
    }
}

/// Render `modified` (local time) with a strftime pattern such as `%Y-%m` or `%Y/%m/%d`.
///
/// `/` in the result yields nested directories. Results that would leave the sorted
/// directory (absolute, `..`) or contain empty components are rejected.
pub fn date_key(modified: SystemTime, format: &str) -> Result<String> {
    validate_date_format(format)?;

    let local = to_local(modified).ok_or_else(|| {
        anyhow::anyhow!("modification time is outside the representable date range")
    })?;
    let mut key = String::new();
    write!(key, "{}", local.format(format))
        .map_err(|_| OrganizerError::InvalidDateFormat(format.to_string()))?;

    check_relative_key(&key)?;
    Ok(key)
}

/// `None` for times chrono cannot represent (filesystems accept any 64-bit mtime).
fn to_local(t: SystemTime) -> Option<DateTime<Local>> {
    let (secs, nanos) = match t.duration_since(UNIX_EPOCH) {
        Ok(d) => (i64::try_from(d.as_secs()).ok()?, d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            let secs = i64::try_from(d.as_secs()).ok()?.checked_neg()?;
            match d.subsec_nanos() {
                0 => (secs, 0),
                n => (secs.checked_sub(1)?, 1_000_000_000 - n),
            }
        }
    };
    DateTime::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&Local))
}

fn check_relative_key(key: &str) -> Result<()> {
    let bad = |why: &str| -> anyhow::Error {
        anyhow::anyhow!("date key '{key}' is not usable as a directory name: {why}")
    };
    if key.is_empty() {
        return Err(bad("empty"));
    }
    if key.split(['/', '\\']).any(str::is_empty) {
        return Err(bad("empty path component"));
    }
    for comp in Path::new(key).components() {
        match comp {
            Component::Normal(_) => {}
            Component::ParentDir => return Err(bad("contains '..'")),
            Component::CurDir => return Err(bad("contains '.'")),
            Component::RootDir | Component::Prefix(_) => return Err(bad("absolute path")),
        }
    }
    Ok(())
}
