//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - KeepPolicy decides which member of a duplicate group survives.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DATE_FORMAT_DEFAULT, HASH_BLOCK_SIZE_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default; user-facing output is printed separately)
    #[default]
    Normal,
    /// Per-file actions
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Which file of a duplicate group is kept.
///
/// Either way the keeper ends up at index 0 of the group; the policy only
/// decides how the group is ordered when it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepPolicy {
    /// First file in scan order (directory walk sorted by file name).
    #[default]
    First,
    /// Oldest modification time; ties keep scan order.
    Oldest,
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeepPolicy::First => "first",
            KeepPolicy::Oldest => "oldest",
        })
    }
}

impl FromStr for KeepPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "scan" => Ok(KeepPolicy::First),
            "oldest" => Ok(KeepPolicy::Oldest),
            other => Err(format!("invalid keep policy: '{other}' (expected first or oldest)")),
        }
    }
}

/// Runtime configuration shared by the sorter and the deduplicator.
#[derive(Debug, Clone)]
pub struct Config {
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// strftime-style pattern for sort-by-date buckets
    pub date_format: String,
    /// Whether dedupe descends into subdirectories
    pub recursive: bool,
    /// Which duplicate survives
    pub keep: KeepPolicy,
    /// Read size used while hashing
    pub hash_block_size: usize,
    /// If true, report actions but do not modify the filesystem
    pub dry_run: bool,
    /// If true, destructive actions do not ask for confirmation
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
            log_file: None,
            date_format: DATE_FORMAT_DEFAULT.to_string(),
            recursive: true,
            keep: KeepPolicy::First,
            hash_block_size: HASH_BLOCK_SIZE_DEFAULT,
            dry_run: false,
            assume_yes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse(" verbose "), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("nope".parse::<LogLevel>().is_err());
    }

    #[test]
    fn keep_policy_round_trips_through_display() {
        for p in [KeepPolicy::First, KeepPolicy::Oldest] {
            assert_eq!(p.to_string().parse::<KeepPolicy>().unwrap(), p);
        }
        assert!("newest".parse::<KeepPolicy>().is_err());
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.date_format, "%Y-%m");
        assert!(c.recursive);
        assert_eq!(c.keep, KeepPolicy::First);
        assert_eq!(c.hash_block_size, 65536);
        assert!(!c.dry_run);
    }
}
