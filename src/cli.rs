//! CLI definition and parsing.
//! Defines Args (global flags + one subcommand) and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - --delete and --move-to are checked together by the dedupe engine, so the usage error
//!   is the same whether it comes from the CLI or from a library caller.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, KeepPolicy, LogLevel};

/// Sort files into folders by type or date, and find duplicate files by content.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Organize files by type or date and remove duplicates")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Also append logs to this file.
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where the config file is looked up, plus a template, then exit.
    #[arg(long, help = "Print the config file location and a template, then exit")]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move each file into a subdirectory named after its extension.
    SortByType(SortArgs),

    /// Move each file into a subdirectory named after its modification date.
    SortByDate {
        #[command(flatten)]
        sort: SortArgs,

        /// strftime pattern for the folder name; '/' creates nested folders.
        #[arg(long, value_name = "FMT")]
        date_format: Option<String>,
    },

    /// Find files with identical content and report, delete or move the extra copies.
    Dedupe(DedupeArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SortArgs {
    /// Directory whose top-level files are sorted.
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Dry-run: print the planned moves but do not modify anything.
    #[arg(long, help = "Show what would be done, but do not modify files/directories")]
    pub dry_run: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DedupeArgs {
    /// Directory to scan.
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Scan subdirectories (default).
    #[arg(long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Only scan the top level of DIR.
    #[arg(long)]
    pub no_recursive: bool,

    /// Delete every copy except the kept one (asks for confirmation unless --yes).
    #[arg(long)]
    pub delete: bool,

    /// Move the extra copies into this directory instead of deleting them.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub move_to: Option<PathBuf>,

    /// Which copy of a group is kept: first (scan order) or oldest (modification time).
    #[arg(long, value_name = "POLICY")]
    pub keep: Option<KeepPolicy>,

    /// Only report duplicates; never delete or move.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not ask before deleting.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl DedupeArgs {
    /// `Some(false)` for --no-recursive, `Some(true)` for --recursive, else config decides.
    pub fn recursive_override(&self) -> Option<bool> {
        if self.no_recursive {
            Some(false)
        } else if self.recursive {
            Some(true)
        } else {
            None
        }
    }
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        match &self.command {
            Some(Command::SortByType(s)) => {
                cfg.dry_run |= s.dry_run;
            }
            Some(Command::SortByDate { sort, date_format }) => {
                cfg.dry_run |= sort.dry_run;
                if let Some(f) = date_format {
                    cfg.date_format = f.clone();
                }
            }
            Some(Command::Dedupe(d)) => {
                cfg.dry_run |= d.dry_run;
                cfg.assume_yes |= d.yes;
                if let Some(r) = d.recursive_override() {
                    cfg.recursive = r;
                }
                if let Some(k) = d.keep {
                    cfg.keep = k;
                }
            }
            None => {}
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
