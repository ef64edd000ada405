//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, runs the
//! requested command and renders its result.

use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use file_organizer::cli::{Args, Command, DedupeArgs};
use file_organizer::config::{CONFIG_ENV, default_config_path, template_config};
use file_organizer::dedupe::{FileOutcome, short_hash};
use file_organizer::fs_ops::format_bytes;
use file_organizer::output::{self as out, Tone};
use file_organizer::{
    Config, ConsoleReporter, DuplicateAction, DuplicateReport, OrganizerError, ResolveSummary,
    ScanOptions, SortOptions, SortSummary, find_duplicates, load_config, resolve_duplicates,
    shutdown, sort_by_date, sort_by_type,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let Some(command) = args.command.clone() else {
        return Err(OrganizerError::Usage(
            "no command given (try sort-by-type, sort-by-date or dedupe; see --help)".into(),
        )
        .into());
    };

    // Build config: defaults < XML < CLI.
    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);
    cfg.validate()?;

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current file and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .expect("failed to install signal handler");
    }

    debug!(?command, log_level = %cfg.log_level, dry_run = cfg.dry_run, "Starting file_organizer");

    let result = match &command {
        Command::SortByType(s) => {
            sort_by_type(&s.dir, &SortOptions::from(&cfg), &ConsoleReporter).map(|sum| render_sort(&sum))
        }
        Command::SortByDate { sort, .. } => {
            sort_by_date(&sort.dir, &cfg.date_format, &SortOptions::from(&cfg), &ConsoleReporter)
                .map(|sum| render_sort(&sum))
        }
        Command::Dedupe(d) => run_dedupe(d, &cfg),
    };

    if let Err(e) = &result {
        log_failure(e);
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn run_dedupe(d: &DedupeArgs, cfg: &Config) -> Result<()> {
    let mut action = DuplicateAction::from_flags(d.delete, d.move_to.clone())?;
    if cfg.dry_run && action != DuplicateAction::Report {
        out::print_info("Dry run: duplicates are only reported.");
        action = DuplicateAction::Report;
    }

    let report = find_duplicates(&d.dir, &ScanOptions::from(cfg), &ConsoleReporter)?;
    render_report(&report);
    if report.is_empty() || action == DuplicateAction::Report {
        return Ok(());
    }

    let confirmed = if action.is_destructive() && !cfg.assume_yes {
        let question = format!(
            "Delete {} duplicate file(s) ({})?",
            report.total_duplicates(),
            format_bytes(report.reclaimable_bytes())
        );
        let yes = prompt_confirm(&question)?;
        if !yes {
            out::print_warn("Aborted; no files were deleted.");
        }
        yes
    } else {
        true
    };

    let summary = resolve_duplicates(&report, &action, confirmed, &ConsoleReporter)?;
    render_resolve(&summary);
    Ok(())
}

/// `y/N` question on stdin. End of input counts as no.
fn prompt_confirm(question: &str) -> io::Result<bool> {
    let mut input = String::new();
    loop {
        input.clear();
        print!("{question} (y/N): ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(false);
        }
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

fn render_report(report: &DuplicateReport) {
    if report.is_empty() {
        out::print_success(&format!(
            "No duplicate files found ({} files scanned).",
            report.files_scanned
        ));
        return;
    }
    out::print_user(&format!(
        "Found {} sets of duplicates ({} duplicate files, {} reclaimable) in {} files scanned",
        report.groups.len(),
        report.total_duplicates(),
        format_bytes(report.reclaimable_bytes()),
        report.files_scanned
    ));
    for g in &report.groups {
        out::print_user(&format!(
            "[{}] {} x {}",
            short_hash(&g.hash),
            g.files.len(),
            format_bytes(g.size)
        ));
        out::print_labeled("Keep:", &g.keeper().path.display().to_string(), Tone::Good);
        for dup in g.duplicates() {
            out::print_labeled("Duplicate:", &dup.path.display().to_string(), Tone::Notice);
        }
    }
    if !report.warnings.is_empty() {
        out::print_warn(&format!("{} file(s) could not be read and were skipped", report.warnings.len()));
    }
}

fn render_resolve(summary: &ResolveSummary) {
    for g in &summary.groups {
        for f in &g.files {
            if let FileOutcome::Failed { reason } = &f.outcome {
                out::print_labeled("Failed:", &format!("{} ({reason})", f.path.display()), Tone::Bad);
            }
        }
    }
    out::print_user(&format!(
        "Deleted {}, moved {}, failed {}; reclaimed {}",
        summary.deleted,
        summary.moved,
        summary.failed,
        format_bytes(summary.bytes_reclaimed)
    ));
}

fn render_sort(summary: &SortSummary) {
    if summary.already_placed > 0 {
        out::print_info(&format!("{} file(s) were already in place", summary.already_placed));
    }
    if !summary.warnings.is_empty() {
        out::print_warn(&format!("{} file(s) could not be sorted", summary.warnings.len()));
    }
}

fn print_config_location() {
    match std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        Some(p) => out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}",
            Path::new(&p).display()
        )),
        None => match default_config_path() {
            Some(p) => {
                out::print_info(&format!("Default config path:\n  {}", p.display()));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info("No config file exists there yet; defaults are used.");
                }
            }
            None => out::print_error("Could not determine a default config path"),
        },
    }
    out::print_user("\nTemplate:\n");
    out::print_user(&template_config());
}

fn log_failure(e: &anyhow::Error) {
    match e.downcast_ref::<OrganizerError>() {
        Some(oe) => {
            let code = oe.code();
            match oe {
                OrganizerError::NotFound(p) | OrganizerError::NotADirectory(p) => {
                    error!(code, kind = oe.kind(), path = %p.display(), "Operation failed")
                }
                _ => error!(code, kind = oe.kind(), error = %oe, "Operation failed"),
            }
        }
        None => error!(error = ?e, "Operation failed"),
    }
}
