//! Output sink injected into every core operation.
//!
//! The engine never prints by itself: it hands user-facing messages and progress
//! ticks to a [`Reporter`]. The binary passes a [`ConsoleReporter`]; tests pass a
//! [`MemoryReporter`] and inspect what was said.

use std::fmt;
use std::sync::Mutex;

use tracing::trace;

use crate::output as out;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warn,
    Error,
}

/// Long-running phases that emit progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scan,
    Hash,
    Resolve,
    Sort,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Scan => "scan",
            Phase::Hash => "hash",
            Phase::Resolve => "resolve",
            Phase::Sort => "sort",
        };
        f.write_str(s)
    }
}

/// Receives user-facing messages and progress from the engine.
pub trait Reporter: Send + Sync {
    fn message(&self, level: MessageLevel, text: &str);

    /// Called once per processed item. `current` is 1-based; `total` is 0 when not yet known.
    fn progress(&self, _phase: Phase, _current: usize, _total: usize) {}

    fn info(&self, text: &str) {
        self.message(MessageLevel::Info, text);
    }

    fn success(&self, text: &str) {
        self.message(MessageLevel::Success, text);
    }

    fn warn(&self, text: &str) {
        self.message(MessageLevel::Warn, text);
    }

    fn error(&self, text: &str) {
        self.message(MessageLevel::Error, text);
    }
}

/// Prints through [`crate::output`]; progress goes to the trace log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn message(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Info => out::print_info(text),
            MessageLevel::Success => out::print_success(text),
            MessageLevel::Warn => out::print_warn(text),
            MessageLevel::Error => out::print_error(text),
        }
    }

    fn progress(&self, phase: Phase, current: usize, total: usize) {
        trace!(%phase, current, total, "progress");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn message(&self, _level: MessageLevel, _text: &str) {}
}

/// Records messages and progress ticks in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(MessageLevel, String)>>,
    ticks: Mutex<Vec<(Phase, usize, usize)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Messages of one level, text only.
    pub fn texts(&self, level: MessageLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, t)| t)
            .collect()
    }

    pub fn ticks(&self, phase: Phase) -> Vec<(usize, usize)> {
        self.ticks
            .lock()
            .map(|t| {
                t.iter()
                    .filter(|(p, _, _)| *p == phase)
                    .map(|(_, c, n)| (*c, *n))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn message(&self, level: MessageLevel, text: &str) {
        if let Ok(mut m) = self.messages.lock() {
            m.push((level, text.to_string()));
        }
    }

    fn progress(&self, phase: Phase, current: usize, total: usize) {
        if let Ok(mut t) = self.ticks.lock() {
            t.push((phase, current, total));
        }
    }
}
