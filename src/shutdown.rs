//! Process-wide shutdown coordination.
//! Provides a flag set by the Ctrl+C handler so long-running scans and sorts stop
//! between two file operations instead of in the middle of one.
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way "stop" flag.
//! - `request()` is safe to call from signal handlers.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::errors::OrganizerError;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

/// Check whether a shutdown has been requested.
#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Fail with [`OrganizerError::Interrupted`] if a shutdown has been requested.
/// Called between file operations; never in the middle of one.
pub fn check() -> Result<()> {
    if is_requested() {
        return Err(OrganizerError::Interrupted.into());
    }
    Ok(())
}

/// Test/utility-only: clear the shutdown flag.
#[inline]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
}
