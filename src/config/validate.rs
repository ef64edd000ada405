//! Config validation logic.
//! Verifies the date pattern, the hashing block size and the log file location.

use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use tracing::debug;

use super::paths::path_has_symlink_ancestor;
use super::types::Config;
use super::HASH_BLOCK_SIZE_MAX;
use crate::errors::OrganizerError;

impl Config {
    /// Validate values that would otherwise fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)?;

        if self.hash_block_size == 0 || self.hash_block_size > HASH_BLOCK_SIZE_MAX {
            return Err(OrganizerError::InvalidConfig(format!(
                "hash_block_size must be between 1 and {HASH_BLOCK_SIZE_MAX} bytes, got {}",
                self.hash_block_size
            ))
            .into());
        }

        if let Some(log) = &self.log_file
            && path_has_symlink_ancestor(log).unwrap_or(true)
        {
            return Err(OrganizerError::InvalidConfig(format!(
                "log_file '{}' has a symlinked (or unreadable) ancestor",
                log.display()
            ))
            .into());
        }

        debug!(
            date_format = %self.date_format,
            recursive = self.recursive,
            keep = %self.keep,
            hash_block_size = self.hash_block_size,
            "Config validated"
        );
        Ok(())
    }
}

/// Reject empty patterns and patterns chrono cannot render.
pub fn validate_date_format(format: &str) -> Result<(), OrganizerError> {
    if format.trim().is_empty() {
        return Err(OrganizerError::InvalidDateFormat(format.to_string()));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(OrganizerError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}
