//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Renders a template for `--print-config`.
//!
//! Notes:
//! - This module only reads the config file; value validation happens in `validate`.
//! - Unknown XML fields are rejected to surface misconfigurations early.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, KeepPolicy, LogLevel};
use super::{CONFIG_ENV, DATE_FORMAT_DEFAULT, HASH_BLOCK_SIZE_DEFAULT};
use crate::errors::OrganizerError;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    date_format: Option<String>,
    recursive: Option<String>,
    keep: Option<String>,
    hash_block_size: Option<String>,
}

/// Load the effective file config.
///
/// - `$FILE_ORGANIZER_CONFIG` set: that file must exist and parse.
/// - otherwise the platform default path is used when present; a missing default
///   file simply yields `Config::default()`.
pub fn load_config() -> Result<Config> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = default_config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        if explicit {
            return Err(OrganizerError::InvalidConfig(format!(
                "config file named by {CONFIG_ENV} does not exist: {}",
                path.display()
            ))
            .into());
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    load_config_from_xml_path(&path)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| {
        OrganizerError::InvalidConfig(format!("parse '{}': {}", path.display(), e))
    })?;
    let cfg = xml_to_config(parsed)?;
    debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

fn trimmed(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(field: &str, s: &str) -> Result<bool, OrganizerError> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(OrganizerError::InvalidConfig(format!(
            "{field}: expected true/false, got '{s}'"
        ))),
    }
}

// Map XmlConfig -> Config; empty tags keep the default.
fn xml_to_config(parsed: XmlConfig) -> Result<Config, OrganizerError> {
    let mut cfg = Config::default();

    if let Some(s) = trimmed(&parsed.log_level) {
        cfg.log_level = s.parse::<LogLevel>().map_err(OrganizerError::InvalidConfig)?;
    }
    if let Some(s) = trimmed(&parsed.log_file) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = trimmed(&parsed.date_format) {
        cfg.date_format = s.to_string();
    }
    if let Some(s) = trimmed(&parsed.recursive) {
        cfg.recursive = parse_bool("recursive", s)?;
    }
    if let Some(s) = trimmed(&parsed.keep) {
        cfg.keep = s.parse::<KeepPolicy>().map_err(OrganizerError::InvalidConfig)?;
    }
    if let Some(s) = trimmed(&parsed.hash_block_size) {
        cfg.hash_block_size = s.parse::<usize>().map_err(|e| {
            OrganizerError::InvalidConfig(format!("hash_block_size '{s}': {e}"))
        })?;
    }
    Ok(cfg)
}

/// Example config file with every recognised field at its default.
pub fn template_config() -> String {
    format!(
        "<!--\n  file_organizer configuration (XML). CLI flags override these values.\n\n    log_level        -> quiet | normal | info | debug\n    log_file         -> path to a log file (optional)\n    date_format      -> strftime pattern for sort-by-date, '/' creates nested folders\n    recursive        -> dedupe descends into subdirectories (true/false)\n    keep             -> first | oldest\n    hash_block_size  -> bytes read per hashing step\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <date_format>{}</date_format>\n  <recursive>true</recursive>\n  <keep>first</keep>\n  <hash_block_size>{}</hash_block_size>\n</config>\n",
        DATE_FORMAT_DEFAULT, HASH_BLOCK_SIZE_DEFAULT
    )
}
