//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, KeepPolicy, LogLevel};
pub use validate::validate_date_format;
pub use xml::{load_config, load_config_from_xml_path, template_config};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FILE_ORGANIZER_CONFIG";
/// Default bucket format for sort-by-date (year-month).
pub const DATE_FORMAT_DEFAULT: &str = "%Y-%m";
/// Read size used when hashing file content.
pub const HASH_BLOCK_SIZE_DEFAULT: usize = 64 * 1024;
/// Upper bound accepted for `hash_block_size`.
pub const HASH_BLOCK_SIZE_MAX: usize = 64 * 1024 * 1024;
