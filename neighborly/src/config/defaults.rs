//! Default values for every configuration key.

use std::path::PathBuf;

use crate::location::{DEFAULT_HIGH_ACCURACY, DEFAULT_MAX_CACHE_AGE_MS, DEFAULT_TIMEOUT_MS};
use crate::neighborhood::RangeTier;
use crate::readiness::{DEFAULT_MAX_CAPABILITY_ATTEMPTS, DEFAULT_MAX_SCRIPT_ATTEMPTS};

/// Name of the per-user configuration directory under the home directory.
pub const CONFIG_DIR_NAME: &str = ".neighborly";

/// Configuration file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default `[provider] poll_interval_ms`.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default `[provider] max_script_attempts`.
pub const DEFAULT_SCRIPT_ATTEMPTS: u32 = DEFAULT_MAX_SCRIPT_ATTEMPTS;

/// Default `[provider] max_capability_attempts`.
pub const DEFAULT_CAPABILITY_ATTEMPTS: u32 = DEFAULT_MAX_CAPABILITY_ATTEMPTS;

/// Default `[location] high_accuracy`.
pub const DEFAULT_LOCATION_HIGH_ACCURACY: bool = DEFAULT_HIGH_ACCURACY;

/// Default `[location] timeout_ms`.
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = DEFAULT_TIMEOUT_MS;

/// Default `[location] max_cache_age_ms`.
pub const DEFAULT_LOCATION_MAX_CACHE_AGE_MS: u64 = DEFAULT_MAX_CACHE_AGE_MS;

/// Default `[neighborhood] default_range`.
pub const DEFAULT_RANGE: RangeTier = RangeTier::Medium;

/// Default `[logging] file`.
pub const DEFAULT_LOG_FILE: &str = "neighborly.log";

/// Default `[logging] directory` (`~/.neighborly/logs`).
pub fn default_log_directory() -> PathBuf {
    super::file::config_directory().join("logs")
}
