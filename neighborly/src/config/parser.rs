//! INI parsing: `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::neighborhood::RangeTier;

/// Parse an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values present.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider]
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.provider.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "provider",
            "poll_interval_ms",
            "must be a positive integer (milliseconds)",
        )? {
            if v == 0 {
                return Err(invalid(
                    "provider",
                    "poll_interval_ms",
                    "0",
                    "must be greater than zero",
                ));
            }
            config.provider.poll_interval_ms = v;
        }
        if let Some(v) = parse_value::<u32>(
            section,
            "provider",
            "max_script_attempts",
            "must be a non-negative integer",
        )? {
            config.provider.max_script_attempts = v;
        }
        if let Some(v) = parse_value::<u32>(
            section,
            "provider",
            "max_capability_attempts",
            "must be a non-negative integer",
        )? {
            config.provider.max_capability_attempts = v;
        }
    }

    // [location]
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("high_accuracy") {
            config.location.high_accuracy = parse_bool(v).ok_or_else(|| {
                invalid("location", "high_accuracy", v, "must be 'true' or 'false'")
            })?;
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "location",
            "timeout_ms",
            "must be a non-negative integer (milliseconds)",
        )? {
            config.location.timeout_ms = v;
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "location",
            "max_cache_age_ms",
            "must be a non-negative integer (milliseconds)",
        )? {
            config.location.max_cache_age_ms = v;
        }
    }

    // [neighborhood]
    if let Some(section) = ini.section(Some("neighborhood")) {
        if let Some(v) = section.get("default_range") {
            config.neighborhood.default_range = RangeTier::from_str(v.trim()).map_err(|_| {
                invalid(
                    "neighborhood",
                    "default_range",
                    v,
                    "must be one of: small, medium, large",
                )
            })?;
        }
    }

    // [logging]
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.contains('/') || v.contains('\\') {
                return Err(invalid("logging", "file", v, "must be a file name, not a path"));
            }
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Parse an optional numeric key, mapping failures to `InvalidValue`.
fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, v, reason)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
