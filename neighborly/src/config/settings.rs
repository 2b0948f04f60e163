//! Settings structs, one per `[section]` of config.ini.

use std::path::PathBuf;
use std::time::Duration;

use crate::location::LocationOptions;
use crate::neighborhood::RangeTier;
use crate::readiness::ReadinessConfig;

use super::defaults::*;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub location: LocationSettings,
    pub neighborhood: NeighborhoodSettings,
    pub logging: LoggingSettings,
}

/// Map SDK provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// SDK API key. Only used for diagnostics here.
    pub api_key: Option<String>,
    /// Readiness poll interval in milliseconds.
    pub poll_interval_ms: u64,
    pub max_script_attempts: u32,
    pub max_capability_attempts: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_script_attempts: DEFAULT_SCRIPT_ATTEMPTS,
            max_capability_attempts: DEFAULT_CAPABILITY_ATTEMPTS,
        }
    }
}

/// Device location request defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSettings {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub max_cache_age_ms: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: DEFAULT_LOCATION_HIGH_ACCURACY,
            timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
            max_cache_age_ms: DEFAULT_LOCATION_MAX_CACHE_AGE_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborhoodSettings {
    /// Tier selected when none is given explicitly.
    pub default_range: RangeTier,
}

impl Default for NeighborhoodSettings {
    fn default() -> Self {
        Self {
            default_range: DEFAULT_RANGE,
        }
    }
}

/// Log file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl From<&ProviderSettings> for ReadinessConfig {
    fn from(settings: &ProviderSettings) -> Self {
        ReadinessConfig::default()
            .with_poll_interval(Duration::from_millis(settings.poll_interval_ms))
            .with_max_script_attempts(settings.max_script_attempts)
            .with_max_capability_attempts(settings.max_capability_attempts)
    }
}

impl From<&LocationSettings> for LocationOptions {
    fn from(settings: &LocationSettings) -> Self {
        LocationOptions::default()
            .with_high_accuracy(settings.high_accuracy)
            .with_timeout_ms(settings.timeout_ms)
            .with_max_cache_age_ms(settings.max_cache_age_ms)
    }
}

impl ConfigFile {
    /// Readiness monitor configuration from `[provider]`.
    pub fn readiness_config(&self) -> ReadinessConfig {
        ReadinessConfig::from(&self.provider)
    }

    /// Location request options from `[location]`.
    pub fn location_options(&self) -> LocationOptions {
        LocationOptions::from(&self.location)
    }
}
