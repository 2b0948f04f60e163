//! INI serialization: `ConfigFile` → commented config.ini text.

use std::path::Path;

use super::settings::ConfigFile;

/// Render a `ConfigFile` as the commented INI written to disk.
pub fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.provider.api_key.as_deref().unwrap_or("");
    let log_directory = path_to_string(&config.logging.directory);

    format!(
        r#"[provider]
; Map SDK API key. Only checked for presence and length when diagnosing
; a provider that failed to load.
api_key = {}
; Time between readiness polls in milliseconds (default: 100)
poll_interval_ms = {}
; Polls allowed while the SDK script tag is missing (default: 100, ~10s)
max_script_attempts = {}
; Polls allowed for the namespace, module and required APIs once the script
; is present (default: 200, ~20s)
max_capability_attempts = {}

[location]
; Prefer a precise (GPS) fix over a coarse one (default: true)
high_accuracy = {}
; How long the device may take to answer in milliseconds (default: 10000)
timeout_ms = {}
; Accept a cached position up to this old in milliseconds (default: 300000)
max_cache_age_ms = {}

[neighborhood]
; Range used when none is selected:
;   small  - 1km
;   medium - 3km
;   large  - 6km
default_range = {}

[logging]
; Directory for log files (default: ~/.neighborly/logs)
directory = {}
; Log file name, cleared at the start of each session (default: neighborly.log)
file = {}
"#,
        api_key,
        config.provider.poll_interval_ms,
        config.provider.max_script_attempts,
        config.provider.max_capability_attempts,
        config.location.high_accuracy,
        config.location.timeout_ms,
        config.location.max_cache_age_ms,
        config.neighborhood.default_range.as_str(),
        log_directory,
        config.logging.file,
    )
}

/// Shorten paths under the home directory back to `~/`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
