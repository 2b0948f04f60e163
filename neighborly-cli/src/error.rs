//! CLI error handling with user-friendly messages.
//!
//! Centralizes error formatting and exit codes for every command.

use std::fmt;
use std::path::PathBuf;
use std::process;

use neighborly::config::{config_file_path, ConfigFileError};

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Items file could not be read
    ItemsRead {
        path: PathBuf,
        error: std::io::Error,
    },
    /// Items file is not a valid item array
    ItemsParse {
        path: PathBuf,
        error: serde_json::Error,
    },
    /// An item's coordinates are out of range
    InvalidItem {
        path: PathBuf,
        id: String,
        lat: f64,
        lng: f64,
    },
    /// Center coordinates out of range
    InvalidCenter { lat: f64, lng: f64 },
    /// Failed to render JSON output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an error message and code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check {} for typos.", config_file_path().display());
                eprintln!("Run 'neighborly config show' to see the values in effect.");
            }
            CliError::ItemsParse { .. } => {
                eprintln!();
                eprintln!("Expected a JSON array of items like:");
                eprintln!(
                    r#"  [{{"id": 1, "title": "Pothole", "location": {{"lat": 37.5665, "lng": 126.978}}}}]"#
                );
            }
            CliError::InvalidCenter { .. } | CliError::InvalidItem { .. } => {
                eprintln!();
                eprintln!("Latitude must be within -90..=90 and longitude within -180..=180.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ItemsRead { path, error } => {
                write!(f, "Failed to read items file '{}': {}", path.display(), error)
            }
            CliError::ItemsParse { path, error } => {
                write!(f, "Invalid items file '{}': {}", path.display(), error)
            }
            CliError::InvalidItem { path, id, lat, lng } => write!(
                f,
                "Item '{}' in '{}' has invalid coordinates ({}, {})",
                id,
                path.display(),
                lat,
                lng
            ),
            CliError::InvalidCenter { lat, lng } => {
                write!(f, "Invalid center coordinates ({}, {})", lat, lng)
            }
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ItemsRead { error, .. } => Some(error),
            CliError::ItemsParse { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigFileError::InvalidValue {
            section: "neighborhood".to_string(),
            key: "default_range".to_string(),
            value: "huge".to_string(),
            reason: "must be one of: small, medium, large".to_string(),
        }
        .into();

        let message = err.to_string();
        assert!(message.starts_with("Configuration error:"));
        assert!(message.contains("neighborhood.default_range"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err = CliError::ItemsRead {
            path: PathBuf::from("items.json"),
            error: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("items.json"));

        assert!(CliError::InvalidCenter { lat: 91.0, lng: 0.0 }
            .source()
            .is_none());
    }
}
