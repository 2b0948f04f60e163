//! CLI lifecycle: configuration loading and logging setup.

use neighborly::config::ConfigFile;
use neighborly::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Owns what every command needs for its lifetime.
pub struct CliRunner {
    /// Keeps the log writer alive while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config file (defaults if absent) and start logging into the
    /// configured directory.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        tracing::debug!(
            version = env!("CARGO_PKG_VERSION"),
            log_file = %logging_guard.log_path().display(),
            "Neighborly CLI started"
        );

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }
}
