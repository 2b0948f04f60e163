//! User configuration (`~/.neighborly/config.ini`).
//!
//! # Example
//!
//! ```no_run
//! use neighborly::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let readiness = config.readiness_config();
//! let tier = config.neighborhood.default_range;
//! # Ok::<(), neighborly::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ensure_exists_at, ConfigFileError};
pub use settings::{
    ConfigFile, LocationSettings, LoggingSettings, NeighborhoodSettings, ProviderSettings,
};
pub use writer::to_config_string;
