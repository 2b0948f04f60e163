//! Configuration management CLI commands.
//!
//! `config path` prints where the file lives, `config show` prints the
//! values in effect (defaults filled in), `config init` writes a default file.

use clap::Subcommand;
use neighborly::config::{config_file_path, to_config_string, ConfigFile};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Create the configuration file with default values if missing
    Init,
}

/// Run a config subcommand.
pub fn run(runner: &CliRunner, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(runner.config()),
        ConfigCommands::Init => run_init(),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_show(config: &ConfigFile) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# {} not found, showing defaults", path.display());
    }
    println!();
    print!("{}", to_config_string(config));
    Ok(())
}

fn run_init() -> Result<(), CliError> {
    let path = config_file_path();
    let existed = path.exists();
    ConfigFile::ensure_exists()?;

    if existed {
        println!("Configuration already exists at {}", path.display());
    } else {
        println!("Created {}", path.display());
    }
    Ok(())
}
